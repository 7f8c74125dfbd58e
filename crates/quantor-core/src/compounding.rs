//! Interest-rate compounding conventions.

/// How interest accrues over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compounding {
    /// `1 + r·t`
    Simple,
    /// `(1 + r)^t`
    Compounded,
    /// `e^{r·t}`
    Continuous,
    /// Simple up to the first period, compounded thereafter.
    SimpleThenCompounded,
}

impl std::fmt::Display for Compounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Compounding::Simple => "Simple",
            Compounding::Compounded => "Compounded",
            Compounding::Continuous => "Continuous",
            Compounding::SimpleThenCompounded => "Simple-then-compounded",
        };
        write!(f, "{s}")
    }
}
