//! Payment / event frequency.

/// How often an event recurs within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Sentinel: no recurring events.
    NoFrequency,
    /// A single event (at maturity only).
    Once,
    /// Once per year.
    Annual,
    /// Twice per year.
    Semiannual,
    /// Every fourth month.
    EveryFourthMonth,
    /// Four times per year.
    Quarterly,
    /// Every second month.
    Bimonthly,
    /// Twelve times per year.
    Monthly,
    /// Every fourth week.
    EveryFourthWeek,
    /// Every second week.
    Biweekly,
    /// Fifty-two times per year.
    Weekly,
    /// Every day.
    Daily,
    /// Sentinel: a frequency not expressible here.
    OtherFrequency,
}

impl Frequency {
    /// Payments per year, or `None` for the sentinels.
    pub fn payments_per_year(self) -> Option<u32> {
        match self {
            Frequency::NoFrequency | Frequency::OtherFrequency => None,
            Frequency::Once => Some(0),
            Frequency::Annual => Some(1),
            Frequency::Semiannual => Some(2),
            Frequency::EveryFourthMonth => Some(3),
            Frequency::Quarterly => Some(4),
            Frequency::Bimonthly => Some(6),
            Frequency::Monthly => Some(12),
            Frequency::EveryFourthWeek => Some(13),
            Frequency::Biweekly => Some(26),
            Frequency::Weekly => Some(52),
            Frequency::Daily => Some(365),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Frequency::NoFrequency => "No-Frequency",
            Frequency::Once => "Once",
            Frequency::Annual => "Annual",
            Frequency::Semiannual => "Semiannual",
            Frequency::EveryFourthMonth => "Every-Fourth-Month",
            Frequency::Quarterly => "Quarterly",
            Frequency::Bimonthly => "Bimonthly",
            Frequency::Monthly => "Monthly",
            Frequency::EveryFourthWeek => "Every-Fourth-Week",
            Frequency::Biweekly => "Biweekly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
            Frequency::OtherFrequency => "Unknown frequency",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_have_no_payment_count() {
        assert_eq!(Frequency::NoFrequency.payments_per_year(), None);
        assert_eq!(Frequency::OtherFrequency.payments_per_year(), None);
        assert_eq!(Frequency::Once.payments_per_year(), Some(0));
    }

    #[test]
    fn payment_counts() {
        assert_eq!(Frequency::Semiannual.payments_per_year(), Some(2));
        assert_eq!(Frequency::Monthly.payments_per_year(), Some(12));
        assert_eq!(Frequency::Daily.payments_per_year(), Some(365));
    }
}
