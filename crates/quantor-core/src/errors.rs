//! Error types shared across the quantor workspace.
//!
//! The whole library reports failures through a single `thiserror`-derived
//! enum.  The C++-style contract macros `QL_REQUIRE` / `QL_ENSURE` / `QL_FAIL`
//! that QuantLib users know map to the [`ensure!`], [`ensure_post!`] and
//! [`fail!`] macros defined here.

use thiserror::Error;

/// The top-level error type used throughout quantor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated by the caller (bad date ordering, negative
    /// times, and the like).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated; indicates an internal inconsistency.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// Invalid argument passed to a conversion or constructor.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The object is not configured well enough to perform the requested
    /// operation (e.g. an instrument without a pricing engine).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A hook with no default behaviour was invoked without an override.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Bad market data (invalid or duplicated fixings).  Bulk operations
    /// aggregate these and report once per pass.
    #[error("data error: {0}")]
    Data(String),

    /// Arithmetic failure during a lazy computation.  The node that raised
    /// it stays stale, so the next read retries.
    #[error("numeric error: {0}")]
    Numeric(String),

    /// Date-related error.
    #[error("date error: {0}")]
    Date(String),
}

/// Shorthand `Result` type used throughout quantor.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return an [`Error::Precondition`] if `$cond` is false.
///
/// # Example
/// ```
/// use quantor_core::ensure;
/// fn positive(x: f64) -> quantor_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return an [`Error::Postcondition`] if `$cond` is false.
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return an [`Error::Runtime`] immediately.
///
/// # Example
/// ```
/// use quantor_core::fail;
/// fn always_err() -> quantor_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requires_ordering(a: i32, b: i32) -> Result<()> {
        ensure!(a <= b, "{a} must not be greater than {b}");
        Ok(())
    }

    #[test]
    fn ensure_produces_precondition() {
        assert_eq!(requires_ordering(1, 2), Ok(()));
        match requires_ordering(3, 2) {
            Err(Error::Precondition(msg)) => assert!(msg.contains('3')),
            other => panic!("expected precondition error, got {other:?}"),
        }
    }

    #[test]
    fn error_messages_carry_category() {
        let e = Error::Configuration("null pricing engine".into());
        assert!(e.to_string().contains("configuration"));
        let e = Error::Data("at least one invalid fixing provided".into());
        assert!(e.to_string().contains("data"));
    }
}
