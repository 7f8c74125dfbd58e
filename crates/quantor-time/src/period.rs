//! A time span expressed in a [`TimeUnit`].

use quantor_core::errors::{Error, Result};
use quantor_core::Integer;

use crate::frequency::Frequency;
use crate::time_unit::TimeUnit;

/// An integer number of time units.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Number of units; may be negative.
    pub length: Integer,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub fn new(length: Integer, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// `n` calendar days.
    pub fn days(n: Integer) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// `n` calendar weeks.
    pub fn weeks(n: Integer) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// `n` calendar months.
    pub fn months(n: Integer) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// `n` calendar years.
    pub fn years(n: Integer) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Construct the period of one payment interval at `frequency`.
    ///
    /// # Errors
    /// `NoFrequency` maps to a zero-day period; `OtherFrequency` is not
    /// representable and returns an error.
    pub fn from_frequency(frequency: Frequency) -> Result<Self> {
        match frequency {
            Frequency::NoFrequency => Ok(Self::days(0)),
            Frequency::Once => Ok(Self::years(0)),
            Frequency::Annual => Ok(Self::years(1)),
            Frequency::Semiannual => Ok(Self::months(6)),
            Frequency::EveryFourthMonth => Ok(Self::months(4)),
            Frequency::Quarterly => Ok(Self::months(3)),
            Frequency::Bimonthly => Ok(Self::months(2)),
            Frequency::Monthly => Ok(Self::months(1)),
            Frequency::EveryFourthWeek => Ok(Self::weeks(4)),
            Frequency::Biweekly => Ok(Self::weeks(2)),
            Frequency::Weekly => Ok(Self::weeks(1)),
            Frequency::Daily => Ok(Self::days(1)),
            Frequency::OtherFrequency => Err(Error::InvalidArgument(
                "unknown frequency cannot be converted to a period".into(),
            )),
        }
    }

    /// The frequency implied by this period, if any.
    pub fn frequency(&self) -> Frequency {
        let length = self.length.unsigned_abs();
        if length == 0 {
            return match self.unit {
                TimeUnit::Years => Frequency::Once,
                _ => Frequency::NoFrequency,
            };
        }
        match self.unit {
            TimeUnit::Years => match length {
                1 => Frequency::Annual,
                _ => Frequency::OtherFrequency,
            },
            TimeUnit::Months if length <= 12 && 12 % length == 0 => match 12 / length {
                1 => Frequency::Annual,
                2 => Frequency::Semiannual,
                3 => Frequency::EveryFourthMonth,
                4 => Frequency::Quarterly,
                6 => Frequency::Bimonthly,
                12 => Frequency::Monthly,
                _ => Frequency::OtherFrequency,
            },
            TimeUnit::Months => Frequency::OtherFrequency,
            TimeUnit::Weeks => match length {
                1 => Frequency::Weekly,
                2 => Frequency::Biweekly,
                4 => Frequency::EveryFourthWeek,
                _ => Frequency::OtherFrequency,
            },
            TimeUnit::Days => match length {
                1 => Frequency::Daily,
                _ => Frequency::OtherFrequency,
            },
        }
    }

    /// A canonical form: weeks collapse to days, years to months, where the
    /// length allows it.
    pub fn normalized(self) -> Self {
        match self.unit {
            TimeUnit::Weeks => Self::days(self.length * 7),
            TimeUnit::Years => Self::months(self.length * 12),
            _ => self,
        }
    }
}

impl std::ops::Neg for Period {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.length, self.unit)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.unit {
            TimeUnit::Days => "D",
            TimeUnit::Weeks => "W",
            TimeUnit::Months => "M",
            TimeUnit::Years => "Y",
        };
        write!(f, "{}{}", self.length, unit)
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}
