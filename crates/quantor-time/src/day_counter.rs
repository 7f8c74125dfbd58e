//! Day-count conventions.
//!
//! A day counter measures the fraction of a year between two dates, used
//! when accruing interest or discounting.  The Actual/Actual family with
//! its reference-period handling lives in
//! [`actual_actual`][crate::actual_actual].

use quantor_core::errors::Result;
use quantor_core::{Real, Time};

use crate::date::{is_leap_year, Date};
use crate::month::Month;

/// A convention for counting days and year fractions between two dates.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name, e.g. `"Actual/360"`.
    fn name(&self) -> &str;

    /// Number of days between `d1` and `d2` under this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        (d2 - d1) as i64
    }

    /// Fraction of a year between `d1` and `d2`.
    ///
    /// `ref_start` / `ref_end` delimit the reference period for the
    /// conventions that need one (Actual/Actual ISMA); other conventions
    /// ignore them.  Pass [`Date::NULL`] when no reference period applies.
    ///
    /// Fails when the convention rejects the reference period.
    fn year_fraction(&self, d1: Date, d2: Date, ref_start: Date, ref_end: Date) -> Result<Time>;
}

/// Actual/360: actual days over a 360-day year.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn year_fraction(&self, d1: Date, d2: Date, _ref_start: Date, _ref_end: Date) -> Result<Time> {
        Ok(self.day_count(d1, d2) as Real / 360.0)
    }
}

/// Actual/365 (Fixed): actual days over a 365-day year.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn year_fraction(&self, d1: Date, d2: Date, _ref_start: Date, _ref_end: Date) -> Result<Time> {
        Ok(self.day_count(d1, d2) as Real / 365.0)
    }
}

/// Actual/365 (No Leap), a.k.a. NL/365: leap days are skipped entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365NoLeap;

/// February 29ths in `(Date::MIN, d]`.
fn leap_days_up_to(d: Date) -> i64 {
    let mut count = 0;
    for year in 1901..=d.year() {
        if is_leap_year(year) {
            let leap_day = Date::new(year, Month::February, 29).expect("leap year has Feb 29");
            if leap_day <= d {
                count += 1;
            }
        }
    }
    count
}

impl DayCounter for Actual365NoLeap {
    fn name(&self) -> &str {
        "Actual/365 (NL)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        (d2 - d1) as i64 - (leap_days_up_to(d2) - leap_days_up_to(d1))
    }

    fn year_fraction(&self, d1: Date, d2: Date, _ref_start: Date, _ref_end: Date) -> Result<Time> {
        Ok(self.day_count(d1, d2) as Real / 365.0)
    }
}
