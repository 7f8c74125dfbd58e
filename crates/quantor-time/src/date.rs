//! Calendar date, represented as a serial number.
//!
//! Serial 1 is January 1st, 1900; serial 0 is the distinguished *null* date
//! used to mean "not set" (the evaluation-date proxy, reference periods and
//! similar optional slots rely on it).  The valid range is 1901-01-01 to
//! 2199-12-31.
//!
//! Calendar conversions go through `chrono`; the system clock behind
//! [`Date::todays_date`] does too.

use chrono::{Datelike, Days, Months, NaiveDate};
use quantor_core::errors::{Error, Result};

use crate::month::Month;
use crate::period::Period;
use crate::time_unit::TimeUnit;
use crate::weekday::Weekday;

/// A calendar date.
///
/// `Default` yields the null date.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Date(i32);

/// Serial 0, i.e. December 31st, 1899: one day before serial 1.
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 31).expect("hardcoded epoch is valid")
}

impl Date {
    /// The null date sentinel.
    pub const NULL: Date = Date(0);

    /// Minimum valid date: January 1st, 1901 (serial 366).
    pub const MIN: Date = Date(366);

    /// Maximum valid date: December 31st, 2199 (serial 109,573).
    pub const MAX: Date = Date(109_573);

    // ── Constructors ─────────────────────────────────────────────────────

    /// Create a date from its serial number.
    pub fn from_serial(serial: i32) -> Result<Self> {
        let date = Date(serial);
        if date < Self::MIN || date > Self::MAX {
            return Err(Error::Date(format!(
                "serial {serial} outside [{}, {}]",
                Self::MIN.0,
                Self::MAX.0
            )));
        }
        Ok(date)
    }

    /// Create a date from year, month, and day of month.
    pub fn new(year: i32, month: Month, day: u32) -> Result<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month.number() as u32, day).ok_or_else(|| {
            Error::Date(format!("invalid day-month-year combination {year}-{month}-{day}"))
        })?;
        Self::from_naive(naive)
    }

    /// Create a date from year, numeric month (1–12), and day of month.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        let m = u8::try_from(month)
            .ok()
            .and_then(Month::from_number)
            .ok_or_else(|| Error::Date(format!("month {month} out of range [1, 12]")))?;
        Self::new(year, m, day)
    }

    fn from_naive(naive: NaiveDate) -> Result<Self> {
        let serial = (naive - epoch()).num_days();
        Self::from_serial(serial as i32)
    }

    fn naive(self) -> NaiveDate {
        debug_assert!(!self.is_null(), "calendar access on the null date");
        epoch() + Days::new(self.0 as u64)
    }

    /// Today's date according to the local system clock.
    pub fn todays_date() -> Self {
        Self::from_naive(chrono::Local::now().date_naive())
            .expect("system clock outside the representable date range")
    }

    /// Today's serial number.
    pub fn todays_serial_number() -> i32 {
        Self::todays_date().serial_number()
    }

    // ── Inspectors ───────────────────────────────────────────────────────

    /// The serial number (0 for the null date).
    pub fn serial_number(self) -> i32 {
        self.0
    }

    /// `true` for the null date sentinel.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The calendar year.
    ///
    /// Must not be called on the null date.
    pub fn year(self) -> i32 {
        self.naive().year()
    }

    /// The calendar month.
    ///
    /// Must not be called on the null date.
    pub fn month(self) -> Month {
        Month::from_number(self.naive().month() as u8).expect("chrono month is in 1..=12")
    }

    /// The day of the month (1–31).
    ///
    /// Must not be called on the null date.
    pub fn day_of_month(self) -> u32 {
        self.naive().day()
    }

    /// The day of the year (1–366).
    ///
    /// Must not be called on the null date.
    pub fn day_of_year(self) -> u32 {
        self.naive().ordinal()
    }

    /// The day of the week.
    ///
    /// Must not be called on the null date.
    pub fn weekday(self) -> Weekday {
        Weekday::from_ordinal(self.naive().weekday().number_from_monday() as u8)
            .expect("chrono weekday is in 1..=7")
    }

    /// The last calendar day of this date's month.
    pub fn end_of_month(self) -> Self {
        let naive = self.naive();
        let first_of_next = NaiveDate::from_ymd_opt(
            match naive.month() {
                12 => naive.year() + 1,
                _ => naive.year(),
            },
            match naive.month() {
                12 => 1,
                m => m + 1,
            },
            1,
        )
        .expect("first of month is always valid");
        Date((first_of_next - epoch()).num_days() as i32 - 1)
    }

    /// `true` if this is the last calendar day of its month.
    pub fn is_end_of_month(self) -> bool {
        self == self.end_of_month()
    }

    // ── Arithmetic ───────────────────────────────────────────────────────

    /// The date `n` calendar days later (earlier for negative `n`).
    pub fn add_days(self, n: i32) -> Result<Self> {
        Self::from_serial(self.0 + n)
    }

    /// Advance by `n` units of calendar time.
    ///
    /// Month and year steps clamp the day of month when the target month is
    /// shorter (January 31st plus one month is the end of February).
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(n),
            TimeUnit::Weeks => self.add_days(n * 7),
            TimeUnit::Months => {
                let naive = self.naive();
                let shifted = if n >= 0 {
                    naive.checked_add_months(Months::new(n as u32))
                } else {
                    naive.checked_sub_months(Months::new(n.unsigned_abs()))
                }
                .ok_or_else(|| Error::Date(format!("cannot advance {self:?} by {n} months")))?;
                Self::from_naive(shifted)
            }
            TimeUnit::Years => self.advance(
                n.checked_mul(12)
                    .ok_or_else(|| Error::Date(format!("year shift {n} overflows")))?,
                TimeUnit::Months,
            ),
        }
    }

    /// Advance by a [`Period`].
    pub fn add_period(self, period: Period) -> Result<Self> {
        self.advance(period.length, period.unit)
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl std::ops::Add<i32> for Date {
    type Output = Self;
    fn add(self, days: i32) -> Self {
        self.add_days(days).expect("date addition out of range")
    }
}

impl std::ops::Sub<i32> for Date {
    type Output = Self;
    fn sub(self, days: i32) -> Self {
        self.add_days(-days).expect("date subtraction out of range")
    }
}

impl std::ops::Add<Period> for Date {
    type Output = Self;
    fn add(self, period: Period) -> Self {
        self.add_period(period).expect("date addition out of range")
    }
}

impl std::ops::Sub<Period> for Date {
    type Output = Self;
    fn sub(self, period: Period) -> Self {
        self.add_period(-period).expect("date subtraction out of range")
    }
}

/// Day difference; positive when `self` is the later date.
impl std::ops::Sub<Date> for Date {
    type Output = i32;
    fn sub(self, other: Date) -> i32 {
        self.0 - other.0
    }
}

// ── Formatting ────────────────────────────────────────────────────────────────

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "null date");
        }
        let naive = self.naive();
        write!(f, "{:04}-{:02}-{:02}", naive.year(), naive.month(), naive.day())
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "Date(null)");
        }
        write!(f, "Date({self})")
    }
}

/// Whether `year` is a leap year in the Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
