//! # quantor-time
//!
//! Dates, calendars, day counters, periods, interest-rate algebra, and the
//! per-thread valuation settings (which live here because the evaluation
//! date is a [`date::Date`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Actual/Actual day-count family.
pub mod actual_actual;

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Calendar trait and minimal built-in calendars.
pub mod calendar;

/// `Date` type.
pub mod date;

/// `DayCounter` trait and simple day-count conventions.
pub mod day_counter;

/// Payment / event frequency.
pub mod frequency;

/// Interest-rate compounding algebra.
pub mod interest_rate;

/// `Month` — month of the year.
pub mod month;

/// `Period` — a time span in a `TimeUnit`.
pub mod period;

/// Per-thread valuation settings.
pub mod settings;

/// `TimeUnit` — days, weeks, months, years.
pub mod time_unit;

/// `Weekday` — day of the week.
pub mod weekday;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use actual_actual::{ActualActual, ActualActualConvention};
pub use business_day_convention::BusinessDayConvention;
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use date::Date;
pub use day_counter::{Actual360, Actual365Fixed, Actual365NoLeap, DayCounter};
pub use frequency::Frequency;
pub use interest_rate::InterestRate;
pub use month::Month;
pub use period::Period;
pub use settings::{EvaluationDate, Settings};
pub use time_unit::TimeUnit;
pub use weekday::Weekday;
