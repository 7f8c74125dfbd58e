//! Coupons: cash flows accruing over a period.

use quantor_core::errors::Result;
use quantor_core::{Rate, Real, Time};
use quantor_time::{Date, DayCounter};

use crate::cashflow::CashFlow;

/// A cash flow accruing between two dates.
///
/// The reference period matters only under Actual/Actual (ISMA); for every
/// other day counter the accrual dates alone drive the year fraction, and
/// implementations return [`Date::NULL`] for the reference bounds.
pub trait Coupon: CashFlow {
    /// The notional the coupon accrues on.
    fn nominal(&self) -> Real;

    /// Start of the accrual period.
    fn accrual_start_date(&self) -> Date;

    /// End of the accrual period.
    fn accrual_end_date(&self) -> Date;

    /// Start of the reference period, or null.
    fn reference_period_start(&self) -> Date {
        Date::NULL
    }

    /// End of the reference period, or null.
    fn reference_period_end(&self) -> Date {
        Date::NULL
    }

    /// The accrued rate.
    fn rate(&self) -> Rate;

    /// The day counter measuring accrual time.
    fn day_counter(&self) -> &dyn DayCounter;

    /// Accrual period as a fraction of a year.
    fn accrual_period(&self) -> Result<Time> {
        self.day_counter().year_fraction(
            self.accrual_start_date(),
            self.accrual_end_date(),
            self.reference_period_start(),
            self.reference_period_end(),
        )
    }

    /// Accrual period in days.
    fn accrual_days(&self) -> i64 {
        self.day_counter()
            .day_count(self.accrual_start_date(), self.accrual_end_date())
    }

    /// The amount accrued from the accrual start to `date`.
    ///
    /// Zero outside the accrual period.
    fn accrued_amount(&self, date: Date) -> Result<Real>;
}
