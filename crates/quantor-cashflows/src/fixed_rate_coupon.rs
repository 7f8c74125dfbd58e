//! Coupon paying a fixed interest rate.

use std::sync::Weak;

use quantor_core::errors::Result;
use quantor_core::{Observable, ObservableImpl, Observer, Rate, Real};
use quantor_time::{Date, DayCounter, InterestRate};

use crate::cashflow::{todays_cashflow_inclusion, CashFlow};
use crate::coupon::Coupon;
use crate::event::Event;

/// A coupon accruing a fixed [`InterestRate`] over its period.
pub struct FixedRateCoupon {
    nominal: Real,
    payment_date: Date,
    accrual_start: Date,
    accrual_end: Date,
    reference_start: Date,
    reference_end: Date,
    rate: InterestRate,
    observable: ObservableImpl,
}

impl FixedRateCoupon {
    /// Create a fixed-rate coupon.
    ///
    /// `reference_start` / `reference_end` may be null; they only matter
    /// for ISMA-style day counting.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        nominal: Real,
        payment_date: Date,
        rate: InterestRate,
        accrual_start: Date,
        accrual_end: Date,
        reference_start: Date,
        reference_end: Date,
    ) -> Self {
        Self {
            nominal,
            payment_date,
            accrual_start,
            accrual_end,
            reference_start,
            reference_end,
            rate,
            observable: ObservableImpl::new(),
        }
    }

    /// The full interest rate carried by this coupon.
    pub fn interest_rate(&self) -> &InterestRate {
        &self.rate
    }
}

impl Observable for FixedRateCoupon {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.observable.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.observable.unregister(observer);
    }

    fn unregister_all_observers(&self) {
        self.observable.unregister_all();
    }

    fn observer_count(&self) -> usize {
        self.observable.count()
    }

    fn observers(&self) -> Vec<Weak<dyn Observer>> {
        self.observable.snapshot()
    }

    fn notify_observers(&self) {
        self.observable.notify();
    }
}

impl Event for FixedRateCoupon {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn include_reference_date_override(&self, ref_date: Date) -> Option<bool> {
        todays_cashflow_inclusion(ref_date)
    }
}

impl CashFlow for FixedRateCoupon {
    fn amount(&self) -> Result<Real> {
        let compound = self.rate.compound_factor_between(
            self.accrual_start,
            self.accrual_end,
            self.reference_start,
            self.reference_end,
        )?;
        Ok(self.nominal * (compound - 1.0))
    }
}

impl Coupon for FixedRateCoupon {
    fn nominal(&self) -> Real {
        self.nominal
    }

    fn accrual_start_date(&self) -> Date {
        self.accrual_start
    }

    fn accrual_end_date(&self) -> Date {
        self.accrual_end
    }

    fn reference_period_start(&self) -> Date {
        self.reference_start
    }

    fn reference_period_end(&self) -> Date {
        self.reference_end
    }

    fn rate(&self) -> Rate {
        self.rate.rate()
    }

    fn day_counter(&self) -> &dyn DayCounter {
        &**self.rate.day_counter()
    }

    fn accrued_amount(&self, date: Date) -> Result<Real> {
        if date <= self.accrual_start || date > self.payment_date {
            return Ok(0.0);
        }
        let up_to = date.min(self.accrual_end);
        let compound = self.rate.compound_factor_between(
            self.accrual_start,
            up_to,
            self.reference_start,
            self.reference_end,
        )?;
        Ok(self.nominal * (compound - 1.0))
    }
}
