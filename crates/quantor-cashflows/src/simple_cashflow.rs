//! A fixed payment at a fixed date.

use std::sync::Weak;

use quantor_core::errors::Result;
use quantor_core::{Observable, ObservableImpl, Observer, Real};
use quantor_time::Date;

use crate::cashflow::{todays_cashflow_inclusion, CashFlow};
use crate::event::Event;

/// A predetermined cash flow: a known amount on a known date.
pub struct SimpleCashFlow {
    amount: Real,
    payment_date: Date,
    observable: ObservableImpl,
}

impl SimpleCashFlow {
    /// Create a cash flow paying `amount` at `payment_date`.
    pub fn new(amount: Real, payment_date: Date) -> Self {
        Self {
            amount,
            payment_date,
            observable: ObservableImpl::new(),
        }
    }
}

impl Observable for SimpleCashFlow {
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

impl Event for SimpleCashFlow {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn include_reference_date_override(&self, ref_date: Date) -> Option<bool> {
        todays_cashflow_inclusion(ref_date)
    }
}

impl CashFlow for SimpleCashFlow {
    fn amount(&self) -> Result<Real> {
        Ok(self.amount)
    }
}
