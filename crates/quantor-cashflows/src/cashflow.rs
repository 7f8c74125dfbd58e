//! Cash flows.

use std::cmp::Ordering;

use quantor_core::errors::Result;
use quantor_core::Real;
use quantor_time::{Date, Settings};

use crate::event::Event;

/// A dated payment.
pub trait CashFlow: Event {
    /// The undiscounted amount paid at [`date`][Event::date].
    fn amount(&self) -> Result<Real>;
}

/// The today's-cashflows override for the occurrence test.
///
/// When the reference date is this thread's evaluation date, the
/// `include_todays_cashflows` setting replaces the generic
/// reference-date-events default.  Concrete cash flows wire this into
/// [`Event::include_reference_date_override`].
pub fn todays_cashflow_inclusion(ref_date: Date) -> Option<bool> {
    Settings::with(|s| {
        if ref_date == s.evaluation_date() {
            Some(s.include_todays_cashflows())
        } else {
            None
        }
    })
}

/// Order two cash flows by date, then by amount.
///
/// Failing amounts sort first, so a stream with a broken leg surfaces it
/// early when scanned in order.
pub fn compare_cash_flows(a: &dyn CashFlow, b: &dyn CashFlow) -> Ordering {
    match a.date().cmp(&b.date()) {
        Ordering::Equal => match (a.amount(), b.amount()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Err(_), Ok(_)) => Ordering::Less,
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Err(_)) => Ordering::Equal,
        },
        other => other,
    }
}
