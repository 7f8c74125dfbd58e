//! Per-thread valuation settings.
//!
//! Every thread owns an independent [`Settings`] instance reached through
//! [`Settings::with`]; threads never observe each other's settings.  The
//! evaluation date is an observable node so that instruments and curves go
//! stale when it moves, and it comes in two modes:
//!
//! * *floating* (the initial mode) — every read returns today's date, so
//!   the value silently rolls at midnight;
//! * *anchored* — reads return a fixed date until it is reset.

use std::cell::Cell;
use std::sync::{Arc, Mutex, Weak};

use quantor_core::{Observable, ObservableImpl, Observer};

use crate::date::Date;

/// The observable evaluation-date slot.
///
/// Readers that must react to the date moving subscribe to this node;
/// assigning a date (or resetting to floating) publishes a notification.
pub struct EvaluationDate {
    anchor: Mutex<Option<Date>>,
    observable: ObservableImpl,
}

impl EvaluationDate {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            anchor: Mutex::new(None),
            observable: ObservableImpl::new(),
        })
    }

    fn anchor(&self) -> Option<Date> {
        *self.anchor.lock().expect("evaluation date mutex poisoned")
    }

    /// The current evaluation date: the anchored date, or today when
    /// floating.
    pub fn value(&self) -> Date {
        self.anchor().unwrap_or_else(Date::todays_date)
    }

    /// `true` while no date is anchored.
    pub fn is_floating(&self) -> bool {
        self.anchor().is_none()
    }

    fn assign(&self, date: Option<Date>) {
        *self.anchor.lock().expect("evaluation date mutex poisoned") = date;
        self.observable.notify();
    }
}

impl Observable for EvaluationDate {
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

/// Per-thread valuation configuration.
pub struct Settings {
    evaluation_date: Arc<EvaluationDate>,
    include_reference_date_events: Cell<bool>,
    include_todays_cashflows: Cell<bool>,
    enforces_todays_historic_fixings: Cell<bool>,
}

thread_local! {
    static SETTINGS: Settings = Settings::new();
}

impl Settings {
    fn new() -> Self {
        Self {
            evaluation_date: EvaluationDate::new(),
            include_reference_date_events: Cell::new(true),
            include_todays_cashflows: Cell::new(true),
            enforces_todays_historic_fixings: Cell::new(false),
        }
    }

    /// Run `f` against this thread's settings.
    pub fn with<R>(f: impl FnOnce(&Settings) -> R) -> R {
        SETTINGS.with(|settings| f(settings))
    }

    /// The current evaluation date.
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date.value()
    }

    /// The observable evaluation-date node, for subscribing.
    pub fn evaluation_date_node(&self) -> Arc<EvaluationDate> {
        Arc::clone(&self.evaluation_date)
    }

    /// Anchor the evaluation date to `date` and notify subscribers.
    pub fn set_evaluation_date(&self, date: Date) {
        self.evaluation_date.assign(Some(date));
    }

    /// Stop the evaluation date from rolling at midnight.
    ///
    /// Anchors today's date when floating; a no-op when a date is already
    /// anchored.
    pub fn anchor_evaluation_date(&self) {
        if self.evaluation_date.is_floating() {
            self.evaluation_date.assign(Some(Date::todays_date()));
        }
    }

    /// Return the evaluation date to floating mode (reads follow the
    /// system clock again) and notify subscribers.
    pub fn reset_evaluation_date(&self) {
        self.evaluation_date.assign(None);
    }

    /// Whether events dated on the reference date count as not yet
    /// occurred.
    pub fn include_reference_date_events(&self) -> bool {
        self.include_reference_date_events.get()
    }

    /// Set [`include_reference_date_events`][Self::include_reference_date_events].
    pub fn set_include_reference_date_events(&self, value: bool) {
        self.include_reference_date_events.set(value);
    }

    /// Whether cash flows paying today enter an instrument's value.
    pub fn include_todays_cashflows(&self) -> bool {
        self.include_todays_cashflows.get()
    }

    /// Set [`include_todays_cashflows`][Self::include_todays_cashflows].
    pub fn set_include_todays_cashflows(&self, value: bool) {
        self.include_todays_cashflows.set(value);
    }

    /// Whether fixings dated today must be resolved from history instead of
    /// being forecast.
    pub fn enforces_todays_historic_fixings(&self) -> bool {
        self.enforces_todays_historic_fixings.get()
    }

    /// Set [`enforces_todays_historic_fixings`][Self::enforces_todays_historic_fixings].
    pub fn set_enforces_todays_historic_fixings(&self, value: bool) {
        self.enforces_todays_historic_fixings.set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantor_core::errors::Result;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingObserver {
        count: AtomicU32,
    }

    impl Observer for CountingObserver {
        fn update(&self) -> Result<()> {
            self.count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn reset_settings() {
        Settings::with(|s| {
            s.reset_evaluation_date();
            s.set_include_reference_date_events(true);
            s.set_include_todays_cashflows(true);
            s.set_enforces_todays_historic_fixings(false);
        });
    }

    #[test]
    fn floating_by_default() {
        reset_settings();
        Settings::with(|s| {
            assert!(s.evaluation_date_node().is_floating());
            assert_eq!(s.evaluation_date(), Date::todays_date());
        });
    }

    #[test]
    fn anchored_reads_are_stable() {
        reset_settings();
        let fixed = Date::from_ymd(2025, 6, 2).unwrap();
        Settings::with(|s| {
            s.set_evaluation_date(fixed);
            assert!(!s.evaluation_date_node().is_floating());
            assert_eq!(s.evaluation_date(), fixed);
            s.reset_evaluation_date();
            assert!(s.evaluation_date_node().is_floating());
        });
    }

    #[test]
    fn anchoring_is_a_noop_when_already_anchored() {
        reset_settings();
        let fixed = Date::from_ymd(2025, 6, 2).unwrap();
        let observer = std::sync::Arc::new(CountingObserver {
            count: AtomicU32::new(0),
        });
        Settings::with(|s| {
            s.set_evaluation_date(fixed);
            s.evaluation_date_node()
                .register_observer(std::sync::Arc::downgrade(&observer) as Weak<dyn Observer>);
            s.anchor_evaluation_date();
            assert_eq!(s.evaluation_date(), fixed, "anchored date must survive");
            assert_eq!(observer.count.load(Ordering::Relaxed), 0, "no-op must not publish");
        });
    }

    #[test]
    fn anchoring_fixes_todays_date_when_floating() {
        reset_settings();
        Settings::with(|s| {
            s.anchor_evaluation_date();
            assert!(!s.evaluation_date_node().is_floating());
            assert_eq!(s.evaluation_date(), Date::todays_date());
        });
    }

    #[test]
    fn date_changes_notify_subscribers() {
        reset_settings();
        let observer = std::sync::Arc::new(CountingObserver {
            count: AtomicU32::new(0),
        });
        Settings::with(|s| {
            s.evaluation_date_node()
                .register_observer(std::sync::Arc::downgrade(&observer) as Weak<dyn Observer>);
            s.set_evaluation_date(Date::from_ymd(2025, 6, 2).unwrap());
            s.set_evaluation_date(Date::from_ymd(2025, 6, 3).unwrap());
            s.reset_evaluation_date();
        });
        assert_eq!(observer.count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn settings_are_thread_local() {
        reset_settings();
        let fixed = Date::from_ymd(2030, 1, 15).unwrap();
        Settings::with(|s| s.set_evaluation_date(fixed));

        let handle = std::thread::spawn(|| {
            Settings::with(|s| {
                // A fresh thread starts floating, unaffected by the writer
                // thread above.
                assert!(s.evaluation_date_node().is_floating());
                s.set_evaluation_date(Date::from_ymd(2031, 7, 1).unwrap());
            });
        });
        handle.join().unwrap();

        Settings::with(|s| assert_eq!(s.evaluation_date(), fixed));
    }

    #[test]
    fn flags_default_and_flip() {
        reset_settings();
        Settings::with(|s| {
            assert!(s.include_reference_date_events());
            assert!(s.include_todays_cashflows());
            assert!(!s.enforces_todays_historic_fixings());
            s.set_enforces_todays_historic_fixings(true);
            assert!(s.enforces_todays_historic_fixings());
        });
    }
}
