//! Process-wide registry of historical fixings.
//!
//! One registry per process maps an index name to its date-ordered fixing
//! series.  Structural changes are serialized behind a mutex; per-name
//! notifier nodes let readers subscribe to series replacement without
//! holding a reference to any particular series value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use quantor_core::{define_singleton, Observable, ObservableImpl, Observer, Real, TimeSeries};
use quantor_time::Date;

/// A fixing history: date-ordered index observations.
pub type FixingHistory = TimeSeries<Date, Real>;

/// Observable node attached to one registry name.
///
/// Re-emits whenever the series stored under that name is replaced,
/// cleared, or bulk-updated.
pub struct HistoryNotifier {
    observable: ObservableImpl,
}

impl HistoryNotifier {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            observable: ObservableImpl::new(),
        })
    }
}

impl Observable for HistoryNotifier {
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

/// The process-wide fixing registry.
pub struct IndexManager {
    histories: Mutex<HashMap<String, FixingHistory>>,
    notifiers: Mutex<HashMap<String, Arc<HistoryNotifier>>>,
}

define_singleton!(
    INDEX_MANAGER,
    IndexManager,
    IndexManager {
        histories: Mutex::new(HashMap::new()),
        notifiers: Mutex::new(HashMap::new()),
    }
);

impl IndexManager {
    /// The process-wide instance.
    pub fn instance() -> &'static IndexManager {
        &INDEX_MANAGER
    }

    fn lock_histories(&self) -> std::sync::MutexGuard<'_, HashMap<String, FixingHistory>> {
        self.histories.lock().expect("index registry mutex poisoned")
    }

    fn lock_notifiers(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<HistoryNotifier>>> {
        self.notifiers.lock().expect("index notifier mutex poisoned")
    }

    /// A copy of the series stored under `name`; empty when absent.
    pub fn history(&self, name: &str) -> FixingHistory {
        self.lock_histories().get(name).cloned().unwrap_or_default()
    }

    /// Replace the series stored under `name` and notify its subscribers.
    pub fn set_history(&self, name: &str, history: FixingHistory) {
        self.lock_histories().insert(name.to_string(), history);
        self.emit(name);
    }

    /// `true` iff a series exists under `name` and holds at least one point.
    pub fn has_history(&self, name: &str) -> bool {
        self.lock_histories()
            .get(name)
            .is_some_and(|series| !series.is_empty())
    }

    /// Remove the series stored under `name` and notify its subscribers.
    pub fn clear_history(&self, name: &str) {
        let removed = self.lock_histories().remove(name).is_some();
        if removed {
            self.emit(name);
        }
    }

    /// Remove every stored series and notify all subscribers.
    pub fn clear_histories(&self) {
        self.lock_histories().clear();
        let notifiers: Vec<Arc<HistoryNotifier>> =
            self.lock_notifiers().values().cloned().collect();
        for notifier in notifiers {
            notifier.notify_observers();
        }
    }

    /// Names with at least one stored point.
    pub fn histories(&self) -> Vec<String> {
        self.lock_histories()
            .iter()
            .filter(|(_, series)| !series.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// The observable node for `name`, created on first request.
    ///
    /// Subscribers survive clearing and re-seeding of the series.
    pub fn notifier(&self, name: &str) -> Arc<HistoryNotifier> {
        self.lock_notifiers()
            .entry(name.to_string())
            .or_insert_with(HistoryNotifier::new)
            .clone()
    }

    /// Notify outside the registry lock: an observer may re-enter the
    /// manager from `update()`.
    fn emit(&self, name: &str) {
        let notifier = self.lock_notifiers().get(name).cloned();
        if let Some(notifier) = notifier {
            notifier.notify_observers();
        }
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

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    // The registry is process-wide and tests run concurrently: every test
    // works on its own uniquely-named series.

    #[test]
    fn history_round_trip() {
        let manager = IndexManager::instance();
        let name = "TestIndex-round-trip";
        assert!(!manager.has_history(name));
        assert!(manager.history(name).is_empty());

        let mut series = FixingHistory::new();
        series.insert(date(2025, 6, 2), 0.034);
        manager.set_history(name, series);
        assert!(manager.has_history(name));
        assert_eq!(
            manager.history(name).get(&date(2025, 6, 2)).copied(),
            Some(0.034)
        );

        manager.clear_history(name);
        assert!(!manager.has_history(name));
    }

    #[test]
    fn empty_series_is_not_a_history() {
        let manager = IndexManager::instance();
        let name = "TestIndex-empty";
        manager.set_history(name, FixingHistory::new());
        assert!(!manager.has_history(name), "empty series must not count");
        manager.clear_history(name);
    }

    #[test]
    fn notifier_emits_on_replacement() {
        let manager = IndexManager::instance();
        let name = "TestIndex-notify";
        let observer = Arc::new(CountingObserver {
            count: AtomicU32::new(0),
        });
        manager
            .notifier(name)
            .register_observer(Arc::downgrade(&observer) as Weak<dyn Observer>);

        let mut series = FixingHistory::new();
        series.insert(date(2025, 6, 2), 0.01);
        manager.set_history(name, series.clone());
        assert_eq!(observer.count.load(Ordering::Relaxed), 1);

        series.insert(date(2025, 6, 3), 0.02);
        manager.set_history(name, series);
        assert_eq!(observer.count.load(Ordering::Relaxed), 2);

        manager.clear_history(name);
        assert_eq!(observer.count.load(Ordering::Relaxed), 3);

        // Clearing an absent series emits nothing.
        manager.clear_history(name);
        assert_eq!(observer.count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn notifier_survives_clearing() {
        let manager = IndexManager::instance();
        let name = "TestIndex-survive";
        let observer = Arc::new(CountingObserver {
            count: AtomicU32::new(0),
        });
        manager
            .notifier(name)
            .register_observer(Arc::downgrade(&observer) as Weak<dyn Observer>);

        let mut series = FixingHistory::new();
        series.insert(date(2025, 6, 2), 0.01);
        manager.set_history(name, series);
        manager.clear_history(name);

        let mut reseeded = FixingHistory::new();
        reseeded.insert(date(2025, 6, 4), 0.03);
        manager.set_history(name, reseeded);
        assert_eq!(observer.count.load(Ordering::Relaxed), 3);
        manager.clear_history(name);
    }
}
