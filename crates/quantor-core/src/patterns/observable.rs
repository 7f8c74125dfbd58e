//! Observer / Observable bus.
//!
//! The notification backbone of the valuation graph:
//! * an **Observable** publishes unvalued change notifications,
//! * an **Observer** reacts by having its `update()` invoked.
//!
//! Registration and notification work through `&self` references because
//! observables are shared via `Arc` throughout the graph; the observer list
//! lives behind a `Mutex` so an observable may be registered with, notified,
//! and deregistered from concurrently.
//!
//! `notify` snapshots the observer list inside a short critical section and
//! dispatches *outside* the lock.  This allows an observer to register or
//! deregister (itself or others) from within its own `update()` without
//! deadlocking the publisher and without corrupting the active dispatch:
//! observers added during a dispatch are not called within that dispatch,
//! observers removed during a dispatch may still be called once.

use std::any::Any;
use std::sync::{Arc, Mutex, Weak};

use crate::errors::Result;

/// An object that reacts to change notifications from [`Observable`]s it has
/// subscribed to.
///
/// A failing `update` is logged by the dispatching observable and does not
/// stop the broadcast to the remaining observers.
pub trait Observer: Send + Sync {
    /// Called by every observable this observer is registered with when that
    /// observable changes state.
    fn update(&self) -> Result<()>;
}

/// An object that can notify interested parties when it changes.
///
/// Implementors embed an [`ObservableImpl`] and delegate to it.
pub trait Observable {
    /// Register an observer to receive future change notifications.
    fn register_observer(&self, observer: Weak<dyn Observer>);

    /// Remove a previously registered observer.
    fn unregister_observer(&self, observer: &Weak<dyn Observer>);

    /// Remove every registered observer.
    fn unregister_all_observers(&self);

    /// Number of currently registered (live) observers.
    fn observer_count(&self) -> usize;

    /// A read-only snapshot of the current observer list.
    fn observers(&self) -> Vec<Weak<dyn Observer>>;

    /// Notify all currently registered observers that this object changed.
    fn notify_observers(&self);

    /// Notify with an opaque payload.
    ///
    /// Observers receive only `update()` either way; the payload exists for
    /// interface compatibility and is not transported.
    fn notify_observers_with(&self, _payload: &dyn Any) {
        self.notify_observers();
    }
}

/// Embeddable observer-list management.
///
/// Holds `Weak` references so that an observable never keeps its observers
/// alive; dead references are pruned whenever the list is walked.
pub struct ObservableImpl {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl Default for ObservableImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableImpl {
    /// Create a new, empty observer list.
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Weak<dyn Observer>>> {
        self.observers.lock().expect("observer list mutex poisoned")
    }

    /// Register an observer.  Observers are notified in registration order.
    pub fn register(&self, observer: Weak<dyn Observer>) {
        self.lock().push(observer);
    }

    /// Remove an observer (by pointer identity of the `Weak`).
    pub fn unregister(&self, observer: &Weak<dyn Observer>) {
        self.lock().retain(|o| !Weak::ptr_eq(o, observer));
    }

    /// Remove every observer.
    pub fn unregister_all(&self) {
        self.lock().clear();
    }

    /// Number of live observers.
    pub fn count(&self) -> usize {
        self.lock().iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Read-only snapshot of the current observer list.
    pub fn snapshot(&self) -> Vec<Weak<dyn Observer>> {
        self.lock().clone()
    }

    /// Notify all live observers, pruning dead `Weak` references.
    ///
    /// The list is copied under the lock and dispatch happens outside it, so
    /// observers may re-enter `register`/`unregister` from `update()`.  An
    /// observer that fails is reported through the logging side channel and
    /// the broadcast continues.
    pub fn notify(&self) {
        let snapshot: Vec<Arc<dyn Observer>> = {
            let mut guard = self.lock();
            guard.retain(|w| w.strong_count() > 0);
            guard.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in snapshot {
            if let Err(e) = observer.update() {
                tracing::error!(error = %e, "observer update failed during notification");
            }
        }
    }

    /// Notify with an opaque payload.
    ///
    /// Observers receive only `update()`; the payload is accepted for
    /// interface compatibility and is not transported.
    pub fn notify_with(&self, _payload: &dyn Any) {
        self.notify();
    }
}

/// A leaf node of the graph holding a single value of type `T`.
///
/// Assigning a new value publishes a notification *unconditionally*:
/// assignment is treated as an event even when the new value compares equal
/// to the old one.
pub struct ObservableValue<T> {
    value: Mutex<T>,
    observable: ObservableImpl,
}

impl<T: Clone> ObservableValue<T> {
    /// Create a new node with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            observable: ObservableImpl::new(),
        }
    }

    /// Return a copy of the current value.  Reading does not notify.
    pub fn value(&self) -> T {
        self.value
            .lock()
            .expect("observable value mutex poisoned")
            .clone()
    }

    /// Replace the value and notify all registered observers.
    pub fn assign(&self, value: T) {
        *self.value.lock().expect("observable value mutex poisoned") = value;
        self.observable.notify();
    }

    /// Copy the value out of `other` and notify all registered observers.
    pub fn assign_from(&self, other: &ObservableValue<T>) {
        self.assign(other.value());
    }
}

impl<T> Observable for ObservableValue<T> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingObserver {
        count: AtomicU32,
    }

    impl CountingObserver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                count: AtomicU32::new(0),
            })
        }

        fn count(&self) -> u32 {
            self.count.load(Ordering::Relaxed)
        }
    }

    impl Observer for CountingObserver {
        fn update(&self) -> Result<()> {
            self.count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn as_observer(o: &Arc<CountingObserver>) -> Weak<dyn Observer> {
        Arc::downgrade(o) as Weak<dyn Observer>
    }

    #[test]
    fn register_and_notify() {
        let obs = CountingObserver::new();
        let observable = ObservableImpl::new();
        observable.register(as_observer(&obs));
        observable.notify();
        observable.notify();
        assert_eq!(obs.count(), 2);
    }

    #[test]
    fn unregister_stops_notifications() {
        let obs = CountingObserver::new();
        let weak = as_observer(&obs);
        let observable = ObservableImpl::new();
        observable.register(weak.clone());
        observable.unregister(&weak);
        observable.notify();
        assert_eq!(obs.count(), 0);
    }

    #[test]
    fn dead_observers_are_pruned() {
        let observable = ObservableImpl::new();
        {
            let obs = CountingObserver::new();
            observable.register(as_observer(&obs));
        }
        observable.notify();
        assert_eq!(observable.count(), 0);
    }

    #[test]
    fn notification_order_is_registration_order() {
        struct OrderedObserver {
            id: u32,
            order: Arc<Mutex<Vec<u32>>>,
        }
        impl Observer for OrderedObserver {
            fn update(&self) -> Result<()> {
                self.order.lock().unwrap().push(self.id);
                Ok(())
            }
        }

        let order = Arc::new(Mutex::new(Vec::new()));
        let observable = ObservableImpl::new();
        let observers: Vec<Arc<OrderedObserver>> = (0..4)
            .map(|id| {
                Arc::new(OrderedObserver {
                    id,
                    order: order.clone(),
                })
            })
            .collect();
        for o in &observers {
            observable.register(Arc::downgrade(o) as Weak<dyn Observer>);
        }
        observable.notify();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    /// An observer that deregisters another observer from inside its own
    /// `update()`.  The deregistered observer may still see the current
    /// dispatch (it was in the snapshot) but must not see the next one,
    /// and the remaining observers must all run.
    #[test]
    fn unregister_during_dispatch_is_safe() {
        struct Remover {
            target: Mutex<Option<Weak<dyn Observer>>>,
            from: Arc<ObservableValue<f64>>,
        }
        impl Observer for Remover {
            fn update(&self) -> Result<()> {
                if let Some(target) = self.target.lock().unwrap().take() {
                    self.from.unregister_observer(&target);
                }
                Ok(())
            }
        }

        let value = Arc::new(ObservableValue::new(1.0));
        let b = CountingObserver::new();
        let c = CountingObserver::new();
        let a = Arc::new(Remover {
            target: Mutex::new(Some(as_observer(&b))),
            from: value.clone(),
        });

        value.register_observer(Arc::downgrade(&a) as Weak<dyn Observer>);
        value.register_observer(as_observer(&b));
        value.register_observer(as_observer(&c));

        value.assign(2.0);
        let b_after_first = b.count();
        assert!(b_after_first <= 1, "B ran more than once in one dispatch");
        assert_eq!(c.count(), 1, "C must still be notified");

        value.assign(3.0);
        assert_eq!(b.count(), b_after_first, "B was notified after removal");
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn register_during_dispatch_defers_to_next_notify() {
        struct Registrar {
            newcomer: Arc<CountingObserver>,
            to: Arc<ObservableValue<f64>>,
            done: AtomicU32,
        }
        impl Observer for Registrar {
            fn update(&self) -> Result<()> {
                if self.done.swap(1, Ordering::Relaxed) == 0 {
                    self.to.register_observer(as_observer(&self.newcomer));
                }
                Ok(())
            }
        }

        let value = Arc::new(ObservableValue::new(1.0));
        let newcomer = CountingObserver::new();
        let registrar = Arc::new(Registrar {
            newcomer: newcomer.clone(),
            to: value.clone(),
            done: AtomicU32::new(0),
        });
        value.register_observer(Arc::downgrade(&registrar) as Weak<dyn Observer>);

        value.assign(2.0);
        assert_eq!(newcomer.count(), 0, "late registration saw current dispatch");
        value.assign(3.0);
        assert_eq!(newcomer.count(), 1);
    }

    #[test]
    fn failing_observer_does_not_abort_broadcast() {
        struct Failing;
        impl Observer for Failing {
            fn update(&self) -> Result<()> {
                Err(crate::errors::Error::Numeric("exploded".into()))
            }
        }

        let observable = ObservableImpl::new();
        let failing = Arc::new(Failing);
        let counting = CountingObserver::new();
        observable.register(Arc::downgrade(&failing) as Weak<dyn Observer>);
        observable.register(as_observer(&counting));
        observable.notify();
        assert_eq!(counting.count(), 1);
    }

    #[test]
    fn observable_value_publishes_unconditionally() {
        let obs = CountingObserver::new();
        let value = ObservableValue::new(1.00_f64);
        value.register_observer(as_observer(&obs));
        value.assign(1.01);
        assert_eq!(obs.count(), 1);
        // Same value again: assignment is an event in its own right.
        value.assign(1.01);
        assert_eq!(obs.count(), 2);
        assert!((value.value() - 1.01).abs() < f64::EPSILON);
    }

    #[test]
    fn assign_from_copies_and_publishes() {
        let obs = CountingObserver::new();
        let a = ObservableValue::new(1);
        let b = ObservableValue::new(7);
        a.register_observer(as_observer(&obs));
        a.assign_from(&b);
        assert_eq!(a.value(), 7);
        assert_eq!(obs.count(), 1);
    }
}
