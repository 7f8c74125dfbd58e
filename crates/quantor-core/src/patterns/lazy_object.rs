//! Calculation on demand with result caching.
//!
//! A [`LazyObject`] sits in the middle of the valuation graph: it observes
//! its inputs, caches the outcome of an expensive computation, and goes
//! stale when any input publishes a change.  The constant part of the
//! algorithm (cache management, staleness, freezing) lives here as provided
//! trait methods; implementors supply only
//! [`perform_calculations`][LazyObject::perform_calculations].
//!
//! Notification fan-out is damped: a lazy object forwards an upstream
//! notification only the first time it is invalidated, and stays silent
//! until a recomputation has produced a fresh cached value.  Deep graphs
//! would otherwise re-broadcast every upstream tick quadratically.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::Result;
use crate::patterns::observable::{Observable, Observer};

/// Bookkeeping flags for a [`LazyObject`].
///
/// The flags are atomics only so that lazy nodes can live inside
/// `Arc<dyn Observer>` graphs; a given node is still meant to be driven
/// from one thread at a time, hence the relaxed orderings.
pub struct LazyState {
    calculated: AtomicBool,
    frozen: AtomicBool,
    missed: AtomicBool,
}

impl LazyState {
    /// Create a fresh state: stale, unfrozen.
    pub fn new() -> Self {
        Self {
            calculated: AtomicBool::new(false),
            frozen: AtomicBool::new(false),
            missed: AtomicBool::new(false),
        }
    }

    /// `true` when the cached result is valid.
    pub fn is_calculated(&self) -> bool {
        self.calculated.load(Ordering::Relaxed)
    }

    /// `true` when recalculation and outbound notification are suppressed.
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Relaxed)
    }

    /// Overwrite the cache flag directly.
    ///
    /// For specializations that bypass the normal calculation path, such as
    /// an expired instrument marking itself calculated without pricing.
    pub fn set_calculated(&self, value: bool) {
        self.calculated.store(value, Ordering::Relaxed);
    }

    fn set_frozen(&self, value: bool) {
        self.frozen.store(value, Ordering::Relaxed);
    }
}

impl Default for LazyState {
    fn default() -> Self {
        Self::new()
    }
}

/// A node that caches a computation and invalidates on upstream change.
///
/// Implementors embed a [`LazyState`] (plus an
/// [`ObservableImpl`][crate::patterns::observable::ObservableImpl] for the
/// outbound side), expose them through the accessor methods, and delegate
/// their [`Observer::update`] to the provided [`update`][LazyObject::update]:
///
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use quantor_core::errors::Result;
/// use quantor_core::patterns::lazy_object::{LazyObject, LazyState};
/// use quantor_core::patterns::observable::{Observable, ObservableImpl, Observer};
///
/// struct Doubler {
///     state: LazyState,
///     observable: ObservableImpl,
///     runs: AtomicU32,
/// }
///
/// impl Observable for Doubler {
///     fn register_observer(&self, o: std::sync::Weak<dyn Observer>) {
///         self.observable.register(o);
///     }
///     fn unregister_observer(&self, o: &std::sync::Weak<dyn Observer>) {
///         self.observable.unregister(o);
///     }
///     fn unregister_all_observers(&self) { self.observable.unregister_all(); }
///     fn observer_count(&self) -> usize { self.observable.count() }
///     fn observers(&self) -> Vec<std::sync::Weak<dyn Observer>> {
///         self.observable.snapshot()
///     }
///     fn notify_observers(&self) { self.observable.notify(); }
/// }
///
/// impl Observer for Doubler {
///     fn update(&self) -> Result<()> { LazyObject::update(self) }
/// }
///
/// impl LazyObject for Doubler {
///     fn lazy_state(&self) -> &LazyState { &self.state }
///     fn perform_calculations(&self) -> Result<()> {
///         self.runs.fetch_add(1, Ordering::Relaxed);
///         Ok(())
///     }
/// }
///
/// let d = Doubler {
///     state: LazyState::new(),
///     observable: ObservableImpl::new(),
///     runs: AtomicU32::new(0),
/// };
/// d.calculate().unwrap();
/// d.calculate().unwrap();
/// assert_eq!(d.runs.load(Ordering::Relaxed), 1);
/// ```
pub trait LazyObject: Observable + Observer {
    /// The cache/freeze flags backing the provided methods.
    fn lazy_state(&self) -> &LazyState;

    /// The actual (expensive) computation.
    ///
    /// Called by [`calculate`][Self::calculate] when the cache is stale.
    /// On error the node is left stale so the next read retries.
    fn perform_calculations(&self) -> Result<()>;

    /// Ensure results are up to date, recomputing if the cache is stale.
    ///
    /// The `calculated` flag is raised *before* the computation runs: a
    /// self-referential computation (as in curve bootstrapping) that reads
    /// back through this node must see it as calculated or it would recurse
    /// forever.  The flag is rolled back if the computation fails.
    fn calculate(&self) -> Result<()> {
        let state = self.lazy_state();
        if !state.is_calculated() && !state.is_frozen() {
            state.set_calculated(true);
            if let Err(e) = self.perform_calculations() {
                state.set_calculated(false);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Force recalculation of results that would otherwise be cached.
    ///
    /// Not needed when the object is registered as observer of everything
    /// its results depend on; prefer that policy where possible.  Observers
    /// are notified even if the computation fails.
    fn recalculate(&self) -> Result<()> {
        let state = self.lazy_state();
        let was_frozen = state.is_frozen();
        state.set_calculated(false);
        state.set_frozen(false);
        let outcome = self.calculate();
        state.set_frozen(was_frozen);
        state.missed.store(false, Ordering::Relaxed);
        self.notify_observers();
        outcome
    }

    /// Constrain the object to return the currently cached results on
    /// successive invocations, even if its inputs change.
    fn freeze(&self) {
        self.lazy_state().set_frozen(true);
    }

    /// Revert [`freeze`][Self::freeze], re-enabling recalculation.
    ///
    /// Publishes one catch-up notification if at least one upstream update
    /// arrived while frozen.
    fn unfreeze(&self) {
        let state = self.lazy_state();
        if state.frozen.swap(false, Ordering::Relaxed)
            && state.missed.swap(false, Ordering::Relaxed)
        {
            self.notify_observers();
        }
    }

    /// `true` if the cached result is valid.
    fn is_calculated(&self) -> bool {
        self.lazy_state().is_calculated()
    }

    /// `true` if recalculation is currently suppressed.
    fn is_frozen(&self) -> bool {
        self.lazy_state().is_frozen()
    }

    /// React to an upstream notification: mark the cache stale and forward
    /// the notification downstream, but only on the first invalidation
    /// since the last recomputation.  Frozen objects forward nothing and
    /// remember that they missed a notification.
    fn update(&self) -> Result<()> {
        let state = self.lazy_state();
        if state.is_frozen() {
            state.missed.store(true, Ordering::Relaxed);
        } else if state.is_calculated() {
            self.notify_observers();
        }
        state.set_calculated(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::observable::ObservableImpl;
    use std::sync::atomic::AtomicU32;
    use std::sync::{Arc, Weak};

    struct TestNode {
        state: LazyState,
        observable: ObservableImpl,
        runs: AtomicU32,
        fail_next: AtomicBool,
    }

    impl TestNode {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                state: LazyState::new(),
                observable: ObservableImpl::new(),
                runs: AtomicU32::new(0),
                fail_next: AtomicBool::new(false),
            })
        }

        fn runs(&self) -> u32 {
            self.runs.load(Ordering::Relaxed)
        }
    }

    impl Observable for TestNode {
        fn register_observer(&self, o: Weak<dyn Observer>) {
            self.observable.register(o);
        }
        fn unregister_observer(&self, o: &Weak<dyn Observer>) {
            self.observable.unregister(o);
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

    impl Observer for TestNode {
        fn update(&self) -> Result<()> {
            LazyObject::update(self)
        }
    }

    impl LazyObject for TestNode {
        fn lazy_state(&self) -> &LazyState {
            &self.state
        }
        fn perform_calculations(&self) -> Result<()> {
            if self.fail_next.swap(false, Ordering::Relaxed) {
                return Err(crate::errors::Error::Numeric("division by zero".into()));
            }
            self.runs.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

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

    #[test]
    fn calculate_caches_until_invalidated() {
        let node = TestNode::new();
        node.calculate().unwrap();
        node.calculate().unwrap();
        assert_eq!(node.runs(), 1);
        Observer::update(&*node).unwrap();
        node.calculate().unwrap();
        assert_eq!(node.runs(), 2);
    }

    #[test]
    fn single_notification_between_recomputations() {
        let node = TestNode::new();
        let downstream = CountingObserver::new();
        node.register_observer(Arc::downgrade(&downstream) as Weak<dyn Observer>);

        node.calculate().unwrap();
        // Three consecutive invalidations with no intervening read:
        Observer::update(&*node).unwrap();
        Observer::update(&*node).unwrap();
        Observer::update(&*node).unwrap();
        assert_eq!(downstream.count(), 1);

        // After a recomputation the next invalidation publishes again.
        node.calculate().unwrap();
        Observer::update(&*node).unwrap();
        assert_eq!(downstream.count(), 2);
    }

    #[test]
    fn update_on_stale_node_publishes_nothing() {
        let node = TestNode::new();
        let downstream = CountingObserver::new();
        node.register_observer(Arc::downgrade(&downstream) as Weak<dyn Observer>);
        Observer::update(&*node).unwrap();
        assert_eq!(downstream.count(), 0);
    }

    #[test]
    fn freeze_suppresses_and_unfreeze_catches_up() {
        let node = TestNode::new();
        let downstream = CountingObserver::new();
        node.register_observer(Arc::downgrade(&downstream) as Weak<dyn Observer>);

        node.calculate().unwrap();
        node.freeze();
        Observer::update(&*node).unwrap();
        Observer::update(&*node).unwrap();
        assert_eq!(downstream.count(), 0, "frozen node must stay silent");
        node.unfreeze();
        assert_eq!(downstream.count(), 1, "one catch-up notification expected");
    }

    #[test]
    fn unfreeze_without_missed_updates_is_silent() {
        let node = TestNode::new();
        let downstream = CountingObserver::new();
        node.register_observer(Arc::downgrade(&downstream) as Weak<dyn Observer>);

        node.calculate().unwrap();
        node.freeze();
        node.unfreeze();
        assert_eq!(downstream.count(), 0);
    }

    #[test]
    fn frozen_node_does_not_recalculate() {
        let node = TestNode::new();
        node.freeze();
        node.calculate().unwrap();
        assert_eq!(node.runs(), 0);
        node.unfreeze();
        node.calculate().unwrap();
        assert_eq!(node.runs(), 1);
    }

    #[test]
    fn failed_calculation_leaves_node_stale() {
        let node = TestNode::new();
        node.fail_next.store(true, Ordering::Relaxed);
        assert!(node.calculate().is_err());
        assert!(!LazyObject::is_calculated(&*node));
        // The next read retries and succeeds.
        node.calculate().unwrap();
        assert_eq!(node.runs(), 1);
        assert!(LazyObject::is_calculated(&*node));
    }

    #[test]
    fn recalculate_forces_and_notifies() {
        let node = TestNode::new();
        let downstream = CountingObserver::new();
        node.register_observer(Arc::downgrade(&downstream) as Weak<dyn Observer>);

        node.calculate().unwrap();
        node.recalculate().unwrap();
        assert_eq!(node.runs(), 2);
        assert_eq!(downstream.count(), 1);
    }

    #[test]
    fn recalculate_restores_frozen() {
        let node = TestNode::new();
        node.freeze();
        node.recalculate().unwrap();
        assert_eq!(node.runs(), 1);
        assert!(LazyObject::is_frozen(&*node));
    }
}
