//! Market quotes.
//!
//! A [`Quote`] is the leaf market datum of the valuation graph: handles
//! point at quotes, term structures and instruments subscribe to them, and
//! assigning a new value ripples staleness through every dependent node.

use std::sync::Weak;

use quantor_core::{Observable, ObservableValue, Observer, Real};

/// A market-observable value.
///
/// A quote may be temporarily invalid (no value), e.g. before the first
/// tick of the session.
pub trait Quote: Observable + Send + Sync {
    /// The current value, or `None` while the quote is invalid.
    fn value(&self) -> Option<Real>;

    /// `true` if the quote currently holds a value.
    fn is_valid(&self) -> bool {
        self.value().is_some()
    }
}

/// A simple, writable market quote.
///
/// Writing publishes a notification unconditionally — assignment is an
/// event even when the value does not change, so replaying the same tick
/// still invalidates dependents.
pub struct SimpleQuote {
    value: ObservableValue<Option<Real>>,
}

impl SimpleQuote {
    /// Create a quote with the given value.
    pub fn new(value: Real) -> Self {
        Self {
            value: ObservableValue::new(Some(value)),
        }
    }

    /// Create an invalid (empty) quote.
    pub fn empty() -> Self {
        Self {
            value: ObservableValue::new(None),
        }
    }

    /// Set a new value and notify observers.
    ///
    /// Returns the difference from the previous value, when there was one.
    pub fn set_value(&self, value: Real) -> Option<Real> {
        let previous = self.value.value();
        self.value.assign(Some(value));
        previous.map(|p| value - p)
    }

    /// Invalidate the quote and notify observers.
    pub fn reset(&self) {
        self.value.assign(None);
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<Real> {
        self.value.value()
    }
}

impl Observable for SimpleQuote {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.value.register_observer(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.value.unregister_observer(observer);
    }

    fn unregister_all_observers(&self) {
        self.value.unregister_all_observers();
    }

    fn observer_count(&self) -> usize {
        self.value.observer_count()
    }

    fn observers(&self) -> Vec<Weak<dyn Observer>> {
        self.value.observers()
    }

    fn notify_observers(&self) {
        self.value.notify_observers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantor_core::errors::Result;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingObserver {
        count: AtomicU32,
    }

    impl Observer for CountingObserver {
        fn update(&self) -> Result<()> {
            self.count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn value_round_trip() {
        let q = SimpleQuote::new(1.05);
        assert!(q.is_valid());
        assert_eq!(q.value(), Some(1.05));
        let diff = q.set_value(1.10).expect("previous value existed");
        assert!((diff - 0.05).abs() < 1.0e-12);
        assert_eq!(q.value(), Some(1.10));
    }

    #[test]
    fn empty_quote_is_invalid() {
        let q = SimpleQuote::empty();
        assert!(!q.is_valid());
        assert_eq!(q.value(), None);
        assert_eq!(q.set_value(2.0), None, "no previous value, no difference");
        assert!(q.is_valid());
    }

    #[test]
    fn assignment_publishes_unconditionally() {
        let q = SimpleQuote::new(1.00);
        let observer = Arc::new(CountingObserver {
            count: AtomicU32::new(0),
        });
        q.register_observer(Arc::downgrade(&observer) as Weak<dyn Observer>);

        q.set_value(1.01);
        assert_eq!(observer.count.load(Ordering::Relaxed), 1);
        q.set_value(1.01);
        assert_eq!(observer.count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn reset_invalidates_and_publishes() {
        let q = SimpleQuote::new(1.00);
        let observer = Arc::new(CountingObserver {
            count: AtomicU32::new(0),
        });
        q.register_observer(Arc::downgrade(&observer) as Weak<dyn Observer>);

        q.reset();
        assert!(!q.is_valid());
        assert_eq!(observer.count.load(Ordering::Relaxed), 1);
    }
}
