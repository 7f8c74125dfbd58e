//! Dated events and their occurrence semantics.

use quantor_core::Observable;
use quantor_time::{Date, Settings};

/// Something that happens at a given date.
///
/// Events are observable so that schedule changes can invalidate dependent
/// valuations.
pub trait Event: Observable + Send + Sync {
    /// The date at which the event occurs.
    fn date(&self) -> Date;

    /// Per-event-type override of the reference-date inclusion flag.
    ///
    /// The default consults nothing; cash flows use this hook to apply the
    /// today's-cashflows setting (see
    /// [`todays_cashflow_inclusion`][crate::cashflow::todays_cashflow_inclusion]).
    fn include_reference_date_override(&self, _ref_date: Date) -> Option<bool> {
        None
    }

    /// Whether the event has already occurred relative to `ref_date`.
    ///
    /// With no explicit reference date, this thread's evaluation date is
    /// used.  When the reference date equals the event date the outcome is
    /// driven by `include_ref_date` if given, otherwise by the
    /// event-specific override, otherwise by the
    /// `include_reference_date_events` setting: *including* reference-date
    /// events means they count as not yet occurred.
    fn has_occurred(&self, ref_date: Option<Date>, include_ref_date: Option<bool>) -> bool {
        let ref_date = ref_date
            .filter(|d| !d.is_null())
            .unwrap_or_else(|| Settings::with(|s| s.evaluation_date()));
        let include_ref_date = include_ref_date
            .or_else(|| self.include_reference_date_override(ref_date))
            .unwrap_or_else(|| Settings::with(|s| s.include_reference_date_events()));
        if include_ref_date {
            self.date() < ref_date
        } else {
            self.date() <= ref_date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantor_core::{ObservableImpl, Observer};
    use std::sync::Weak;

    struct FixedEvent {
        date: Date,
        observable: ObservableImpl,
    }

    impl FixedEvent {
        fn new(date: Date) -> Self {
            Self {
                date,
                observable: ObservableImpl::new(),
            }
        }
    }

    impl Observable for FixedEvent {
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

    impl Event for FixedEvent {
        fn date(&self) -> Date {
            self.date
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn strictly_past_and_future() {
        let event = FixedEvent::new(date(2025, 6, 15));
        assert!(event.has_occurred(Some(date(2025, 7, 1)), None));
        assert!(!event.has_occurred(Some(date(2025, 6, 1)), None));
    }

    #[test]
    fn reference_date_inclusion_flag() {
        let event = FixedEvent::new(date(2025, 6, 15));
        let on_the_day = Some(date(2025, 6, 15));
        // Included: not yet occurred on its own date.
        assert!(!event.has_occurred(on_the_day, Some(true)));
        // Excluded: already occurred on its own date.
        assert!(event.has_occurred(on_the_day, Some(false)));
    }

    #[test]
    fn defaults_come_from_settings() {
        let event = FixedEvent::new(date(2025, 6, 15));
        Settings::with(|s| {
            s.set_evaluation_date(date(2025, 6, 15));
            s.set_include_reference_date_events(true);
        });
        assert!(!event.has_occurred(None, None));
        Settings::with(|s| s.set_include_reference_date_events(false));
        assert!(event.has_occurred(None, None));
        Settings::with(|s| {
            s.reset_evaluation_date();
            s.set_include_reference_date_events(true);
        });
    }
}
