//! Interest-rate index family.

use quantor_core::errors::{Error, Result};
use quantor_core::{ensure, Natural, Real};
use quantor_time::{BusinessDayConvention, Date, DayCounter, Period, Settings};

use crate::index::Index;

/// An index fixing off interest-rate markets (deposit, IBOR, overnight).
///
/// The family adds a tenor, a fixing-day lag, and a day counter to the base
/// [`Index`] contract, and settles how a fixing request is resolved against
/// the evaluation date:
///
/// * strictly past dates must be in the history;
/// * today's fixing is taken from history when present, unless forecasting
///   is requested — and must be in history when this thread's settings
///   enforce today's historic fixings;
/// * future dates are forecast through
///   [`forecast_fixing`][InterestRateIndex::forecast_fixing].
pub trait InterestRateIndex: Index {
    /// The family name, e.g. `"Libor"`.
    fn family_name(&self) -> &str;

    /// The index tenor.
    fn tenor(&self) -> Period;

    /// Business days between fixing and value date.
    fn fixing_days(&self) -> Natural;

    /// The day counter of the underlying rate.
    fn day_counter(&self) -> &dyn DayCounter;

    /// Forecast the fixing at a (not yet fixed) date.
    fn forecast_fixing(&self, fixing_date: Date) -> Result<Real>;

    /// The fixing date corresponding to a value date.
    fn fixing_date(&self, value_date: Date) -> Date {
        self.fixing_calendar().advance(
            value_date,
            Period::days(-(self.fixing_days() as i32)),
            BusinessDayConvention::Preceding,
        )
    }

    /// The value date corresponding to a fixing date.
    fn value_date(&self, fixing_date: Date) -> Date {
        self.fixing_calendar().advance(
            fixing_date,
            Period::days(self.fixing_days() as i32),
            BusinessDayConvention::Following,
        )
    }

    /// A stored past fixing, if any.
    fn past_fixing(&self, fixing_date: Date) -> Option<Real> {
        self.time_series().get(&fixing_date).copied()
    }

    /// Resolve a fixing request against history, settings, and the
    /// forecast hook; the standard body behind [`Index::fixing`].
    fn resolve_fixing(&self, fixing_date: Date, forecast_todays_fixing: bool) -> Result<Real> {
        ensure!(
            self.is_valid_fixing_date(fixing_date),
            "fixing date {fixing_date} is not valid for {}",
            self.name()
        );
        let today = Settings::with(|s| s.evaluation_date());

        if fixing_date > today || (fixing_date == today && forecast_todays_fixing) {
            return self.forecast_fixing(fixing_date);
        }

        if fixing_date < today || Settings::with(|s| s.enforces_todays_historic_fixings()) {
            return self.past_fixing(fixing_date).ok_or_else(|| {
                Error::Data(format!(
                    "missing {} fixing for {fixing_date}",
                    self.name()
                ))
            });
        }

        // Today's fixing: use it when already fixed, forecast otherwise.
        match self.past_fixing(fixing_date) {
            Some(value) => Ok(value),
            None => self.forecast_fixing(fixing_date),
        }
    }
}
