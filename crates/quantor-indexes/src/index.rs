//! Base contract for market indexes.

use quantor_core::errors::{Error, Result};
use quantor_core::utilities::comparison::close;
use quantor_core::{ensure, Observable, Real};
use quantor_time::{Calendar, Date};

use crate::index_manager::{FixingHistory, IndexManager};

/// A market index identified by name, with a history of fixings kept in the
/// process-wide [`IndexManager`].
///
/// Indexes are observable; subscribe to
/// [`IndexManager::notifier`] via [`Index::notifier`] to go stale when the
/// fixing history changes.
pub trait Index: Observable + Send + Sync {
    /// The unique index name, e.g. `"Libor-6M"`.
    fn name(&self) -> &str;

    /// The calendar defining valid fixing dates.
    fn fixing_calendar(&self) -> &dyn Calendar;

    /// `true` if `date` may carry a fixing.
    fn is_valid_fixing_date(&self, date: Date) -> bool {
        self.fixing_calendar().is_business_day(date)
    }

    /// The fixing at `date`, read from history or forecast as appropriate.
    ///
    /// With `forecast_todays_fixing` set, a fixing dated today is forecast
    /// even when history already has it.
    fn fixing(&self, fixing_date: Date, forecast_todays_fixing: bool) -> Result<Real>;

    /// A copy of the stored fixing history.
    fn time_series(&self) -> FixingHistory {
        IndexManager::instance().history(self.name())
    }

    /// The observable node for this index's history.
    fn notifier(&self) -> std::sync::Arc<crate::index_manager::HistoryNotifier> {
        IndexManager::instance().notifier(self.name())
    }

    /// Store one historical fixing; see [`add_fixings`][Index::add_fixings].
    fn add_fixing(&self, date: Date, value: Real, force_overwrite: bool) -> Result<()> {
        self.add_fixings(&[(date, value)], force_overwrite)
    }

    /// Store historical fixings.
    ///
    /// The dates must be actual fixing calendar dates; no settlement lag is
    /// applied.  Each point is handled independently:
    ///
    /// * an invalid fixing date is skipped;
    /// * a date already fixed to (numerically) the same value is left
    ///   alone;
    /// * a date already fixed to a different value is skipped, unless
    ///   `force_overwrite` is set.
    ///
    /// Skipped points are reported in aggregate after the whole pass, so a
    /// bad point does not mask the others; everything else is stored.
    fn add_fixings(&self, fixings: &[(Date, Real)], force_overwrite: bool) -> Result<()> {
        let manager = IndexManager::instance();
        let mut series = manager.history(self.name());
        let mut invalid = 0usize;
        let mut duplicated = 0usize;

        for &(date, value) in fixings {
            if !self.is_valid_fixing_date(date) {
                invalid += 1;
                tracing::warn!(index = self.name(), %date, "invalid fixing date skipped");
                continue;
            }
            let current = series.get(&date).copied();
            match current {
                None => {
                    series.insert(date, value);
                }
                Some(_) if force_overwrite => {
                    series.insert(date, value);
                }
                Some(stored) if close(stored, value) => {
                    // Same point resubmitted: nothing to do.
                }
                Some(stored) => {
                    duplicated += 1;
                    tracing::warn!(
                        index = self.name(),
                        %date,
                        stored,
                        submitted = value,
                        "conflicting duplicate fixing skipped"
                    );
                }
            }
        }

        manager.set_history(self.name(), series);

        if invalid > 0 || duplicated > 0 {
            let mut problems = Vec::new();
            if invalid > 0 {
                problems.push(format!("{invalid} invalid fixing(s) provided"));
            }
            if duplicated > 0 {
                problems.push(format!("{duplicated} duplicated fixing(s) provided"));
            }
            return Err(Error::Data(format!(
                "{}: at least one fixing rejected: {}",
                self.name(),
                problems.join(", ")
            )));
        }
        Ok(())
    }

    /// Store fixings from parallel date and value slices.
    fn add_fixing_series(
        &self,
        dates: &[Date],
        values: &[Real],
        force_overwrite: bool,
    ) -> Result<()> {
        ensure!(
            dates.len() == values.len(),
            "got {} dates against {} values",
            dates.len(),
            values.len()
        );
        let pairs: Vec<(Date, Real)> = dates
            .iter()
            .copied()
            .zip(values.iter().copied())
            .collect();
        self.add_fixings(&pairs, force_overwrite)
    }

    /// Forget every stored fixing of this index.
    fn clear_fixings(&self) {
        IndexManager::instance().clear_history(self.name());
    }
}
