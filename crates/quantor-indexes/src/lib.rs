//! # quantor-indexes
//!
//! Market indexes: the base index contract, the fixing-history policy, the
//! interest-rate index family, and the process-wide fixing registry.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Index` — base contract and fixing storage policy.
pub mod index;

/// `IndexManager` — the process-wide fixing registry.
pub mod index_manager;

/// `InterestRateIndex` — indexes fixing off interest-rate markets.
pub mod interest_rate_index;

pub use index::Index;
pub use index_manager::{FixingHistory, HistoryNotifier, IndexManager};
pub use interest_rate_index::InterestRateIndex;
