//! # quantor
//!
//! A QuantLib-style reactive valuation framework: observable market data,
//! lazy cached valuations, relinkable handles, and pluggable pricing
//! engines, composed over calendar and day-count arithmetic.
//!
//! This crate is a façade re-exporting the workspace crates; application
//! code should depend on it rather than on the individual `quantor-*`
//! crates.
//!
//! ```
//! use std::sync::Arc;
//! use quantor::core::{Observable, RelinkableHandle};
//! use quantor::quotes::{Quote, SimpleQuote};
//!
//! let quote = Arc::new(SimpleQuote::new(1.00));
//! let handle = RelinkableHandle::new(quote.clone());
//! quote.set_value(1.01);
//! assert_eq!(handle.current_link().unwrap().value(), Some(1.01));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The reactive graph: observables, lazy objects, handles, errors.
pub use quantor_core as core;

/// Dates, calendars, day counters, periods, settings.
pub use quantor_time as time;

/// Market quotes.
pub use quantor_quotes as quotes;

/// Events, cash flows, coupons.
pub use quantor_cashflows as cashflows;

/// Market indexes and the fixing registry.
pub use quantor_indexes as indexes;

/// Instruments and pricing engines.
pub use quantor_instruments as instruments;
