//! # quantor-instruments
//!
//! The instrument/engine coupling: lazy instruments delegating their
//! valuation to pluggable pricing engines through a typed
//! arguments/results handshake.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Instrument` trait and `InstrumentCore` shared state.
pub mod instrument;

/// The pricing-engine contract and `GenericEngine` plumbing.
pub mod pricing_engine;

pub use instrument::{Instrument, InstrumentCore};
pub use pricing_engine::{
    AdditionalResults, GenericEngine, NoArguments, PricingArguments, PricingEngine,
    PricingResults, ValueResults,
};
