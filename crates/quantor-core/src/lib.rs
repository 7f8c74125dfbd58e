//! # quantor-core
//!
//! The reactive valuation graph at the heart of the quantor workspace:
//! the observer bus, observable values, rebindable handles, lazy cached
//! computations, and the shared error and container types every other
//! crate builds on.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Compounding conventions.
pub mod compounding;

/// Error types and the `ensure!` / `ensure_post!` / `fail!` macros.
pub mod errors;

/// Shared, rebindable indirection (`Handle<T>`, `RelinkableHandle<T>`).
pub mod handle;

/// Design patterns: observable, lazy_object, singleton.
pub mod patterns;

/// Ordered time-indexed container.
pub mod time_series;

/// Miscellaneous utilities.
pub mod utilities;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Integer type used for general-purpose counting.
pub type Integer = i32;

/// Non-negative integer type.
pub type Natural = u32;

/// Alias used for sizes and indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use compounding::Compounding;
pub use errors::{Error, Result};
pub use handle::{Handle, RelinkableHandle};
pub use patterns::lazy_object::{LazyObject, LazyState};
pub use patterns::observable::{Observable, ObservableImpl, ObservableValue, Observer};
pub use time_series::TimeSeries;
