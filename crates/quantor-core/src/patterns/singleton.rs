//! Process-wide singletons.
//!
//! The idiomatic container for a lazily-initialised global is
//! `std::sync::LazyLock`; the [`define_singleton!`] macro wraps the
//! declaration.

/// Re-export `LazyLock` as the canonical singleton container.
pub use std::sync::LazyLock;

/// Define a lazily-initialised global instance of `$ty`.
///
/// # Example
/// ```
/// use quantor_core::define_singleton;
///
/// struct Registry { entries: Vec<String> }
/// define_singleton!(REGISTRY, Registry, Registry { entries: Vec::new() });
///
/// assert!(REGISTRY.entries.is_empty());
/// ```
#[macro_export]
macro_rules! define_singleton {
    ($name:ident, $ty:ty, $init:expr) => {
        /// Lazily-initialised global singleton.
        static $name: std::sync::LazyLock<$ty> = std::sync::LazyLock::new(|| $init);
    };
}
