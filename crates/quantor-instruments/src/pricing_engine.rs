//! The pricing-engine contract.
//!
//! An engine encapsulates one way of valuing an instrument (closed form,
//! lattice, simulation) behind a fixed handshake: the instrument populates
//! the engine's *arguments*, triggers `calculate`, and reads typed
//! *results* back.  Engines are observable, so reconfiguring an engine
//! invalidates every instrument using it.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use quantor_core::errors::Result;
use quantor_core::{Observable, ObservableImpl, Observer, Real};
use quantor_time::Date;

/// Open-ended named outputs (sensitivities, legs, diagnostics).
///
/// Values are type-erased; read them back with
/// [`additional_result`](crate::instrument::InstrumentCore::additional_result).
pub type AdditionalResults = HashMap<String, Arc<dyn Any + Send + Sync>>;

/// Input container populated by the instrument before calculation.
pub trait PricingArguments: Any + Send {
    /// Check the populated inputs; called after population and before
    /// `calculate`.
    fn validate(&self) -> Result<()>;

    /// Type-erased access for engine-specific downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable type-erased access for engine-specific downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Arguments for engines whose inputs are fully baked into the engine
/// itself.
#[derive(Debug, Default)]
pub struct NoArguments;

impl PricingArguments for NoArguments {
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The standard output block every engine produces.
///
/// Value and error estimate are NaN until a calculation fills them in.
#[derive(Clone)]
pub struct ValueResults {
    /// Net present value.
    pub value: Real,
    /// Error estimate of the value, where the method provides one.
    pub error_estimate: Real,
    /// The date the value refers to.
    pub valuation_date: Option<Date>,
    /// Named auxiliary outputs.
    pub additional_results: AdditionalResults,
}

impl ValueResults {
    /// A neutral result block: NaN value and error, no date, no extras.
    pub fn new() -> Self {
        Self {
            value: Real::NAN,
            error_estimate: Real::NAN,
            valuation_date: None,
            additional_results: AdditionalResults::new(),
        }
    }

    /// Restore the neutral state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Store a named auxiliary output.
    pub fn insert_additional(&mut self, key: impl Into<String>, value: impl Any + Send + Sync) {
        self.additional_results.insert(key.into(), Arc::new(value));
    }
}

impl Default for ValueResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Output container of a pricing engine.
pub trait PricingResults: Any + Send {
    /// Clear previous outputs; called before every calculation.
    fn reset(&mut self);

    /// The standard value block, however the engine extends it.
    fn value_results(&self) -> &ValueResults;

    /// Type-erased access for engine-specific downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl PricingResults for ValueResults {
    fn reset(&mut self) {
        ValueResults::reset(self);
    }

    fn value_results(&self) -> &ValueResults {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A pricing strategy with typed argument and result structures.
///
/// The caller-side protocol is `reset` → populate arguments → `calculate`
/// → read results; [`Instrument`][crate::instrument::Instrument] drives it
/// from its default `perform_calculations`.
pub trait PricingEngine: Observable + Send + Sync {
    /// Clear the results of any previous calculation.
    fn reset(&self);

    /// Run the strategy against the populated arguments.
    fn calculate(&self) -> Result<()>;

    /// Run `f` against the argument structure, for population.
    fn with_arguments_mut(
        &self,
        f: &mut dyn FnMut(&mut dyn PricingArguments) -> Result<()>,
    ) -> Result<()>;

    /// Run `f` against the result structure, for reading outputs back.
    fn with_results(&self, f: &mut dyn FnMut(&dyn PricingResults) -> Result<()>) -> Result<()>;
}

/// Storage and plumbing shared by concrete engines.
///
/// Wrap one of these and forward the [`PricingEngine`] and [`Observable`]
/// surfaces to it; the engine itself only has to implement `calculate`.
/// Call [`notify_observers`][ObservableImpl] (via the embedded observable)
/// whenever an engine parameter changes so dependent instruments go stale.
pub struct GenericEngine<A: PricingArguments, R: PricingResults> {
    arguments: Mutex<A>,
    results: Mutex<R>,
    observable: ObservableImpl,
}

impl<A: PricingArguments, R: PricingResults> GenericEngine<A, R> {
    /// Create the storage from initial argument and result structures.
    pub fn new(arguments: A, results: R) -> Self {
        Self {
            arguments: Mutex::new(arguments),
            results: Mutex::new(results),
            observable: ObservableImpl::new(),
        }
    }

    /// Lock the typed argument structure.
    pub fn arguments(&self) -> MutexGuard<'_, A> {
        self.arguments.lock().expect("engine arguments mutex poisoned")
    }

    /// Lock the typed result structure.
    pub fn results(&self) -> MutexGuard<'_, R> {
        self.results.lock().expect("engine results mutex poisoned")
    }

    /// Forward target for [`PricingEngine::reset`].
    pub fn reset(&self) {
        self.results().reset();
    }

    /// Forward target for [`PricingEngine::with_arguments_mut`].
    pub fn with_arguments_mut(
        &self,
        f: &mut dyn FnMut(&mut dyn PricingArguments) -> Result<()>,
    ) -> Result<()> {
        f(&mut *self.arguments())
    }

    /// Forward target for [`PricingEngine::with_results`].
    pub fn with_results(
        &self,
        f: &mut dyn FnMut(&dyn PricingResults) -> Result<()>,
    ) -> Result<()> {
        f(&*self.results())
    }
}

impl<A: PricingArguments, R: PricingResults> Observable for GenericEngine<A, R> {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.observable.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.observable.unregister(observer);
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
