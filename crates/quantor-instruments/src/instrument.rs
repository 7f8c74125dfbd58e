//! Instrument base machinery.
//!
//! An instrument is a lazy node of the valuation graph whose computation
//! is, by default, delegated to a [`PricingEngine`] through the
//! arguments/results handshake.  Concrete instruments embed an
//! [`InstrumentCore`], delegate the observable/lazy plumbing to it, and
//! define [`is_expired`][Instrument::is_expired] plus (usually)
//! [`setup_arguments`][Instrument::setup_arguments].

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use quantor_core::errors::{Error, Result};
use quantor_core::{LazyObject, LazyState, ObservableImpl, Observer, Real};
use quantor_time::Date;

use crate::pricing_engine::{AdditionalResults, PricingArguments, PricingEngine, PricingResults, ValueResults};

/// Shared state of every instrument: lazy-cache flags, the outbound
/// observable, the engine slot, and the cached pricing outputs.
pub struct InstrumentCore {
    lazy: LazyState,
    observable: ObservableImpl,
    engine: Mutex<Option<Arc<dyn PricingEngine>>>,
    results: Mutex<ValueResults>,
}

impl InstrumentCore {
    /// Fresh state: stale, no engine, NaN outputs.
    pub fn new() -> Self {
        Self {
            lazy: LazyState::new(),
            observable: ObservableImpl::new(),
            engine: Mutex::new(None),
            results: Mutex::new(ValueResults::new()),
        }
    }

    /// The lazy-cache flags; forward [`LazyObject::lazy_state`] here.
    pub fn lazy_state(&self) -> &LazyState {
        &self.lazy
    }

    /// The outbound observer list; forward [`Observable`](quantor_core::Observable) here.
    pub fn observable(&self) -> &ObservableImpl {
        &self.observable
    }

    /// The currently installed engine, if any.
    pub fn pricing_engine(&self) -> Option<Arc<dyn PricingEngine>> {
        self.engine_slot().clone()
    }

    fn engine_slot(&self) -> MutexGuard<'_, Option<Arc<dyn PricingEngine>>> {
        self.engine.lock().expect("instrument engine mutex poisoned")
    }

    /// The cached output block.
    pub fn results(&self) -> MutexGuard<'_, ValueResults> {
        self.results.lock().expect("instrument results mutex poisoned")
    }

    /// A typed copy of one additional result.
    pub fn additional_result<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.results()
            .additional_results
            .get(key)
            .and_then(|value| value.downcast_ref::<T>().cloned())
    }

    /// Force the outputs of an expired instrument: zero value and error,
    /// no valuation date, no additional results.
    pub fn setup_expired(&self) {
        let mut results = self.results();
        results.reset();
        results.value = 0.0;
        results.error_estimate = 0.0;
    }
}

impl Default for InstrumentCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A financial product whose valuation is delegated to a pricing engine.
///
/// The required surface is small: expose the embedded [`InstrumentCore`]
/// and decide expiry.  Everything else — the NPV accessors, the engine
/// handshake, engine rewiring — is provided.
pub trait Instrument: LazyObject {
    /// The embedded shared state.
    fn instrument_core(&self) -> &InstrumentCore;

    /// Whether the instrument is past any relevant date.
    ///
    /// Expired instruments are not priced: their outputs are forced to
    /// zero without invoking the engine.
    fn is_expired(&self) -> bool;

    /// Populate the engine's argument structure.
    ///
    /// The default refuses: instruments priced through an engine must
    /// override this (instruments overriding `perform_calculations`
    /// entirely don't need to).
    fn setup_arguments(&self, _arguments: &mut dyn PricingArguments) -> Result<()> {
        Err(Error::NotImplemented(
            "Instrument::setup_arguments not implemented".into(),
        ))
    }

    /// Copy the engine's outputs into the instrument.
    ///
    /// The default takes the standard value block wholesale, so all four
    /// output slots come from the same engine invocation.
    fn fetch_results(&self, results: &dyn PricingResults) -> Result<()> {
        *self.instrument_core().results() = results.value_results().clone();
        Ok(())
    }

    /// The engine handshake; the usual body of
    /// [`perform_calculations`][LazyObject::perform_calculations]:
    /// reset, populate and validate arguments, calculate, fetch.
    fn perform_engine_calculations(&self) -> Result<()> {
        let engine = self
            .instrument_core()
            .pricing_engine()
            .ok_or_else(|| Error::Configuration("null pricing engine".into()))?;
        engine.reset();
        engine.with_arguments_mut(&mut |arguments| {
            self.setup_arguments(arguments)?;
            arguments.validate()
        })?;
        engine.calculate()?;
        engine.with_results(&mut |results| self.fetch_results(results))
    }

    /// Bring the cached outputs up to date.
    ///
    /// Expired instruments short-circuit to their forced outputs and are
    /// marked calculated; live instruments go through the lazy cache.
    fn ensure_calculated(&self) -> Result<()> {
        if self.is_expired() {
            self.instrument_core().setup_expired();
            self.instrument_core().lazy_state().set_calculated(true);
            Ok(())
        } else {
            self.calculate()
        }
    }

    /// The net present value.
    fn npv(&self) -> Result<Real> {
        self.ensure_calculated()?;
        let value = self.instrument_core().results().value;
        if value.is_nan() {
            return Err(Error::Postcondition("net present value not provided".into()));
        }
        Ok(value)
    }

    /// The error estimate attached to the value.
    fn error_estimate(&self) -> Result<Real> {
        self.ensure_calculated()?;
        let estimate = self.instrument_core().results().error_estimate;
        if estimate.is_nan() {
            return Err(Error::Postcondition("error estimate not provided".into()));
        }
        Ok(estimate)
    }

    /// The date the cached value refers to.
    fn valuation_date(&self) -> Result<Date> {
        self.ensure_calculated()?;
        self.instrument_core()
            .results()
            .valuation_date
            .ok_or_else(|| Error::Postcondition("valuation date not provided".into()))
    }

    /// A copy of the named auxiliary outputs.
    fn additional_results(&self) -> Result<AdditionalResults> {
        self.ensure_calculated()?;
        Ok(self.instrument_core().results().additional_results.clone())
    }

    /// Install (or remove) the pricing engine.
    ///
    /// The instrument stops observing the previous engine, registers with
    /// the new one, and invalidates itself so dependents are notified.
    fn set_pricing_engine(this: &Arc<Self>, engine: Option<Arc<dyn PricingEngine>>)
    where
        Self: Sized + 'static,
    {
        let weak = Arc::downgrade(this) as Weak<dyn Observer>;
        {
            let mut slot = this.instrument_core().engine_slot();
            if let Some(previous) = slot.take() {
                previous.unregister_observer(&weak);
            }
            if let Some(new) = &engine {
                new.register_observer(weak);
            }
            *slot = engine;
        }
        if let Err(error) = Observer::update(&**this) {
            tracing::error!(%error, "instrument update failed after engine change");
        }
    }
}
