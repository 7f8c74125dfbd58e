//! Interest-rate compounding algebra.
//!
//! An [`InterestRate`] bundles a rate value with its day counter,
//! compounding convention and frequency, and converts between compound
//! factors, discount factors and equivalent rates under other conventions.

use std::sync::Arc;

use quantor_core::errors::{Error, Result};
use quantor_core::{ensure, Compounding, DiscountFactor, Rate, Real, Time};

use crate::date::Date;
use crate::day_counter::DayCounter;
use crate::frequency::Frequency;

/// A rate with day-counting and compounding conventions attached.
#[derive(Debug, Clone)]
pub struct InterestRate {
    rate: Rate,
    day_counter: Arc<dyn DayCounter>,
    compounding: Compounding,
    frequency: Frequency,
}

impl InterestRate {
    /// Create a new interest rate.
    ///
    /// For the compounded conventions the frequency must describe a real
    /// payment schedule, so the sentinels (`Once`, `NoFrequency`,
    /// `OtherFrequency`) are rejected.
    pub fn new(
        rate: Rate,
        day_counter: Arc<dyn DayCounter>,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<Self> {
        if matches!(
            compounding,
            Compounding::Compounded | Compounding::SimpleThenCompounded
        ) {
            let payments = frequency.payments_per_year().unwrap_or(0);
            ensure!(
                payments > 0,
                "{frequency} frequency not allowed for this interest rate"
            );
        }
        Ok(Self {
            rate,
            day_counter,
            compounding,
            frequency,
        })
    }

    /// The rate value.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// The day counter used for year fractions.
    pub fn day_counter(&self) -> &Arc<dyn DayCounter> {
        &self.day_counter
    }

    /// The compounding convention.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// The compounding frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    fn payments_per_year(&self) -> Real {
        self.frequency.payments_per_year().unwrap_or(1) as Real
    }

    /// Compound factor implied by the rate over `t` years.
    ///
    /// Time must be measured with this rate's own day counter.
    pub fn compound_factor(&self, t: Time) -> Result<Real> {
        ensure!(t >= 0.0, "negative time ({t}) not allowed");
        match self.compounding {
            Compounding::Simple => {
                let factor = 1.0 + self.rate * t;
                ensure!(
                    factor > 0.0,
                    "non-positive compound factor {factor} at time {t}"
                );
                Ok(factor)
            }
            Compounding::Compounded => {
                let f = self.payments_per_year();
                Ok((1.0 + self.rate / f).powf(f * t))
            }
            Compounding::Continuous => Ok((self.rate * t).exp()),
            Compounding::SimpleThenCompounded => {
                let f = self.payments_per_year();
                if t <= 1.0 / f {
                    self.simple_factor(t)
                } else {
                    Ok((1.0 + self.rate / f).powf(f * t))
                }
            }
        }
    }

    fn simple_factor(&self, t: Time) -> Result<Real> {
        let factor = 1.0 + self.rate * t;
        ensure!(
            factor > 0.0,
            "non-positive compound factor {factor} at time {t}"
        );
        Ok(factor)
    }

    /// Compound factor between two dates.
    pub fn compound_factor_between(
        &self,
        d1: Date,
        d2: Date,
        ref_start: Date,
        ref_end: Date,
    ) -> Result<Real> {
        ensure!(d2 >= d1, "date 2 ({d2:?}) earlier than date 1 ({d1:?})");
        let t = self.day_counter.year_fraction(d1, d2, ref_start, ref_end)?;
        self.compound_factor(t)
    }

    /// Discount factor implied by the rate over `t` years.
    pub fn discount_factor(&self, t: Time) -> Result<DiscountFactor> {
        Ok(1.0 / self.compound_factor(t)?)
    }

    /// Discount factor between two dates.
    pub fn discount_factor_between(
        &self,
        d1: Date,
        d2: Date,
        ref_start: Date,
        ref_end: Date,
    ) -> Result<DiscountFactor> {
        Ok(1.0 / self.compound_factor_between(d1, d2, ref_start, ref_end)?)
    }

    /// The rate that produces `compound` over `t` years under the requested
    /// conventions.
    pub fn implied_rate(
        compound: Real,
        day_counter: Arc<dyn DayCounter>,
        compounding: Compounding,
        frequency: Frequency,
        t: Time,
    ) -> Result<Self> {
        ensure!(compound > 0.0, "positive compound factor required");
        let rate = if compound == 1.0 {
            ensure!(t >= 0.0, "non-negative time ({t}) required");
            0.0
        } else {
            ensure!(t > 0.0, "positive time ({t}) required");
            let f = frequency.payments_per_year().unwrap_or(1) as Real;
            match compounding {
                Compounding::Simple => (compound - 1.0) / t,
                Compounding::Compounded => f * (compound.powf(1.0 / (f * t)) - 1.0),
                Compounding::Continuous => compound.ln() / t,
                Compounding::SimpleThenCompounded => {
                    if t <= 1.0 / f {
                        (compound - 1.0) / t
                    } else {
                        f * (compound.powf(1.0 / (f * t)) - 1.0)
                    }
                }
            }
        };
        if !rate.is_finite() {
            return Err(Error::Numeric(format!(
                "implied rate is not finite (compound {compound}, time {t})"
            )));
        }
        Self::new(rate, day_counter, compounding, frequency)
    }

    /// This rate re-expressed under other conventions, preserving the
    /// compound factor over `t` years.
    pub fn equivalent_rate(
        &self,
        compounding: Compounding,
        frequency: Frequency,
        t: Time,
    ) -> Result<Self> {
        let compound = self.compound_factor(t)?;
        Self::implied_rate(
            compound,
            self.day_counter.clone(),
            compounding,
            frequency,
            t,
        )
    }
}

impl std::fmt::Display for InterestRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4} % {} {}",
            self.rate * 100.0,
            self.day_counter.name(),
            self.compounding
        )
    }
}
