//! The Actual/Actual day-count family.
//!
//! Seven named sub-conventions map onto three distinct rules:
//!
//! * ISMA / Bond — actual days over the actual days of the (possibly
//!   notional) reference coupon period, times the period's year share;
//! * ISDA / Historical / Actual365 — the period is split at year
//!   boundaries, each piece divided by that year's actual length;
//! * AFB / Euro — whole years counted backwards from the end date, the
//!   stub divided by 366 only when it contains a February 29th.

use quantor_core::errors::Result;
use quantor_core::{ensure, ensure_post, Real, Time};

use crate::date::{is_leap_year, Date};
use crate::day_counter::DayCounter;
use crate::month::Month;
use crate::period::Period;

/// Named sub-conventions of the Actual/Actual family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActualActualConvention {
    /// ISMA and US Treasury convention.
    Isma,
    /// Alias of [`Isma`][ActualActualConvention::Isma].
    Bond,
    /// ISDA convention.
    Isda,
    /// Alias of [`Isda`][ActualActualConvention::Isda].
    Historical,
    /// Alias of [`Isda`][ActualActualConvention::Isda].
    Actual365,
    /// AFB convention.
    Afb,
    /// Alias of [`Afb`][ActualActualConvention::Afb].
    Euro,
}

/// Actual/Actual day counter.
#[derive(Debug, Clone, Copy)]
pub struct ActualActual {
    convention: ActualActualConvention,
}

impl Default for ActualActual {
    fn default() -> Self {
        Self::new(ActualActualConvention::Isda)
    }
}

impl ActualActual {
    /// Create an Actual/Actual day counter with the given sub-convention.
    pub fn new(convention: ActualActualConvention) -> Self {
        Self { convention }
    }

    fn rule(&self) -> Rule {
        match self.convention {
            ActualActualConvention::Isma | ActualActualConvention::Bond => Rule::Isma,
            ActualActualConvention::Isda
            | ActualActualConvention::Historical
            | ActualActualConvention::Actual365 => Rule::Isda,
            ActualActualConvention::Afb | ActualActualConvention::Euro => Rule::Afb,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Rule {
    Isma,
    Isda,
    Afb,
}

impl DayCounter for ActualActual {
    fn name(&self) -> &str {
        match self.rule() {
            Rule::Isma => "Actual/Actual (ISMA)",
            Rule::Isda => "Actual/Actual (ISDA)",
            Rule::Afb => "Actual/Actual (AFB)",
        }
    }

    fn year_fraction(&self, d1: Date, d2: Date, ref_start: Date, ref_end: Date) -> Result<Time> {
        match self.rule() {
            Rule::Isma => isma_year_fraction(d1, d2, ref_start, ref_end),
            Rule::Isda => isda_year_fraction(d1, d2),
            Rule::Afb => afb_year_fraction(d1, d2),
        }
    }
}

fn actual_days(d1: Date, d2: Date) -> Real {
    (d2 - d1) as Real
}

fn isma_year_fraction(d1: Date, d2: Date, d3: Date, d4: Date) -> Result<Time> {
    if d1 == d2 {
        return Ok(0.0);
    }
    if d1 > d2 {
        return Ok(-isma_year_fraction(d2, d1, d3, d4)?);
    }

    // When no reference period is given, take it equal to (d1, d2).
    let mut ref_start = if d3.is_null() { d1 } else { d3 };
    let mut ref_end = if d4.is_null() { d2 } else { d4 };
    ensure_post!(
        ref_end > ref_start && ref_end > d1,
        "invalid reference period: date 1: {d1}, date 2: {d2}, \
         reference period start: {ref_start}, reference period end: {ref_end}"
    );

    // Rough period length in months, rounded to the nearest integer.
    let mut months = (0.5 + 12.0 * actual_days(ref_start, ref_end) / 365.0) as i32;
    if months == 0 {
        // Sub-monthly reference period: fall back to one notional year
        // starting at d1.
        ref_start = d1;
        ref_end = d1.add_period(Period::years(1))?;
        months = 12;
    }
    let period = months as Real / 12.0;

    if d2 <= ref_end {
        if d1 >= ref_start {
            // Regular case: ref_start <= d1 <= d2 <= ref_end.
            Ok(period * actual_days(d1, d2) / actual_days(ref_start, ref_end))
        } else {
            // Long first coupon: d1 < ref_start, so walk back one notional
            // period and split there.
            let previous_ref = ref_start.add_period(Period::months(-months))?;
            if d2 > ref_start {
                Ok(isma_year_fraction(d1, ref_start, previous_ref, ref_start)?
                    + isma_year_fraction(ref_start, d2, ref_start, ref_end)?)
            } else {
                isma_year_fraction(d1, d2, previous_ref, ref_start)
            }
        }
    } else {
        // d2 beyond the reference period: count the full notional periods in
        // between, then the remainder.
        ensure!(
            ref_start <= d1,
            "invalid dates: date 1 {d1} precedes reference period start {ref_start}"
        );
        let mut sum = isma_year_fraction(d1, ref_end, ref_start, ref_end)?;
        let mut i = 0;
        loop {
            let new_ref_start = ref_end.add_period(Period::months(months * i))?;
            let new_ref_end = ref_end.add_period(Period::months(months * (i + 1)))?;
            if d2 < new_ref_end {
                sum += isma_year_fraction(new_ref_start, d2, new_ref_start, new_ref_end)?;
                return Ok(sum);
            }
            sum += period;
            i += 1;
        }
    }
}

fn isda_year_fraction(d1: Date, d2: Date) -> Result<Time> {
    if d1 == d2 {
        return Ok(0.0);
    }
    if d1 > d2 {
        return Ok(-isda_year_fraction(d2, d1)?);
    }

    let days_in_start_year = if is_leap_year(d1.year()) { 366.0 } else { 365.0 };
    let days_in_end_year = if is_leap_year(d2.year()) { 366.0 } else { 365.0 };

    let mut sum = (d2.year() - d1.year() - 1) as Real;
    sum += (days_in_start_year - d1.day_of_year() as Real + 1.0) / days_in_start_year;
    sum += (d2.day_of_year() as Real - 1.0) / days_in_end_year;
    Ok(sum)
}

fn afb_year_fraction(d1: Date, d2: Date) -> Result<Time> {
    if d1 == d2 {
        return Ok(0.0);
    }
    if d1 > d2 {
        return Ok(-afb_year_fraction(d2, d1)?);
    }

    // Count whole years backwards from d2; a step landing on February 28th
    // of a leap year is pushed to the 29th.
    let mut new_d2 = d2;
    let mut temp = d2;
    let mut sum: Time = 0.0;
    while temp > d1 {
        temp = new_d2.add_period(Period::years(-1))?;
        if temp.day_of_month() == 28 && temp.month() == Month::February && is_leap_year(temp.year())
        {
            temp = temp + 1;
        }
        if temp >= d1 {
            sum += 1.0;
            new_d2 = temp;
        }
    }

    let mut denominator = 365.0;
    if is_leap_year(new_d2.year()) {
        let leap_day = Date::new(new_d2.year(), Month::February, 29)?;
        if new_d2 > leap_day && d1 <= leap_day {
            denominator += 1.0;
        }
    } else if is_leap_year(d1.year()) {
        let leap_day = Date::new(d1.year(), Month::February, 29)?;
        if new_d2 > leap_day && d1 <= leap_day {
            denominator += 1.0;
        }
    }
    Ok(sum + actual_days(d1, new_d2) / denominator)
}
