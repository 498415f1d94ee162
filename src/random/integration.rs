// Copyright 2025 Cowboy AI, LLC.

//! Integration boundary
//!
//! The core does not own a numeric backend. It exposes the integrand (one
//! value and one mass per atom) through [`Integrand`] and consumes a number
//! or a `NotIntegrable` failure from any [`Integrator`]. [`AtomicSum`] is the
//! exact finite-sum evaluator used by default.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::{Event, SigmaAlgebra};
use crate::measure::Measure;
use crate::value::ExtendedReal;

/// A function paired with a measure, reduced to one term per atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Integrand {
    label: String,
    terms: Vec<(f64, ExtendedReal)>,
}

impl Integrand {
    /// Tabulate `f` against `measure`.
    ///
    /// `f` must be constant on every atom of the measure's algebra,
    /// otherwise it is not measurable and integration is refused.
    pub fn new<T, F>(label: impl Into<String>, measure: &Measure<T>, f: F) -> MeasureResult<Self>
    where
        T: Ord + Clone + fmt::Debug,
        F: Fn(&T) -> f64,
    {
        let label = label.into();
        let algebra = measure.algebra();
        let mut terms = Vec::with_capacity(algebra.atom_count());
        for (atom, &mass) in algebra.atoms().iter().zip(measure.atom_masses()) {
            let mut values = atom.iter().map(&f);
            let Some(first) = values.next() else {
                continue;
            };
            if let Some(other) = values.find(|v| !same_value(*v, first)) {
                return Err(MeasureError::not_measurable(
                    label,
                    format!("takes both {first} and {other} on atom {atom}"),
                ));
            }
            terms.push((first, mass));
        }
        Ok(Self { label, terms })
    }

    /// Name of the integrated quantity.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// `(value, mass)` per atom.
    pub fn terms(&self) -> &[(f64, ExtendedReal)] {
        &self.terms
    }

    /// Whether `∫ |f| dm` is finite.
    pub fn is_integrable(&self) -> bool {
        self.terms.iter().all(|&(value, mass)| {
            mass.is_zero() || (value.is_finite() && (value == 0.0 || !mass.is_infinite()))
        })
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// A numeric backend that evaluates integrals.
pub trait Integrator {
    /// Evaluate `∫ f dm`, failing with `NotIntegrable` when `∫ |f| dm = ∞`.
    fn integrate(&self, integrand: &Integrand) -> MeasureResult<f64>;
}

/// Exact evaluation as a finite sum over atoms.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicSum;

impl Integrator for AtomicSum {
    fn integrate(&self, integrand: &Integrand) -> MeasureResult<f64> {
        if !integrand.is_integrable() {
            return Err(MeasureError::NotIntegrable(format!(
                "{} has infinite absolute integral",
                integrand.label()
            )));
        }
        let products: Vec<f64> = integrand
            .terms()
            .iter()
            .filter(|&&(value, mass)| value != 0.0 && !mass.is_zero())
            .map(|&(value, mass)| value * mass.to_f64())
            .collect();
        let absolute: f64 = products.iter().map(|p| p.abs()).sum();
        let total: f64 = products.iter().sum();
        if !absolute.is_finite() || !total.is_finite() {
            return Err(MeasureError::NotIntegrable(format!(
                "{} overflows: absolute integral is not representable",
                integrand.label()
            )));
        }
        Ok(total)
    }
}

/// A version of `E[f | G]`: one value per atom of `G` with positive mass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpectation<T> {
    given: SigmaAlgebra<T>,
    values: BTreeMap<usize, f64>,
}

impl<T: Ord + Clone + fmt::Debug> ConditionalExpectation<T> {
    /// Compute `E[f | given]` under a finite `measure`.
    pub fn compute<F>(
        label: &str,
        measure: &Measure<T>,
        given: &SigmaAlgebra<T>,
        f: F,
    ) -> MeasureResult<Self>
    where
        F: Fn(&T) -> f64,
    {
        given.ensure_sub_algebra_of(measure.algebra())?;
        let integrand = Integrand::new(label, measure, &f)?;
        AtomicSum.integrate(&integrand)?;

        let mut values = BTreeMap::new();
        for (position, block) in given.atoms().iter().enumerate() {
            let restricted = measure.restrict(block)?;
            let mass = restricted.total();
            if mass.is_zero() {
                continue;
            }
            let mass = mass.as_finite().ok_or_else(|| {
                MeasureError::NotIntegrable(format!(
                    "conditioning block {block} has infinite mass"
                ))
            })?;
            let integral = AtomicSum.integrate(&Integrand::new(label, &restricted, &f)?)?;
            values.insert(position, integral / mass);
        }
        Ok(Self {
            given: given.clone(),
            values,
        })
    }

    /// Value on the block holding `outcome`; `None` on null blocks.
    pub fn value_at(&self, outcome: &T) -> Option<f64> {
        self.given
            .atom_index(outcome)
            .and_then(|block| self.values.get(&block).copied())
    }

    /// `(block, value)` for every block of positive mass.
    pub fn blocks(&self) -> impl Iterator<Item = (&Event<T>, f64)> {
        self.values
            .iter()
            .map(|(&position, &value)| (&self.given.atoms()[position], value))
    }
}
