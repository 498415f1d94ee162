// Copyright 2025 Cowboy AI, LLC.

//! Independence of sigma-algebras, events and random variables
//!
//! Every relation reduces to independence of a finite family of
//! sub-algebras: an event contributes `σ({A})`, a random variable its
//! generated algebra `σ(X)`. A family is independent when, for every choice
//! of one atom or the whole space per member (that is, for every finite
//! sub-family), the measure of the intersection is the product of the
//! measures. Pairwise factorization is never accepted as a substitute.
//!
//! Conditional independence given `G` is checked under `m(· | g)` for each
//! atom `g` of `G` with positive mass.

use std::fmt;

use tracing::{debug, trace};

use super::variable::Observable;
use crate::config::ValidationConfig;
use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::{Event, SigmaAlgebra};
use crate::measure::measure::close;
use crate::measure::Measure;
use crate::value::ExtendedReal;

/// The first factorization that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Counterexample {
    /// Members involved in the failing intersection, by position
    pub members: Vec<usize>,
    /// Measure of the intersection
    pub joint: ExtendedReal,
    /// Product of the individual measures
    pub product: ExtendedReal,
}

/// Outcome of an independence check.
#[derive(Debug, Clone, PartialEq)]
pub struct IndependenceReport {
    /// Number of factorizations compared
    pub checked: usize,
    /// First failure, if any
    pub counterexample: Option<Counterexample>,
}

impl IndependenceReport {
    /// True when every factorization held.
    pub fn is_independent(&self) -> bool {
        self.counterexample.is_none()
    }
}

/// Independence checks against one measure.
#[derive(Debug, Clone)]
pub struct Independence<'m, T> {
    measure: &'m Measure<T>,
    given: Option<&'m SigmaAlgebra<T>>,
    tolerance: f64,
}

impl<'m, T: Ord + Clone + fmt::Debug> Independence<'m, T> {
    /// Unconditional checks under `measure`.
    pub fn new(measure: &'m Measure<T>) -> Self {
        Self {
            measure,
            given: None,
            tolerance: ValidationConfig::default().tolerance,
        }
    }

    /// Use the tolerance of `config`.
    pub fn with_config(mut self, config: &ValidationConfig) -> Self {
        self.tolerance = config.tolerance;
        self
    }

    /// Condition on a sub-algebra of the measure's algebra.
    pub fn given(mut self, given: &'m SigmaAlgebra<T>) -> Self {
        self.given = Some(given);
        self
    }

    /// Mutual independence of a family of sub-algebras.
    pub fn of_algebras(&self, family: &[&SigmaAlgebra<T>]) -> MeasureResult<IndependenceReport> {
        for member in family {
            member.ensure_sub_algebra_of(self.measure.algebra())?;
        }
        match self.given {
            None => factorizes(self.measure, family, self.tolerance),
            Some(given) => {
                given.ensure_sub_algebra_of(self.measure.algebra())?;
                let mut checked = 0;
                for block in given.atoms() {
                    let mass = self.measure.apply(block)?;
                    if mass.is_zero() {
                        continue;
                    }
                    let conditional = self.measure.conditional(block, self.tolerance)?;
                    let report = factorizes(conditional.as_measure(), family, self.tolerance)?;
                    checked += report.checked;
                    if !report.is_independent() {
                        debug!(block = %block, "conditional factorization failed");
                        return Ok(IndependenceReport {
                            checked,
                            counterexample: report.counterexample,
                        });
                    }
                }
                Ok(IndependenceReport {
                    checked,
                    counterexample: None,
                })
            }
        }
    }

    /// Mutual independence of a family of events.
    pub fn of_events(&self, events: &[Event<T>]) -> MeasureResult<IndependenceReport> {
        let space = self.measure.algebra().space();
        let algebras = events
            .iter()
            .map(|event| {
                self.measure.algebra().ensure_measurable(event)?;
                SigmaAlgebra::generated_by(space.clone(), [event.clone()])
            })
            .collect::<MeasureResult<Vec<_>>>()?;
        let refs: Vec<&SigmaAlgebra<T>> = algebras.iter().collect();
        self.of_algebras(&refs)
    }

    /// Mutual independence of a family of observations.
    pub fn of_variables(&self, family: &[&dyn Observable<T>]) -> MeasureResult<IndependenceReport> {
        for member in family {
            if member.sample_algebra().as_ref() != self.measure.algebra().as_ref() {
                return Err(MeasureError::not_measurable(
                    member.label(),
                    "variable is not defined on the measure's algebra",
                ));
            }
        }
        let algebras: Vec<&SigmaAlgebra<T>> = family.iter().map(|m| m.information()).collect();
        self.of_algebras(&algebras)
    }
}

fn factorizes<T: Ord + Clone + fmt::Debug>(
    measure: &Measure<T>,
    family: &[&SigmaAlgebra<T>],
    tolerance: f64,
) -> MeasureResult<IndependenceReport> {
    let space = measure.algebra().space().clone();
    // choice[k] == 0 selects the whole space, otherwise atom choice[k] - 1
    let radices: Vec<usize> = family.iter().map(|a| a.atom_count() + 1).collect();
    let mut choice = vec![0usize; family.len()];
    let mut checked = 0;

    loop {
        let members: Vec<usize> = (0..family.len()).filter(|&k| choice[k] != 0).collect();
        if members.len() >= 2 {
            let mut joint_set = space.clone();
            let mut product = ExtendedReal::ONE;
            for &k in &members {
                let atom = &family[k].atoms()[choice[k] - 1];
                joint_set = joint_set.intersection(atom);
                product = product * measure.apply(atom)?;
            }
            let joint = measure.apply(&joint_set)?;
            checked += 1;
            if !close(joint, product, tolerance) {
                trace!(?members, %joint, %product, "factorization failed");
                return Ok(IndependenceReport {
                    checked,
                    counterexample: Some(Counterexample {
                        members,
                        joint,
                        product,
                    }),
                });
            }
        }

        let mut position = 0;
        loop {
            if position == choice.len() {
                return Ok(IndependenceReport {
                    checked,
                    counterexample: None,
                });
            }
            choice[position] += 1;
            if choice[position] < radices[position] {
                break;
            }
            choice[position] = 0;
            position += 1;
        }
    }
}

/// Whether a family of sub-algebras is mutually independent under `measure`.
pub fn independent<T: Ord + Clone + fmt::Debug>(
    family: &[&SigmaAlgebra<T>],
    measure: &Measure<T>,
) -> MeasureResult<bool> {
    Ok(Independence::new(measure).of_algebras(family)?.is_independent())
}

/// Whether a family of events is mutually independent under `measure`.
pub fn events_independent<T: Ord + Clone + fmt::Debug>(
    events: &[Event<T>],
    measure: &Measure<T>,
) -> MeasureResult<bool> {
    Ok(Independence::new(measure).of_events(events)?.is_independent())
}

/// Whether two random variables are independent under `measure`.
pub fn variables_independent<T: Ord + Clone + fmt::Debug>(
    x: &dyn Observable<T>,
    y: &dyn Observable<T>,
    measure: &Measure<T>,
) -> MeasureResult<bool> {
    Ok(Independence::new(measure)
        .of_variables(&[x, y])?
        .is_independent())
}

/// Whether a family of observations is mutually independent under `measure`.
pub fn family_independent<T: Ord + Clone + fmt::Debug>(
    family: &[&dyn Observable<T>],
    measure: &Measure<T>,
) -> MeasureResult<bool> {
    Ok(Independence::new(measure).of_variables(family)?.is_independent())
}

/// Whether a family of sub-algebras is independent given `given`.
pub fn conditionally_independent<T: Ord + Clone + fmt::Debug>(
    family: &[&SigmaAlgebra<T>],
    given: &SigmaAlgebra<T>,
    measure: &Measure<T>,
) -> MeasureResult<bool> {
    Ok(Independence::new(measure)
        .given(given)
        .of_algebras(family)?
        .is_independent())
}
