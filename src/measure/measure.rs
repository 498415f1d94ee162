// Copyright 2025 Cowboy AI, LLC.

//! Measures over finite sigma-algebras
//!
//! A measure is stored as the mass of each atom of its algebra. The value of
//! a measurable set is the sum over the atoms it contains, so `m(∅) = 0`,
//! additivity over disjoint sets and monotonicity hold structurally. When a
//! measure is built from a caller-supplied assignment function, the function
//! is read on the atoms and then checked against those sums according to the
//! configured [`ValidationStrategy`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::probability::ProbabilityMeasure;
use crate::config::{ValidationConfig, ValidationStrategy};
use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::{Event, SigmaAlgebra, MAX_ENUMERABLE_ATOMS};
use crate::random::RandomVariable;
use crate::value::ExtendedReal;

/// A nonnegative, additive assignment of `[0, ∞]` values to measurable sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure<T> {
    algebra: Arc<SigmaAlgebra<T>>,
    masses: Vec<ExtendedReal>,
}

/// Equality of extended values with a tolerance scaled by their magnitude.
pub(crate) fn close(a: ExtendedReal, b: ExtendedReal, tolerance: f64) -> bool {
    match (a.as_finite(), b.as_finite()) {
        (Some(x), Some(y)) => (x - y).abs() <= tolerance * (1.0 + x.abs().max(y.abs())),
        (None, None) => true,
        _ => false,
    }
}

impl<T: Ord + Clone + fmt::Debug> Measure<T> {
    pub(crate) fn from_masses_unchecked(
        algebra: Arc<SigmaAlgebra<T>>,
        masses: Vec<ExtendedReal>,
    ) -> Self {
        debug_assert_eq!(algebra.atom_count(), masses.len());
        Self { algebra, masses }
    }

    /// Build a measure from an assignment function on measurable sets.
    ///
    /// The assignment is evaluated on every atom. Depending on
    /// `config.strategy`, it is then checked on all measurable sets, on a
    /// sample of disjoint pairs, or trusted.
    pub fn from_fn<F>(
        algebra: Arc<SigmaAlgebra<T>>,
        assignment: F,
        config: &ValidationConfig,
    ) -> MeasureResult<Self>
    where
        F: Fn(&Event<T>) -> f64,
    {
        config.validate()?;
        let masses = algebra
            .atoms()
            .iter()
            .map(|atom| ExtendedReal::new(assignment(atom)))
            .collect::<MeasureResult<Vec<_>>>()?;
        let measure = Self { algebra, masses };

        let read = |event: &Event<T>| ExtendedReal::new(assignment(event));
        let empty = read(&Event::empty())?;
        if !empty.is_zero() {
            return Err(MeasureError::NotAdditive(format!(
                "assignment gives the empty set mass {empty}"
            )));
        }

        let mut strategy = config.strategy;
        let limit = config.max_exhaustive_atoms.min(MAX_ENUMERABLE_ATOMS);
        if strategy == ValidationStrategy::Exhaustive && measure.algebra.atom_count() > limit {
            warn!(
                atoms = measure.algebra.atom_count(),
                limit,
                "too many atoms for exhaustive validation, sampling instead"
            );
            strategy = ValidationStrategy::sampled();
        }

        match strategy {
            ValidationStrategy::Trusted => {}
            ValidationStrategy::Exhaustive => {
                let sets = measure.algebra.measurable_sets().ok_or_else(|| {
                    MeasureError::InvalidConfig(format!(
                        "cannot enumerate the measurable sets of {}",
                        measure.algebra
                    ))
                })?;
                for set in sets {
                    let expected = measure.sum_over(&set);
                    let actual = read(&set)?;
                    if !close(expected, actual, config.tolerance) {
                        return Err(MeasureError::NotAdditive(format!(
                            "assignment gives {set} mass {actual}, its atoms sum to {expected}"
                        )));
                    }
                }
            }
            ValidationStrategy::Sampled { samples, seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                let count = measure.algebra.atom_count();
                for _ in 0..samples {
                    let mut left = Vec::new();
                    let mut right = Vec::new();
                    for atom in 0..count {
                        match rng.gen_range(0..3u8) {
                            0 => left.push(atom),
                            1 => right.push(atom),
                            _ => {}
                        }
                    }
                    let a = measure.algebra.union_of_atoms(left);
                    let b = measure.algebra.union_of_atoms(right);
                    let union = a.union(&b);
                    let (ma, mb, mu) = (read(&a)?, read(&b)?, read(&union)?);
                    if !close(ma + mb, mu, config.tolerance) {
                        return Err(MeasureError::NotAdditive(format!(
                            "m({a}) + m({b}) = {} but m({union}) = {mu}",
                            ma + mb
                        )));
                    }
                    if ma > mu && !close(ma, mu, config.tolerance) {
                        return Err(MeasureError::NotAdditive(format!(
                            "assignment is not monotone: m({a}) = {ma} > m({union}) = {mu}"
                        )));
                    }
                }
            }
        }

        debug!(
            algebra = %measure.algebra,
            strategy = ?strategy,
            total = %measure.total(),
            "validated measure assignment"
        );
        Ok(measure)
    }

    /// Build a measure from the mass of each atom, keyed by any outcome of
    /// that atom. Every atom must be given exactly once.
    pub fn from_atom_masses(
        algebra: Arc<SigmaAlgebra<T>>,
        masses: impl IntoIterator<Item = (T, f64)>,
    ) -> MeasureResult<Self> {
        let mut slots: Vec<Option<ExtendedReal>> = vec![None; algebra.atom_count()];
        for (outcome, mass) in masses {
            let atom = algebra.atom_index(&outcome).ok_or_else(|| {
                MeasureError::not_measurable(
                    format!("{outcome:?}"),
                    "outcome is not in the sample space",
                )
            })?;
            if slots[atom].replace(ExtendedReal::new(mass)?).is_some() {
                return Err(MeasureError::NotAdditive(format!(
                    "atom {} is assigned twice",
                    algebra.atoms()[atom]
                )));
            }
        }
        let masses = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    MeasureError::NotAdditive(format!(
                        "atom {} has no assigned mass",
                        algebra.atoms()[i]
                    ))
                })
            })
            .collect::<MeasureResult<Vec<_>>>()?;
        Ok(Self { algebra, masses })
    }

    /// Unit mass concentrated at `outcome`.
    pub fn dirac(algebra: Arc<SigmaAlgebra<T>>, outcome: &T) -> MeasureResult<Self> {
        let atom = algebra.atom_index(outcome).ok_or_else(|| {
            MeasureError::not_measurable(format!("{outcome:?}"), "outcome is not in the sample space")
        })?;
        let mut masses = vec![ExtendedReal::ZERO; algebra.atom_count()];
        masses[atom] = ExtendedReal::ONE;
        Ok(Self { algebra, masses })
    }

    /// Number of outcomes in each measurable set.
    pub fn counting(algebra: Arc<SigmaAlgebra<T>>) -> Self {
        let masses = algebra
            .atoms()
            .iter()
            .map(|atom| ExtendedReal::from_count(atom.len()))
            .collect();
        Self { algebra, masses }
    }

    /// Zero on every set.
    pub fn zero(algebra: Arc<SigmaAlgebra<T>>) -> Self {
        let masses = vec![ExtendedReal::ZERO; algebra.atom_count()];
        Self { algebra, masses }
    }

    fn sum_over(&self, event: &Event<T>) -> ExtendedReal {
        let atoms: BTreeSet<usize> = event
            .iter()
            .filter_map(|outcome| self.algebra.atom_index(outcome))
            .collect();
        atoms.into_iter().map(|i| self.masses[i]).sum()
    }

    /// Value of a measurable set.
    pub fn apply(&self, event: &Event<T>) -> MeasureResult<ExtendedReal> {
        self.algebra.ensure_measurable(event)?;
        Ok(self.sum_over(event))
    }

    /// Mass of the whole space.
    pub fn total(&self) -> ExtendedReal {
        self.masses.iter().copied().sum()
    }

    /// True when the whole space has finite mass.
    pub fn is_finite(&self) -> bool {
        !self.total().is_infinite()
    }

    /// True when the total mass is one within `tolerance`.
    pub fn is_probability(&self, tolerance: f64) -> bool {
        self.total().approx_eq(ExtendedReal::ONE, tolerance)
    }

    /// Pushforward along a random variable: `B ↦ m(X⁻¹(B))`.
    ///
    /// The variable must be measurable from this measure's algebra.
    pub fn pushforward<E>(&self, variable: &RandomVariable<T, E>) -> MeasureResult<Measure<E>>
    where
        E: Ord + Clone + fmt::Debug,
    {
        if variable.source().as_ref() != self.algebra.as_ref() {
            return Err(MeasureError::not_measurable(
                variable.name(),
                format!("variable is defined on {}, measure on {}", variable.source(), self.algebra),
            ));
        }
        let target = Arc::clone(variable.target());
        let masses = target
            .atoms()
            .iter()
            .map(|atom| self.apply(&variable.preimage(atom)))
            .collect::<MeasureResult<Vec<_>>>()?;
        Ok(Measure::from_masses_unchecked(target, masses))
    }

    /// The measure `A ↦ m(A ∩ set)`.
    pub fn restrict(&self, set: &Event<T>) -> MeasureResult<Self> {
        self.algebra.ensure_measurable(set)?;
        let masses = self
            .algebra
            .atoms()
            .iter()
            .zip(&self.masses)
            .map(|(atom, &mass)| if atom.is_subset(set) { mass } else { ExtendedReal::ZERO })
            .collect();
        Ok(Self {
            algebra: Arc::clone(&self.algebra),
            masses,
        })
    }

    /// Multiply every value by `factor`.
    pub fn scale(&self, factor: ExtendedReal) -> Self {
        Self {
            algebra: Arc::clone(&self.algebra),
            masses: self.masses.iter().map(|&mass| mass * factor).collect(),
        }
    }

    /// Divide by the total mass. Fails for zero or infinite totals.
    pub fn normalize(&self, tolerance: f64) -> MeasureResult<ProbabilityMeasure<T>> {
        let total = self.total();
        let value = total
            .as_finite()
            .filter(|&v| v > 0.0)
            .ok_or_else(|| MeasureError::NotTotalToOne {
                total: total.to_string(),
            })?;
        let masses = self
            .masses
            .iter()
            .map(|mass| ExtendedReal::new(mass.to_f64() / value))
            .collect::<MeasureResult<Vec<_>>>()?;
        let normalized = Self {
            algebra: Arc::clone(&self.algebra),
            masses,
        };
        ProbabilityMeasure::with_tolerance(normalized, tolerance)
    }

    /// Conditional probability measure `m(· | given)`.
    ///
    /// Fails with `NotTotalToOne` when `m(given)` is zero or infinite.
    pub fn conditional(&self, given: &Event<T>, tolerance: f64) -> MeasureResult<ProbabilityMeasure<T>> {
        self.restrict(given)?.normalize(tolerance)
    }

    /// The underlying algebra.
    pub fn algebra(&self) -> &Arc<SigmaAlgebra<T>> {
        &self.algebra
    }

    /// Mass of each atom, aligned with `algebra().atoms()`.
    pub fn atom_masses(&self) -> &[ExtendedReal] {
        &self.masses
    }
}

impl<T> fmt::Display for Measure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: ExtendedReal = self.masses.iter().copied().sum();
        write!(f, "measure on {}, total {}", self.algebra, total)
    }
}
