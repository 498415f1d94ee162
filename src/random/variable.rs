// Copyright 2025 Cowboy AI, LLC.

//! Random variables and their laws
//!
//! A random variable is a total function between two measurable spaces,
//! tabulated over the (finite) source space and carried together with the
//! witness that it is measurable. Laws are pushforward measures, recomputed
//! on every request and compared by value.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::integration::{AtomicSum, ConditionalExpectation, Integrand, Integrator};
use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::{Event, SigmaAlgebra};
use crate::measure::Measure;

/// Certificate that a tabulated function is measurable.
///
/// Only [`MeasurabilityWitness::verify`] produces one. It records the
/// algebras it was checked against and the generated algebra `σ(f)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurabilityWitness<T, E> {
    source: Arc<SigmaAlgebra<T>>,
    target: Arc<SigmaAlgebra<E>>,
    generated: SigmaAlgebra<T>,
}

impl<T, E> MeasurabilityWitness<T, E>
where
    T: Ord + Clone + fmt::Debug,
    E: Ord + Clone + fmt::Debug,
{
    /// Check that `table` is total on the source space, lands in the target
    /// space, and pulls every target atom back to a measurable set.
    pub fn verify(
        source: &Arc<SigmaAlgebra<T>>,
        target: &Arc<SigmaAlgebra<E>>,
        table: &BTreeMap<T, E>,
    ) -> MeasureResult<Self> {
        if let Some(missing) = source.space().iter().find(|x| !table.contains_key(x)) {
            return Err(MeasureError::not_measurable(
                format!("{missing:?}"),
                "function is not defined on this outcome",
            ));
        }
        if let Some(extra) = table.keys().find(|x| !source.contains_outcome(x)) {
            return Err(MeasureError::not_measurable(
                format!("{extra:?}"),
                "outcome is not in the source space",
            ));
        }
        let generated = SigmaAlgebra::comap(source.space(), |x| table[x].clone(), target)?;
        for block in generated.atoms() {
            if !source.is_measurable(block) {
                return Err(MeasureError::not_measurable(
                    block.to_string(),
                    format!("preimage is not measurable in the source {source}"),
                ));
            }
        }
        Ok(Self {
            source: Arc::clone(source),
            target: Arc::clone(target),
            generated,
        })
    }

    /// The generated algebra `σ(f)`.
    pub fn generated(&self) -> &SigmaAlgebra<T> {
        &self.generated
    }
}

/// A measurable function `Ω → E`.
#[derive(Debug, Clone)]
pub struct RandomVariable<T, E> {
    name: String,
    table: BTreeMap<T, E>,
    witness: MeasurabilityWitness<T, E>,
}

impl<T, E> RandomVariable<T, E>
where
    T: Ord + Clone + fmt::Debug,
    E: Ord + Clone + fmt::Debug,
{
    /// Tabulate `f` on the source space and verify measurability.
    pub fn new<F>(
        name: impl Into<String>,
        source: &Arc<SigmaAlgebra<T>>,
        target: &Arc<SigmaAlgebra<E>>,
        f: F,
    ) -> MeasureResult<Self>
    where
        F: Fn(&T) -> E,
    {
        let name = name.into();
        let table: BTreeMap<T, E> = source.space().iter().map(|x| (x.clone(), f(x))).collect();
        let witness = MeasurabilityWitness::verify(source, target, &table).map_err(|err| {
            debug!(variable = %name, error = %err, "rejected random variable");
            err
        })?;
        Ok(Self {
            name,
            table,
            witness,
        })
    }

    /// Assemble a variable from a table and a previously verified witness.
    ///
    /// The witness must have been produced for this exact table.
    pub fn from_parts(
        name: impl Into<String>,
        table: BTreeMap<T, E>,
        witness: MeasurabilityWitness<T, E>,
    ) -> MeasureResult<Self> {
        let name = name.into();
        let recheck = MeasurabilityWitness::verify(&witness.source, &witness.target, &table)?;
        if recheck != witness {
            return Err(MeasureError::not_measurable(
                name,
                "witness was issued for a different function",
            ));
        }
        Ok(Self {
            name,
            table,
            witness,
        })
    }

    /// Value at `outcome`, `None` outside the source space.
    pub fn eval(&self, outcome: &T) -> Option<&E> {
        self.table.get(outcome)
    }

    /// `{ω : X(ω) ∈ set}`.
    pub fn preimage(&self, set: &Event<E>) -> Event<T> {
        self.table
            .iter()
            .filter(|(_, value)| set.contains(value))
            .map(|(outcome, _)| outcome.clone())
            .collect()
    }

    /// Apply `g` after `self`. `g` must be defined on this variable's target.
    pub fn compose<F>(&self, g: &RandomVariable<E, F>) -> MeasureResult<RandomVariable<T, F>>
    where
        F: Ord + Clone + fmt::Debug,
    {
        if g.source().as_ref() != self.target().as_ref() {
            return Err(MeasureError::not_measurable(
                format!("{} ∘ {}", g.name, self.name),
                "codomain and domain algebras differ",
            ));
        }
        RandomVariable::new(
            format!("{} ∘ {}", g.name, self.name),
            self.source(),
            g.target(),
            |x| g.table[&self.table[x]].clone(),
        )
    }

    /// Distribution of the variable under `measure`.
    pub fn law(&self, measure: &Measure<T>) -> MeasureResult<Measure<E>> {
        measure.pushforward(self)
    }

    /// `∫ g(X) dm` with the default finite-sum integrator.
    pub fn expectation_of<G>(&self, measure: &Measure<T>, g: G) -> MeasureResult<f64>
    where
        G: Fn(&E) -> f64,
    {
        self.expectation_with(measure, g, &AtomicSum)
    }

    /// `∫ g(X) dm` with a caller-supplied integrator.
    pub fn expectation_with<G>(
        &self,
        measure: &Measure<T>,
        g: G,
        integrator: &dyn Integrator,
    ) -> MeasureResult<f64>
    where
        G: Fn(&E) -> f64,
    {
        self.ensure_defined_on(measure)?;
        let integrand = Integrand::new(self.name.clone(), measure, |x| g(&self.table[x]))?;
        integrator.integrate(&integrand)
    }

    /// `E[g(X) | given]` under `measure`.
    pub fn conditional_expectation_of<G>(
        &self,
        measure: &Measure<T>,
        given: &SigmaAlgebra<T>,
        g: G,
    ) -> MeasureResult<ConditionalExpectation<T>>
    where
        G: Fn(&E) -> f64,
    {
        self.ensure_defined_on(measure)?;
        ConditionalExpectation::compute(&self.name, measure, given, |x| g(&self.table[x]))
    }

    fn ensure_defined_on(&self, measure: &Measure<T>) -> MeasureResult<()> {
        if self.source().as_ref() == measure.algebra().as_ref() {
            Ok(())
        } else {
            Err(MeasureError::not_measurable(
                self.name.clone(),
                format!("variable is defined on {}, measure on {}", self.source(), measure.algebra()),
            ))
        }
    }

    /// Name of the variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source algebra.
    pub fn source(&self) -> &Arc<SigmaAlgebra<T>> {
        &self.witness.source
    }

    /// Target algebra.
    pub fn target(&self) -> &Arc<SigmaAlgebra<E>> {
        &self.witness.target
    }

    /// `σ(X)`, the coarsest algebra making the variable measurable.
    pub fn generated_algebra(&self) -> &SigmaAlgebra<T> {
        self.witness.generated()
    }

    /// The measurability witness.
    pub fn witness(&self) -> &MeasurabilityWitness<T, E> {
        &self.witness
    }

    /// The tabulated function.
    pub fn table(&self) -> &BTreeMap<T, E> {
        &self.table
    }
}

impl<T, E> RandomVariable<T, E>
where
    T: Ord + Clone + fmt::Debug,
    E: Ord + Clone + fmt::Debug + Into<f64>,
{
    /// `∫ X dm`; fails with `NotIntegrable` when `∫ |X| dm = ∞`.
    pub fn expectation(&self, measure: &Measure<T>) -> MeasureResult<f64> {
        self.expectation_of(measure, |value| value.clone().into())
    }

    /// `E[X | given]` under `measure`.
    pub fn conditional_expectation(
        &self,
        measure: &Measure<T>,
        given: &SigmaAlgebra<T>,
    ) -> MeasureResult<ConditionalExpectation<T>> {
        self.conditional_expectation_of(measure, given, |value| value.clone().into())
    }
}

impl<T: PartialEq, E: PartialEq> PartialEq for RandomVariable<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
            && self.witness.source == other.witness.source
            && self.witness.target == other.witness.target
    }
}

impl<T, E> fmt::Display for RandomVariable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {}",
            self.name, self.witness.source, self.witness.target
        )
    }
}

/// Anything that generates a sub-algebra of a sample space.
///
/// Lets random variables with different codomains share one family.
pub trait Observable<T> {
    /// Display name
    fn label(&self) -> &str;

    /// Algebra of the sample space the observation is defined on
    fn sample_algebra(&self) -> &Arc<SigmaAlgebra<T>>;

    /// Information carried by the observation
    fn information(&self) -> &SigmaAlgebra<T>;
}

impl<T, E> Observable<T> for RandomVariable<T, E>
where
    T: Ord + Clone + fmt::Debug,
    E: Ord + Clone + fmt::Debug,
{
    fn label(&self) -> &str {
        self.name()
    }

    fn sample_algebra(&self) -> &Arc<SigmaAlgebra<T>> {
        self.source()
    }

    fn information(&self) -> &SigmaAlgebra<T> {
        self.generated_algebra()
    }
}
