// Copyright 2025 Cowboy AI, LLC.

//! Adapted processes and martingales
//!
//! A process `{X_i}` is adapted when each `X_i` only uses information
//! available at `i`, i.e. `σ(X_i) ⊆ F_i`. A martingale additionally
//! satisfies `E[X_j | F_i] = X_i` for `i <= j`; over finite spaces this is
//! checked block by block on the atoms of `F_i` with positive mass.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::filtration::Filtration;
use super::stopping_time::{StopIndex, StoppingTime};
use crate::config::ValidationConfig;
use crate::errors::{MeasureError, MeasureResult};
use crate::measure::Measure;
use crate::random::RandomVariable;

/// A family of random variables adapted to a filtration.
#[derive(Debug, Clone)]
pub struct AdaptedProcess<I, T, E> {
    filtration: Filtration<I, T>,
    variables: Vec<(I, RandomVariable<T, E>)>,
}

impl<I, T, E> AdaptedProcess<I, T, E>
where
    I: PartialOrd + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
    E: Ord + Clone + fmt::Debug,
{
    /// Check that every `X_i` is defined on the ambient algebra and is
    /// `F_i`-measurable.
    pub fn new(
        filtration: &Filtration<I, T>,
        variables: impl IntoIterator<Item = (I, RandomVariable<T, E>)>,
    ) -> MeasureResult<Self> {
        let variables: Vec<(I, RandomVariable<T, E>)> = variables.into_iter().collect();
        for (index, variable) in &variables {
            if variable.source().as_ref() != filtration.ambient().as_ref() {
                return Err(MeasureError::not_measurable(
                    variable.name(),
                    "variable is not defined on the ambient algebra",
                ));
            }
            let stage = filtration.at(index).ok_or_else(|| {
                MeasureError::InvalidSubalgebra(format!("filtration has no algebra at {index:?}"))
            })?;
            if !variable.generated_algebra().is_sub_algebra_of(stage) {
                return Err(MeasureError::not_measurable(
                    variable.name(),
                    format!("not measurable with respect to the algebra at {index:?}"),
                ));
            }
        }
        Ok(Self {
            filtration: filtration.clone(),
            variables,
        })
    }

    /// `X_i`.
    pub fn variable_at(&self, index: &I) -> Option<&RandomVariable<T, E>> {
        self.variables
            .iter()
            .find(|(i, _)| i == index)
            .map(|(_, variable)| variable)
    }

    /// `(index, X_i)` pairs, in supply order.
    pub fn variables(&self) -> impl Iterator<Item = (&I, &RandomVariable<T, E>)> {
        self.variables.iter().map(|(i, variable)| (i, variable))
    }

    /// The filtration the process is adapted to.
    pub fn filtration(&self) -> &Filtration<I, T> {
        &self.filtration
    }

    /// `X_τ(ω)`, or `None` when `τ(ω)` is `Never` or has no variable.
    pub fn stopped_value(&self, tau: &StoppingTime<I, T>, outcome: &T) -> Option<&E> {
        match tau.value(outcome)? {
            StopIndex::At(index) => self.variable_at(index)?.eval(outcome),
            StopIndex::Never => None,
        }
    }
}

impl<I, T, E> fmt::Display for AdaptedProcess<I, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process of {} variables adapted to {}", self.variables.len(), self.filtration)
    }
}

/// Which inequality relates `E[X_j | F_i]` and `X_i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MartingaleKind {
    /// `E[X_j | F_i] = X_i`
    Martingale,
    /// `E[X_j | F_i] >= X_i`
    Submartingale,
    /// `E[X_j | F_i] <= X_i`
    Supermartingale,
}

impl MartingaleKind {
    fn holds(self, conditional: f64, current: f64, tolerance: f64) -> bool {
        let slack = tolerance * (1.0 + conditional.abs().max(current.abs()));
        match self {
            MartingaleKind::Martingale => (conditional - current).abs() <= slack,
            MartingaleKind::Submartingale => conditional >= current - slack,
            MartingaleKind::Supermartingale => conditional <= current + slack,
        }
    }
}

/// A real-valued adapted process verified against the martingale condition.
#[derive(Debug, Clone)]
pub struct Martingale<I, T, E> {
    process: AdaptedProcess<I, T, E>,
    measure: Measure<T>,
    kind: MartingaleKind,
}

impl<I, T, E> Martingale<I, T, E>
where
    I: PartialOrd + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
    E: Ord + Clone + fmt::Debug + Into<f64>,
{
    /// Verify integrability of every `X_i` and the `kind` condition for
    /// every comparable pair `i <= j`.
    pub fn new(
        process: AdaptedProcess<I, T, E>,
        measure: &Measure<T>,
        kind: MartingaleKind,
        config: &ValidationConfig,
    ) -> MeasureResult<Self> {
        let tolerance = config.tolerance;
        for (_, variable) in process.variables() {
            variable.expectation(measure)?;
        }
        for (i, current) in process.variables() {
            let stage = process.filtration().at(i).ok_or_else(|| {
                MeasureError::InvalidSubalgebra(format!("filtration has no algebra at {i:?}"))
            })?;
            for (j, later) in process.variables() {
                if !(i <= j) {
                    continue;
                }
                let conditional = later.conditional_expectation(measure, stage)?;
                for (block, value) in conditional.blocks() {
                    let Some(outcome) = block.first() else {
                        continue;
                    };
                    let Some(now) = current.eval(outcome) else {
                        continue;
                    };
                    let now: f64 = now.clone().into();
                    if !kind.holds(value, now, tolerance) {
                        debug!(from = ?i, to = ?j, block = %block, "martingale condition failed");
                        return Err(MeasureError::NotAMartingale {
                            from: format!("{i:?}"),
                            to: format!("{j:?}"),
                            reason: format!("on {block} expected {now}, conditional mean {value}"),
                        });
                    }
                }
            }
        }
        Ok(Self {
            process,
            measure: measure.clone(),
            kind,
        })
    }

    /// The underlying process.
    pub fn process(&self) -> &AdaptedProcess<I, T, E> {
        &self.process
    }

    /// The measure the condition was verified under.
    pub fn measure(&self) -> &Measure<T> {
        &self.measure
    }

    /// Which condition was verified.
    pub fn kind(&self) -> MartingaleKind {
        self.kind
    }

    /// `E[X_i]` for every index; constant for a martingale.
    pub fn expectations(&self) -> MeasureResult<Vec<(I, f64)>> {
        self.process
            .variables()
            .map(|(i, variable)| Ok((i.clone(), variable.expectation(&self.measure)?)))
            .collect()
    }
}

impl fmt::Display for MartingaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MartingaleKind::Martingale => f.write_str("martingale"),
            MartingaleKind::Submartingale => f.write_str("submartingale"),
            MartingaleKind::Supermartingale => f.write_str("supermartingale"),
        }
    }
}

impl<I, T, E> fmt::Display for Martingale<I, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} under {}", self.kind, self.measure)
    }
}
