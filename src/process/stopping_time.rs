// Copyright 2025 Cowboy AI, LLC.

//! Stopping times
//!
//! A stopping time is a random index `τ` such that `{τ <= i}` is known at
//! index `i`. The codomain is extended with an explicit top element
//! [`StopIndex::Never`], so "never stops" is representable over unbounded
//! index sets without inventing an infinite index value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::filtration::Filtration;
use super::martingale::AdaptedProcess;
use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::{Event, SigmaAlgebra};

/// A stopping index: a finite index or the top element.
///
/// `At(i) < Never` for every `i`; finite indices compare by the index order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StopIndex<I> {
    /// Stops at this index
    At(I),
    /// Never stops
    Never,
}

impl<I> StopIndex<I> {
    /// The finite index, if any.
    pub fn index(&self) -> Option<&I> {
        match self {
            StopIndex::At(i) => Some(i),
            StopIndex::Never => None,
        }
    }
}

impl<I: fmt::Debug> fmt::Display for StopIndex<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopIndex::At(i) => write!(f, "{i:?}"),
            StopIndex::Never => f.write_str("never"),
        }
    }
}

/// A random index compatible with a filtration.
#[derive(Debug, Clone, PartialEq)]
pub struct StoppingTime<I, T> {
    name: String,
    ambient: Arc<SigmaAlgebra<T>>,
    table: BTreeMap<T, StopIndex<I>>,
}

enum Violation<I, T> {
    /// Some outcome stops at an index the filtration does not have.
    UnknownIndex(I, T),
    /// `{τ <= i}` is not measurable at `i`.
    NotKnown(I, Event<T>),
}

fn first_violation<I, T>(
    filtration: &Filtration<I, T>,
    table: &BTreeMap<T, StopIndex<I>>,
) -> Option<Violation<I, T>>
where
    I: PartialOrd + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
{
    for (outcome, tau) in table {
        if let StopIndex::At(index) = tau {
            if filtration.at(index).is_none() {
                return Some(Violation::UnknownIndex(index.clone(), outcome.clone()));
            }
        }
    }
    for (index, algebra) in filtration.stages() {
        let bound = StopIndex::At(index.clone());
        let stopped: Event<T> = table
            .iter()
            .filter(|(_, tau)| **tau <= bound)
            .map(|(outcome, _)| outcome.clone())
            .collect();
        if !algebra.is_measurable(&stopped) {
            return Some(Violation::NotKnown(index.clone(), stopped));
        }
    }
    None
}

fn tabulate<I, T, F>(filtration: &Filtration<I, T>, tau: F) -> BTreeMap<T, StopIndex<I>>
where
    I: PartialOrd + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
    F: Fn(&T) -> StopIndex<I>,
{
    filtration
        .ambient()
        .space()
        .iter()
        .map(|outcome| (outcome.clone(), tau(outcome)))
        .collect()
}

/// Whether `tau` is a stopping time for `filtration`.
pub fn is_stopping_time<I, T, F>(tau: F, filtration: &Filtration<I, T>) -> bool
where
    I: PartialOrd + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
    F: Fn(&T) -> StopIndex<I>,
{
    first_violation(filtration, &tabulate(filtration, tau)).is_none()
}

impl<I, T> StoppingTime<I, T>
where
    I: PartialOrd + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
{
    /// Tabulate `tau` and check `{τ <= i} ∈ F_i` at every index.
    ///
    /// Every finite value of `tau` must be an index of the filtration.
    pub fn new<F>(name: impl Into<String>, filtration: &Filtration<I, T>, tau: F) -> MeasureResult<Self>
    where
        F: Fn(&T) -> StopIndex<I>,
    {
        let name = name.into();
        let table = tabulate(filtration, tau);
        match first_violation(filtration, &table) {
            Some(Violation::UnknownIndex(index, outcome)) => {
                debug!(stopping_time = %name, index = ?index, "stopping index outside the filtration");
                return Err(MeasureError::StoppingTimeViolation {
                    index: format!("{index:?}"),
                    reason: format!("{name}({outcome:?}) is not an index of the filtration"),
                });
            }
            Some(Violation::NotKnown(index, stopped)) => {
                debug!(stopping_time = %name, index = ?index, "rejected stopping time");
                return Err(MeasureError::StoppingTimeViolation {
                    index: format!("{index:?}"),
                    reason: format!("{{{name} <= {index:?}}} = {stopped} is not known at that index"),
                });
            }
            None => {}
        }
        Ok(Self {
            name,
            ambient: Arc::clone(filtration.ambient()),
            table,
        })
    }

    /// The stopping time that always stops at `index`.
    pub fn constant(filtration: &Filtration<I, T>, index: I) -> MeasureResult<Self> {
        let name = format!("{index:?}");
        Self::new(name, filtration, |_| StopIndex::At(index.clone()))
    }

    /// Pointwise minimum of two stopping times (stop at whichever comes first).
    pub fn min(&self, other: &Self, filtration: &Filtration<I, T>) -> MeasureResult<Self> {
        self.combine(other, filtration, "∧", |a, b| if b < a { b } else { a })
    }

    /// Pointwise maximum of two stopping times.
    pub fn max(&self, other: &Self, filtration: &Filtration<I, T>) -> MeasureResult<Self> {
        self.combine(other, filtration, "∨", |a, b| if b > a { b } else { a })
    }

    fn combine(
        &self,
        other: &Self,
        filtration: &Filtration<I, T>,
        symbol: &str,
        pick: impl Fn(StopIndex<I>, StopIndex<I>) -> StopIndex<I>,
    ) -> MeasureResult<Self> {
        let name = format!("{} {symbol} {}", self.name, other.name);
        Self::new(name, filtration, |outcome| {
            match (self.table.get(outcome), other.table.get(outcome)) {
                (Some(a), Some(b)) => pick(a.clone(), b.clone()),
                _ => StopIndex::Never,
            }
        })
    }

    /// `τ(ω)`, `None` outside the sample space.
    pub fn value(&self, outcome: &T) -> Option<&StopIndex<I>> {
        self.table.get(outcome)
    }

    /// True when no outcome maps to `Never`.
    pub fn is_bounded(&self) -> bool {
        self.table.values().all(|tau| *tau != StopIndex::Never)
    }

    /// Name of the stopping time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Algebra of the sample space.
    pub fn ambient(&self) -> &Arc<SigmaAlgebra<T>> {
        &self.ambient
    }
}

impl<I, T> StoppingTime<I, T>
where
    I: Ord + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
{
    /// First index at which the process enters `set`, or `Never`.
    ///
    /// Needs a totally ordered index set.
    pub fn hitting_time<E>(
        process: &AdaptedProcess<I, T, E>,
        set: &Event<E>,
    ) -> MeasureResult<Self>
    where
        E: Ord + Clone + fmt::Debug,
    {
        let mut ordered: Vec<&I> = process.filtration().indices().collect();
        ordered.sort();
        let name = format!("hit {set}");
        Self::new(name, process.filtration(), |outcome| {
            ordered
                .iter()
                .find(|&&i| {
                    process
                        .variable_at(i)
                        .and_then(|x| x.eval(outcome))
                        .is_some_and(|value| set.contains(value))
                })
                .map(|&i| StopIndex::At(i.clone()))
                .unwrap_or(StopIndex::Never)
        })
    }
}

impl<I: fmt::Debug, T> fmt::Display for StoppingTime<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stopping time {}", self.name)
    }
}
