// Copyright 2025 Cowboy AI, LLC.

//! Probability measures
//!
//! A [`ProbabilityMeasure`] is a [`Measure`] whose total mass has been
//! checked to equal one. It has no storage of its own. Its queries return
//! [`Probability`] values, and the `[0, 1]` bound is re-checked on every
//! query instead of being assumed.

use std::fmt;
use std::ops::Deref;
use tracing::debug;

use super::measure::Measure;
use crate::config::ValidationConfig;
use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::Event;
use crate::value::{ExtendedReal, Probability};

/// A measure of total mass one.
#[derive(Debug, Clone)]
pub struct ProbabilityMeasure<T> {
    measure: Measure<T>,
    tolerance: f64,
}

impl<T: Ord + Clone + fmt::Debug> ProbabilityMeasure<T> {
    /// Wrap `measure`, failing with `NotTotalToOne` unless its total mass is
    /// one within `config.tolerance`.
    pub fn new(measure: Measure<T>, config: &ValidationConfig) -> MeasureResult<Self> {
        config.validate()?;
        Self::with_tolerance(measure, config.tolerance)
    }

    pub(crate) fn with_tolerance(measure: Measure<T>, tolerance: f64) -> MeasureResult<Self> {
        let total = measure.total();
        if !total.approx_eq(ExtendedReal::ONE, tolerance) {
            debug!(total = %total, tolerance, "rejected probability measure");
            return Err(MeasureError::NotTotalToOne {
                total: total.to_string(),
            });
        }
        Ok(Self { measure, tolerance })
    }

    /// Probability of a measurable event.
    pub fn probability(&self, event: &Event<T>) -> MeasureResult<Probability> {
        let mass = self.measure.apply(event)?;
        Probability::from_mass(mass, self.tolerance)
    }

    /// Probability of the complement of `event`: `1 - p(event)`.
    pub fn complement_probability(&self, event: &Event<T>) -> MeasureResult<Probability> {
        Ok(self.probability(event)?.complement())
    }

    /// Tolerance the total mass was checked with.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The underlying measure.
    pub fn as_measure(&self) -> &Measure<T> {
        &self.measure
    }

    /// Unwrap into the underlying measure.
    pub fn into_measure(self) -> Measure<T> {
        self.measure
    }
}

impl<T> Deref for ProbabilityMeasure<T> {
    type Target = Measure<T>;

    fn deref(&self) -> &Self::Target {
        &self.measure
    }
}

impl<T: PartialEq> PartialEq for ProbabilityMeasure<T> {
    fn eq(&self, other: &Self) -> bool {
        self.measure == other.measure
    }
}

impl<T> fmt::Display for ProbabilityMeasure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "probability {}", self.measure)
    }
}
