// Copyright 2025 Cowboy AI, LLC.

//! Measure spaces with a designated volume
//!
//! A [`MeasureSpace`] pairs an algebra with one privileged measure so that
//! code working against a single fixed measure does not thread it through
//! every call. Every method here delegates to the explicit-measure API with
//! `volume()`; other measures over the same algebra remain usable directly.

use std::fmt;
use std::sync::Arc;

use super::measure::Measure;
use super::probability::ProbabilityMeasure;
use crate::config::ValidationConfig;
use crate::errors::MeasureResult;
use crate::measurable::{Event, SigmaAlgebra};
use crate::random::{Independence, Observable, RandomVariable};
use crate::value::ExtendedReal;

/// An algebra together with its designated measure.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureSpace<T> {
    volume: Measure<T>,
}

impl<T: Ord + Clone + fmt::Debug> MeasureSpace<T> {
    /// Designate `volume` as the canonical measure.
    pub fn new(volume: Measure<T>) -> Self {
        Self { volume }
    }

    /// The designated measure.
    pub fn volume(&self) -> &Measure<T> {
        &self.volume
    }

    /// The underlying algebra.
    pub fn algebra(&self) -> &Arc<SigmaAlgebra<T>> {
        self.volume.algebra()
    }

    /// View the space as a probability space.
    pub fn as_probability_space(
        &self,
        config: &ValidationConfig,
    ) -> MeasureResult<ProbabilityMeasure<T>> {
        ProbabilityMeasure::new(self.volume.clone(), config)
    }

    /// Volume of a measurable set.
    pub fn measure_of(&self, event: &Event<T>) -> MeasureResult<ExtendedReal> {
        self.volume.apply(event)
    }

    /// Law of `variable` under the volume.
    pub fn law<E>(&self, variable: &RandomVariable<T, E>) -> MeasureResult<Measure<E>>
    where
        E: Ord + Clone + fmt::Debug,
    {
        variable.law(&self.volume)
    }

    /// Expectation of `variable` under the volume.
    pub fn expectation<E>(&self, variable: &RandomVariable<T, E>) -> MeasureResult<f64>
    where
        E: Ord + Clone + fmt::Debug + Into<f64>,
    {
        variable.expectation(&self.volume)
    }

    /// Mutual independence of sub-algebras under the volume.
    pub fn independent(&self, family: &[&SigmaAlgebra<T>]) -> MeasureResult<bool> {
        Ok(Independence::new(&self.volume)
            .of_algebras(family)?
            .is_independent())
    }

    /// Independence of two observations under the volume.
    pub fn variables_independent(
        &self,
        x: &dyn Observable<T>,
        y: &dyn Observable<T>,
    ) -> MeasureResult<bool> {
        Ok(Independence::new(&self.volume)
            .of_variables(&[x, y])?
            .is_independent())
    }
}

impl<T> fmt::Display for MeasureSpace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "space with volume {}", self.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MeasureError;

    fn dice_space(total: f64) -> MeasureSpace<u8> {
        let algebra = Arc::new(SigmaAlgebra::discrete(Event::of(1..=6)));
        let volume =
            Measure::from_atom_masses(algebra, (1..=6).map(|x| (x, total / 6.0))).unwrap();
        MeasureSpace::new(volume)
    }

    #[test]
    fn test_implicit_and_explicit_surfaces_agree() {
        let space = dice_space(1.0);
        let face = RandomVariable::new("face", space.algebra(), space.algebra(), |&x| x).unwrap();
        assert_eq!(space.law(&face).unwrap(), face.law(space.volume()).unwrap());
        assert!((space.expectation(&face).unwrap() - 3.5).abs() < 1e-12);
        assert_eq!(
            space.measure_of(&Event::of([1, 2])).unwrap(),
            space.volume().apply(&Event::of([1, 2])).unwrap()
        );
    }

    #[test]
    fn test_as_probability_space() {
        let config = ValidationConfig::default();
        assert!(dice_space(1.0).as_probability_space(&config).is_ok());
        assert!(matches!(
            dice_space(6.0).as_probability_space(&config),
            Err(MeasureError::NotTotalToOne { .. })
        ));
    }

    #[test]
    fn test_other_measures_coexist() {
        let space = dice_space(1.0);
        let counting = Measure::counting(Arc::clone(space.algebra()));
        assert_ne!(&counting, space.volume());
        assert_eq!(counting.total(), ExtendedReal::from_count(6));
    }
}
