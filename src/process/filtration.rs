// Copyright 2025 Cowboy AI, LLC.

//! Filtrations: index-monotone families of sub-algebras
//!
//! The index order is supplied by the caller through `PartialOrd` and may be
//! partial. Validity is checked once, exhaustively over the supplied finite
//! index set, and the filtration is immutable afterwards.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::SigmaAlgebra;
use crate::random::Observable;

/// A family `{F_i}` with `i <= j ⇒ F_i ⊆ F_j ⊆ ambient`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtration<I, T> {
    ambient: Arc<SigmaAlgebra<T>>,
    stages: Vec<(I, SigmaAlgebra<T>)>,
}

impl<I, T> Filtration<I, T>
where
    I: PartialOrd + Clone + fmt::Debug,
    T: Ord + Clone + fmt::Debug,
{
    /// Validate and build a filtration.
    ///
    /// Fails with `InvalidSubalgebra` when a stage is not contained in the
    /// ambient algebra. Fails with `FiltrationViolation` when a later stage
    /// forgets a set known at an earlier one, or an index is repeated.
    pub fn new(
        ambient: Arc<SigmaAlgebra<T>>,
        stages: impl IntoIterator<Item = (I, SigmaAlgebra<T>)>,
    ) -> MeasureResult<Self> {
        let stages: Vec<(I, SigmaAlgebra<T>)> = stages.into_iter().collect();
        for (index, algebra) in &stages {
            if !algebra.is_sub_algebra_of(&ambient) {
                return Err(MeasureError::InvalidSubalgebra(format!(
                    "algebra at {index:?} is not contained in the ambient {ambient}"
                )));
            }
        }
        for (p, (i, earlier)) in stages.iter().enumerate() {
            for (q, (j, later)) in stages.iter().enumerate() {
                if p < q && i == j {
                    debug!(index = ?i, "filtration repeats an index");
                    return Err(MeasureError::FiltrationViolation {
                        from: format!("{i:?}"),
                        to: format!("{j:?}"),
                    });
                }
                if p != q && i <= j && !earlier.is_sub_algebra_of(later) {
                    debug!(from = ?i, to = ?j, "filtration is not monotone");
                    return Err(MeasureError::FiltrationViolation {
                        from: format!("{i:?}"),
                        to: format!("{j:?}"),
                    });
                }
            }
        }
        Ok(Self { ambient, stages })
    }

    /// Natural filtration of a process: `F_i = σ(X_j : j <= i)`.
    pub fn natural<'a>(
        ambient: Arc<SigmaAlgebra<T>>,
        process: impl IntoIterator<Item = (I, &'a dyn Observable<T>)>,
    ) -> MeasureResult<Self>
    where
        T: 'a,
    {
        let process: Vec<(I, &dyn Observable<T>)> = process.into_iter().collect();
        let mut stages = Vec::with_capacity(process.len());
        for (i, _) in &process {
            let mut algebra = SigmaAlgebra::trivial(ambient.space().clone());
            for (j, observation) in &process {
                if j <= i {
                    algebra = algebra.join(observation.information())?;
                }
            }
            stages.push((i.clone(), algebra));
        }
        Self::new(ambient, stages)
    }

    /// Algebra at index `i`.
    pub fn at(&self, index: &I) -> Option<&SigmaAlgebra<T>> {
        self.stages
            .iter()
            .find(|(i, _)| i == index)
            .map(|(_, algebra)| algebra)
    }

    /// Supplied indices, in supply order.
    pub fn indices(&self) -> impl Iterator<Item = &I> {
        self.stages.iter().map(|(i, _)| i)
    }

    /// `(index, algebra)` pairs, in supply order.
    pub fn stages(&self) -> impl Iterator<Item = (&I, &SigmaAlgebra<T>)> {
        self.stages.iter().map(|(i, algebra)| (i, algebra))
    }

    /// The ambient algebra.
    pub fn ambient(&self) -> &Arc<SigmaAlgebra<T>> {
        &self.ambient
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when no index was supplied.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<I, T> fmt::Display for Filtration<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filtration of {} with {} stages", self.ambient, self.stages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurable::Event;

    fn two_flips() -> Event<(u8, u8)> {
        Event::of([(0, 0), (0, 1), (1, 0), (1, 1)])
    }

    fn first_flip() -> SigmaAlgebra<(u8, u8)> {
        SigmaAlgebra::generated_by(two_flips(), [two_flips().filter(|w| w.0 == 1)]).unwrap()
    }

    #[test]
    fn test_increasing_family_is_accepted() {
        let ambient = Arc::new(SigmaAlgebra::discrete(two_flips()));
        let filtration = Filtration::new(
            Arc::clone(&ambient),
            [
                (0u32, SigmaAlgebra::trivial(two_flips())),
                (1, first_flip()),
                (2, SigmaAlgebra::discrete(two_flips())),
            ],
        )
        .unwrap();
        assert_eq!(filtration.len(), 3);
        assert_eq!(filtration.at(&1), Some(&first_flip()));
        assert!(filtration.at(&7).is_none());
    }

    #[test]
    fn test_shrinking_family_is_rejected() {
        let ambient = Arc::new(SigmaAlgebra::discrete(two_flips()));
        let err = Filtration::new(
            ambient,
            [(0u32, first_flip()), (1, SigmaAlgebra::trivial(two_flips()))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            MeasureError::FiltrationViolation {
                from: "0".to_string(),
                to: "1".to_string()
            }
        );
    }

    #[test]
    fn test_repeated_index_is_rejected() {
        let ambient = Arc::new(SigmaAlgebra::discrete(two_flips()));
        let err = Filtration::new(ambient, [(1u32, first_flip()), (1, first_flip())]).unwrap_err();
        assert!(matches!(err, MeasureError::FiltrationViolation { .. }));
    }

    #[test]
    fn test_stage_outside_ambient_is_rejected() {
        let ambient = Arc::new(SigmaAlgebra::trivial(two_flips()));
        let err = Filtration::new(ambient, [(0u32, first_flip())]).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidSubalgebra(_)));
    }

    #[test]
    fn test_partial_order_only_compares_comparable_indices() {
        // Incomparable indices may carry unrelated information.
        #[derive(Debug, Clone, PartialEq)]
        struct Branch(&'static str);
        impl PartialOrd for Branch {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                (self.0 == other.0).then_some(std::cmp::Ordering::Equal)
            }
        }

        let ambient = Arc::new(SigmaAlgebra::discrete(two_flips()));
        let second_flip =
            SigmaAlgebra::generated_by(two_flips(), [two_flips().filter(|w| w.1 == 1)]).unwrap();
        let filtration =
            Filtration::new(ambient, [(Branch("left"), first_flip()), (Branch("right"), second_flip)]);
        assert!(filtration.is_ok());
    }
}
