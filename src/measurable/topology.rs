// Copyright 2025 Cowboy AI, LLC.

//! Finite topologies, the input of the Borel construction

use std::collections::BTreeSet;
use std::fmt;

use super::event::Event;
use crate::errors::{MeasureError, MeasureResult};

/// A topology on a finite space, given by its open sets.
///
/// # Invariants
///
/// - The empty set and the whole space are open
/// - Open sets are closed under union and intersection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology<T> {
    space: Event<T>,
    open_sets: BTreeSet<Event<T>>,
}

impl<T: Ord + Clone + fmt::Debug> Topology<T> {
    /// Validate a family of open sets.
    pub fn new(space: Event<T>, open_sets: impl IntoIterator<Item = Event<T>>) -> MeasureResult<Self> {
        let open_sets: BTreeSet<Event<T>> = open_sets.into_iter().collect();
        for required in [Event::empty(), space.clone()] {
            if !open_sets.contains(&required) {
                return Err(Self::invalid(format!("{required} must be open")));
            }
        }
        for a in &open_sets {
            if !a.is_subset(&space) {
                return Err(Self::invalid(format!("{a} is not a subset of the space")));
            }
            for b in &open_sets {
                if !open_sets.contains(&a.union(b)) {
                    return Err(Self::invalid(format!("union of {a} and {b} is not open")));
                }
                if !open_sets.contains(&a.intersection(b)) {
                    return Err(Self::invalid(format!(
                        "intersection of {a} and {b} is not open"
                    )));
                }
            }
        }
        Ok(Self { space, open_sets })
    }

    /// Coarsest topology containing `subbasis`: close under finite
    /// intersections, then under unions.
    pub fn generated_by(
        space: Event<T>,
        subbasis: impl IntoIterator<Item = Event<T>>,
    ) -> MeasureResult<Self> {
        let mut open_sets: BTreeSet<Event<T>> = BTreeSet::from([Event::empty(), space.clone()]);
        for set in subbasis {
            if !set.is_subset(&space) {
                return Err(Self::invalid(format!("{set} is not a subset of the space")));
            }
            open_sets.insert(set);
        }
        loop {
            let current: Vec<Event<T>> = open_sets.iter().cloned().collect();
            let before = open_sets.len();
            for a in &current {
                for b in &current {
                    open_sets.insert(a.union(b));
                    open_sets.insert(a.intersection(b));
                }
            }
            if open_sets.len() == before {
                break;
            }
        }
        Ok(Self { space, open_sets })
    }

    /// Every subset is open.
    pub fn discrete(space: Event<T>) -> Self {
        let open_sets = space.iter().cloned().map(Event::singleton).collect::<Vec<_>>();
        let mut topology = Self {
            space: space.clone(),
            open_sets: BTreeSet::from([Event::empty(), space]),
        };
        for singleton in open_sets {
            let grown: Vec<Event<T>> = topology
                .open_sets
                .iter()
                .map(|open| open.union(&singleton))
                .collect();
            topology.open_sets.extend(grown);
        }
        topology
    }

    /// Only the empty set and the space are open.
    pub fn indiscrete(space: Event<T>) -> Self {
        Self {
            open_sets: BTreeSet::from([Event::empty(), space.clone()]),
            space,
        }
    }

    /// A family that is not a topology has no Borel sets, so the failure is
    /// reported as a measurability error on the subject `topology`.
    fn invalid(reason: String) -> MeasureError {
        MeasureError::not_measurable("topology", reason)
    }
}

impl<T: Ord> Topology<T> {
    /// The underlying space.
    pub fn space(&self) -> &Event<T> {
        &self.space
    }

    /// The open sets, in order.
    pub fn open_sets(&self) -> impl Iterator<Item = &Event<T>> {
        self.open_sets.iter()
    }

    /// Whether `set` is open.
    pub fn is_open(&self, set: &Event<T>) -> bool {
        self.open_sets.contains(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurable::SigmaAlgebra;

    #[test]
    fn test_sierpinski_space() {
        let space = Event::of([0u8, 1]);
        let topology =
            Topology::new(space.clone(), [Event::empty(), Event::singleton(1), space]).unwrap();
        assert!(topology.is_open(&Event::singleton(1)));
        assert!(!topology.is_open(&Event::singleton(0)));

        let borel = SigmaAlgebra::borel(&topology);
        assert!(borel.is_discrete());
        assert_eq!(borel.kind(), crate::measurable::AlgebraKind::Borel);
    }

    #[test]
    fn test_accessors_need_only_ordered_outcomes() {
        fn open_count<T: Ord>(topology: &Topology<T>) -> usize {
            topology.open_sets().count()
        }
        let topology = Topology::indiscrete(Event::of([0u8, 1]));
        assert_eq!(open_count(&topology), 2);
        assert_eq!(topology.space().len(), 2);
    }

    #[test]
    fn test_rejects_non_topology() {
        let space = Event::of([0u8, 1, 2]);
        let missing_union = Topology::new(
            space.clone(),
            [Event::empty(), Event::singleton(0), Event::singleton(1), space.clone()],
        );
        let err = missing_union.unwrap_err();
        assert!(err.is_measurability_error());
        assert!(matches!(
            err,
            MeasureError::NotMeasurable { ref subject, .. } if subject == "topology"
        ));
        assert!(Topology::new(space, [Event::empty()]).is_err());
    }

    #[test]
    fn test_generated_and_discrete() {
        let space = Event::of(1..=3u8);
        let generated =
            Topology::generated_by(space.clone(), [Event::of([1, 2]), Event::of([2, 3])]).unwrap();
        assert!(generated.is_open(&Event::singleton(2)));
        assert!(!generated.is_open(&Event::singleton(1)));

        let discrete = Topology::discrete(space.clone());
        assert_eq!(discrete.open_sets().count(), 8);
        assert_eq!(Topology::indiscrete(space).open_sets().count(), 2);
    }
}
