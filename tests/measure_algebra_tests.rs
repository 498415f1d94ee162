//! Algebraic laws of sigma-algebras and measures, checked with proptest.

use std::collections::BTreeSet;
use std::sync::Arc;

use cim_probability::{
    Event, ExtendedReal, Measure, ProbabilityMeasure, SigmaAlgebra, Topology, ValidationConfig,
};
use proptest::prelude::*;

const OUTCOMES: u8 = 8;

fn space() -> Event<u8> {
    Event::of(0..OUTCOMES)
}

fn subset() -> impl Strategy<Value = Event<u8>> {
    proptest::collection::btree_set(0..OUTCOMES, 0..=OUTCOMES as usize).prop_map(Event::from)
}

fn family() -> impl Strategy<Value = Vec<Event<u8>>> {
    proptest::collection::vec(subset(), 0..4)
}

fn mass_vector() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0..10.0f64, OUTCOMES as usize)
}

fn weighted(masses: &[f64]) -> Measure<u8> {
    let algebra = Arc::new(SigmaAlgebra::discrete(space()));
    Measure::from_atom_masses(algebra, (0..OUTCOMES).zip(masses.iter().copied())).unwrap()
}

/// Splits the space into two disjoint events from a per-outcome side choice.
fn split(sides: &[u8]) -> (Event<u8>, Event<u8>) {
    let left = (0..OUTCOMES).filter(|&x| sides[x as usize] == 0).collect();
    let right = (0..OUTCOMES).filter(|&x| sides[x as usize] == 1).collect();
    (left, right)
}

fn side_choices() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0..3u8, OUTCOMES as usize)
}

proptest! {
    #[test]
    fn generators_are_measurable(generators in family()) {
        let algebra = SigmaAlgebra::generated_by(space(), generators.clone()).unwrap();
        for generator in &generators {
            prop_assert!(algebra.is_measurable(generator));
            prop_assert!(algebra.is_measurable(&generator.complement_in(&space())));
        }
        prop_assert!(algebra.is_measurable(&Event::empty()));
        prop_assert!(algebra.is_measurable(&space()));
    }

    #[test]
    fn measurable_sets_are_closed_under_union_and_intersection(generators in family()) {
        let algebra = SigmaAlgebra::generated_by(space(), generators.clone()).unwrap();
        for a in &generators {
            for b in &generators {
                prop_assert!(algebra.is_measurable(&a.union(b)));
                prop_assert!(algebra.is_measurable(&a.intersection(b)));
                prop_assert!(algebra.is_measurable(&a.difference(b)));
            }
        }
    }

    #[test]
    fn more_generators_give_a_finer_algebra(generators in family(), extra in subset()) {
        let coarse = SigmaAlgebra::generated_by(space(), generators.clone()).unwrap();
        let mut more = generators;
        more.push(extra);
        let fine = SigmaAlgebra::generated_by(space(), more).unwrap();
        prop_assert!(coarse.is_sub_algebra_of(&fine));
        prop_assert!(fine.is_sub_algebra_of(&SigmaAlgebra::discrete(space())));
        prop_assert!(SigmaAlgebra::trivial(space()).is_sub_algebra_of(&coarse));
    }

    #[test]
    fn join_is_the_least_upper_bound(left in family(), right in family()) {
        let a = SigmaAlgebra::generated_by(space(), left.clone()).unwrap();
        let b = SigmaAlgebra::generated_by(space(), right.clone()).unwrap();
        let joined = a.join(&b).unwrap();
        let both = SigmaAlgebra::generated_by(space(), left.into_iter().chain(right)).unwrap();
        prop_assert!(a.is_sub_algebra_of(&joined));
        prop_assert!(b.is_sub_algebra_of(&joined));
        prop_assert_eq!(joined, both);
    }

    #[test]
    fn measure_is_additive_on_disjoint_sets(masses in mass_vector(), sides in side_choices()) {
        let m = weighted(&masses);
        let (a, b) = split(&sides);
        let sum = m.apply(&a).unwrap() + m.apply(&b).unwrap();
        prop_assert!(sum.approx_eq(m.apply(&a.union(&b)).unwrap(), 1e-9));
        prop_assert_eq!(m.apply(&Event::empty()).unwrap(), ExtendedReal::ZERO);
    }

    #[test]
    fn measure_is_monotone(masses in mass_vector(), a in subset(), b in subset()) {
        let m = weighted(&masses);
        let inner = m.apply(&a.intersection(&b)).unwrap();
        let outer = m.apply(&a.union(&b)).unwrap();
        prop_assert!(inner <= m.apply(&a).unwrap());
        prop_assert!(m.apply(&a).unwrap() <= outer);
    }

    #[test]
    fn probabilities_stay_in_the_unit_interval(masses in mass_vector(), event in subset()) {
        prop_assume!(masses.iter().sum::<f64>() > 0.0);
        let p = weighted(&masses).normalize(1e-9).unwrap();
        let probability = p.probability(&event).unwrap().value();
        let complement = p.complement_probability(&event).unwrap().value();
        prop_assert!((0.0..=1.0).contains(&probability));
        prop_assert!((probability + complement - 1.0).abs() < 1e-9);
    }

    #[test]
    fn checked_assignment_agrees_with_atom_masses(masses in mass_vector()) {
        let by_atoms = weighted(&masses);
        let assignment = |event: &Event<u8>| event.iter().map(|&x| masses[x as usize]).sum::<f64>();
        let algebra = Arc::clone(by_atoms.algebra());
        let checked = Measure::from_fn(algebra, assignment, &ValidationConfig::exhaustive()).unwrap();
        for x in 0..OUTCOMES {
            let single = Event::singleton(x);
            prop_assert!(checked.apply(&single).unwrap().approx_eq(by_atoms.apply(&single).unwrap(), 1e-12));
        }
    }
}

#[test]
fn borel_algebra_of_a_chain_topology() {
    // Open sets {}, {0}, {0, 1}, {0, 1, 2} generate atoms {0}, {1}, {2}.
    let space = Event::of(0..3u8);
    let topology = Topology::generated_by(space.clone(), [Event::of([0]), Event::of([0, 1])]).unwrap();
    let borel = SigmaAlgebra::borel(&topology);
    assert!(borel.is_discrete());
    assert!(borel.is_measurable(&Event::of([1, 2])));
}

#[test]
fn borel_algebra_of_the_indiscrete_topology_is_trivial() {
    let borel = SigmaAlgebra::borel(&Topology::indiscrete(Event::of(0..4u8)));
    assert_eq!(borel.atom_count(), 1);
    assert!(!borel.is_measurable(&Event::of([0])));
}

#[test]
fn counting_and_dirac_coexist_on_one_algebra() {
    let algebra = Arc::new(SigmaAlgebra::discrete(space()));
    let counting = Measure::counting(Arc::clone(&algebra));
    let dirac = Measure::dirac(Arc::clone(&algebra), &3).unwrap();
    let evens: Event<u8> = (0..OUTCOMES).filter(|x| x % 2 == 0).collect();
    assert_eq!(counting.apply(&evens).unwrap(), ExtendedReal::from_count(4));
    assert_eq!(dirac.apply(&evens).unwrap(), ExtendedReal::ZERO);
    assert!(ProbabilityMeasure::new(dirac, &ValidationConfig::default()).is_ok());
    assert!(Measure::dirac(algebra, &99).is_err());
}

#[test]
fn measurable_sets_of_a_small_algebra() {
    let algebra =
        SigmaAlgebra::generated_by(space(), [Event::of([0, 1]), Event::of([1, 2])]).unwrap();
    let sets: BTreeSet<Event<u8>> = algebra.measurable_sets().unwrap().collect();
    assert_eq!(sets.len(), 1 << algebra.atom_count());
    assert!(sets.contains(&Event::empty()));
    assert!(sets.contains(&space()));
}
