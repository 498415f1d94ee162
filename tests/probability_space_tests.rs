//! Probability spaces: total mass, bounds, complements and validation modes.

use std::sync::Arc;

use cim_probability::{
    Event, ExtendedReal, Measure, MeasureError, MeasureSpace, ProbabilityMeasure, RandomVariable,
    SigmaAlgebra, ValidationConfig, ValidationStrategy,
};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn die() -> Arc<SigmaAlgebra<u8>> {
    Arc::new(SigmaAlgebra::discrete(Event::of(1..=6)))
}

fn fair_die() -> ProbabilityMeasure<u8> {
    let m = Measure::from_atom_masses(die(), (1..=6).map(|x| (x, 1.0 / 6.0))).unwrap();
    ProbabilityMeasure::new(m, &ValidationConfig::default()).unwrap()
}

#[test]
fn fair_die_has_unit_mass() {
    let p = fair_die();
    assert!(p.total().approx_eq(ExtendedReal::ONE, 1e-12));
    assert_eq!(p.probability(&Event::of(1..=6)).unwrap().value(), 1.0);
    assert_eq!(p.probability(&Event::empty()).unwrap().value(), 0.0);
}

#[test]
fn total_slightly_below_one_is_rejected() {
    let unit = Arc::new(SigmaAlgebra::trivial(Event::of([0u8])));
    let almost = Measure::from_atom_masses(Arc::clone(&unit), [(0, 0.999999)]).unwrap();
    assert!(matches!(
        ProbabilityMeasure::new(almost, &ValidationConfig::default()),
        Err(MeasureError::NotTotalToOne { .. })
    ));

    let exact = Measure::from_atom_masses(unit, [(0, 1.0)]).unwrap();
    assert!(ProbabilityMeasure::new(exact, &ValidationConfig::default()).is_ok());
}

#[test]
fn loose_tolerance_accepts_rounding() {
    let unit = Arc::new(SigmaAlgebra::trivial(Event::of([0u8])));
    let almost = Measure::from_atom_masses(unit, [(0, 0.999999)]).unwrap();
    let config = ValidationConfig::default().with_tolerance(1e-3);
    assert!(ProbabilityMeasure::new(almost, &config).is_ok());
}

#[test_case(&[1], 1.0 / 6.0 ; "single face")]
#[test_case(&[2, 4, 6], 0.5 ; "even faces")]
#[test_case(&[1, 2, 3, 4, 5], 5.0 / 6.0 ; "all but six")]
fn probability_and_complement_sum_to_one(faces: &[u8], expected: f64) {
    let p = fair_die();
    let event = Event::of(faces.iter().copied());
    let probability = p.probability(&event).unwrap().value();
    let complement = p.complement_probability(&event).unwrap().value();
    assert!((probability - expected).abs() < 1e-12);
    assert!((probability + complement - 1.0).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&probability));
}

#[test]
fn non_measurable_event_is_rejected() {
    let parity = Arc::new(
        SigmaAlgebra::generated_by(Event::of(1..=6u8), [Event::of([2, 4, 6])]).unwrap(),
    );
    let m = Measure::from_atom_masses(parity, [(1, 0.5), (2, 0.5)]).unwrap();
    let p = ProbabilityMeasure::new(m, &ValidationConfig::default()).unwrap();
    assert!((p.probability(&Event::of([1, 3, 5])).unwrap().value() - 0.5).abs() < 1e-12);
    let err = p.probability(&Event::of([1, 2])).unwrap_err();
    assert!(err.is_measurability_error());
}

fn squared_size(event: &Event<u8>) -> f64 {
    (event.len() * event.len()) as f64
}

#[test_case(ValidationConfig::exhaustive() ; "exhaustive")]
#[test_case(ValidationConfig { strategy: ValidationStrategy::sampled(), ..ValidationConfig::default() } ; "sampled")]
fn non_additive_assignment_is_rejected(config: ValidationConfig) {
    let err = Measure::from_fn(die(), squared_size, &config).unwrap_err();
    assert!(matches!(err, MeasureError::NotAdditive(_)));
}

#[test]
fn trusted_assignment_reads_atoms_only() {
    let m = Measure::from_fn(die(), squared_size, &ValidationConfig::trusted()).unwrap();
    assert_eq!(m.total(), ExtendedReal::from_count(6));
}

#[test]
fn additive_assignment_is_accepted_by_every_strategy() {
    let size = |event: &Event<u8>| event.len() as f64;
    for config in [
        ValidationConfig::exhaustive(),
        ValidationConfig::default(),
        ValidationConfig::trusted(),
    ] {
        let m = Measure::from_fn(die(), size, &config).unwrap();
        assert_eq!(m, Measure::counting(die()));
    }
}

#[test]
fn empty_set_must_have_zero_mass() {
    let shifted = |event: &Event<u8>| event.len() as f64 + 1.0;
    let err = Measure::from_fn(die(), shifted, &ValidationConfig::trusted()).unwrap_err();
    assert!(matches!(err, MeasureError::NotAdditive(_)));
}

#[test]
fn normalizing_counting_measure_gives_uniform() {
    let uniform = Measure::counting(die()).normalize(1e-9).unwrap();
    assert_eq!(uniform.as_measure(), fair_die().as_measure());
}

#[test]
fn law_is_recomputed_and_equal_by_value() {
    let space = MeasureSpace::new(fair_die().into_measure());
    let bits = Arc::new(SigmaAlgebra::discrete(Event::of([0u8, 1])));
    let parity = RandomVariable::new("parity", space.algebra(), &bits, |x| x % 2).unwrap();
    let first = space.law(&parity).unwrap();
    let second = space.law(&parity).unwrap();
    assert_eq!(first, second);

    let law = ProbabilityMeasure::new(first, &ValidationConfig::default()).unwrap();
    assert!((law.probability(&Event::singleton(0)).unwrap().value() - 0.5).abs() < 1e-12);
}

#[test]
fn law_of_identity_is_the_measure() {
    let p = fair_die();
    let id = RandomVariable::new("id", p.algebra(), p.algebra(), |&x| x).unwrap();
    assert_eq!(&id.law(&p).unwrap(), p.as_measure());
}

#[test]
fn law_of_composition_is_pushforward_of_law() {
    let p = fair_die();
    let bits = Arc::new(SigmaAlgebra::discrete(Event::of([0u8, 1])));
    let doubled = Arc::new(SigmaAlgebra::discrete(Event::of((1..=6u8).map(|x| 2 * x))));
    let double = RandomVariable::new("double", p.algebra(), &doubled, |&x| 2 * x).unwrap();
    let high = RandomVariable::new("high", &doubled, &bits, |&y| u8::from(y > 6)).unwrap();

    let composed = double.compose(&high).unwrap();
    assert_eq!(
        composed.law(&p).unwrap(),
        high.law(&double.law(&p).unwrap()).unwrap()
    );
}

#[test]
fn conditional_probability_given_event() {
    let p = fair_die();
    let even = Event::of([2, 4, 6]);
    let given_even = p.conditional(&even, 1e-9).unwrap();
    let six = given_even.probability(&Event::singleton(6)).unwrap().value();
    assert!((six - 1.0 / 3.0).abs() < 1e-12);

    let err = p.conditional(&Event::empty(), 1e-9).unwrap_err();
    assert!(matches!(err, MeasureError::NotTotalToOne { .. }));
}
