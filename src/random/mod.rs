//! Random variables, laws, integration and independence

pub mod independence;
pub mod integration;
pub mod variable;

pub use independence::{
    conditionally_independent, events_independent, family_independent, independent,
    variables_independent, Counterexample, Independence, IndependenceReport,
};
pub use integration::{AtomicSum, ConditionalExpectation, Integrand, Integrator};
pub use variable::{MeasurabilityWitness, Observable, RandomVariable};
