//! # CIM Probability
//!
//! Measure-theoretic probability over finite sample spaces for the Composable
//! Information Machine.
//!
//! This crate provides the building blocks of probability as measure theory:
//! - **Measurable spaces**: Events, sigma-algebras and Borel algebras of finite topologies
//! - **Measures**: Countably additive set functions with values in `[0, ∞]`
//! - **Probability measures**: Measures of total mass one
//! - **Measure spaces**: An algebra with a designated volume
//! - **Random variables**: Measurable maps carrying a measurability witness, with laws
//! - **Independence**: Mutual and conditional independence of algebras, events and variables
//! - **Processes**: Filtrations, stopping times and martingales
//!
//! ## Design Principles
//!
//! 1. **Smart constructors**: Every invariant is checked when a value is built
//! 2. **Immutability**: Algebras, measures and variables never change after construction
//! 3. **Explicit measures**: Several measures may coexist on one algebra
//! 4. **Finite and decidable**: Sample spaces are finite, so every check terminates
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use cim_probability::{Event, Measure, ProbabilityMeasure, SigmaAlgebra, ValidationConfig};
//!
//! let algebra = Arc::new(SigmaAlgebra::discrete(Event::of(1..=6u8)));
//! let fair = Measure::from_atom_masses(algebra, (1..=6).map(|x| (x, 1.0 / 6.0))).unwrap();
//! let die = ProbabilityMeasure::new(fair, &ValidationConfig::default()).unwrap();
//!
//! let even = die.probability(&Event::of([2, 4, 6])).unwrap();
//! assert!((even.value() - 0.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]

mod config;
mod errors;
mod value;
pub mod measurable;
pub mod measure;
pub mod process;
pub mod random;

// Re-export core types
pub use config::{ValidationConfig, ValidationStrategy};
pub use errors::{MeasureError, MeasureResult};
pub use value::{ExtendedReal, Probability};

pub use measurable::{AlgebraKind, Event, SigmaAlgebra, Topology, MAX_ENUMERABLE_ATOMS};
pub use measure::{Measure, MeasureSpace, ProbabilityMeasure};
pub use random::{
    conditionally_independent, events_independent, family_independent, independent,
    variables_independent, AtomicSum, ConditionalExpectation, Counterexample, Independence,
    IndependenceReport, Integrand, Integrator, MeasurabilityWitness, Observable, RandomVariable,
};
pub use process::{
    is_stopping_time, AdaptedProcess, Filtration, Martingale, MartingaleKind, StopIndex,
    StoppingTime,
};
