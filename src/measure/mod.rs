//! Measures, probability measures and measure spaces
//!
//! [`Measure`] is the general, explicit-parameter form used whenever several
//! measures coexist on one algebra. [`MeasureSpace`] designates a single
//! measure as the volume so that callers can omit it.

pub mod measure;
pub mod probability;
pub mod space;

pub use measure::Measure;
pub use probability::ProbabilityMeasure;
pub use space::MeasureSpace;
