//! Measurable spaces
//!
//! Events, sigma-algebras and the finite topologies that feed the Borel
//! construction. Everything in this module is immutable once built.

pub mod event;
pub mod sigma_algebra;
pub mod topology;

pub use event::Event;
pub use sigma_algebra::{AlgebraKind, SigmaAlgebra, MAX_ENUMERABLE_ATOMS};
pub use topology::Topology;
