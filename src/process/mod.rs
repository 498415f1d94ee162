//! Filtrations, stopping times and martingales

pub mod filtration;
pub mod martingale;
pub mod stopping_time;

pub use filtration::Filtration;
pub use martingale::{AdaptedProcess, Martingale, MartingaleKind};
pub use stopping_time::{is_stopping_time, StopIndex, StoppingTime};
