// Copyright 2025 Cowboy AI, LLC.

//! Error types for measure-theoretic operations

use thiserror::Error;

/// Errors that can occur when constructing or querying probabilistic objects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// A set or function fails the measurability precondition
    #[error("Not measurable: {subject} - {reason}")]
    NotMeasurable {
        /// What was checked (a set, a random variable, a generator)
        subject: String,
        /// Why the check failed
        reason: String,
    },

    /// A measure fails the probability normalization invariant
    #[error("Measure does not total to one: total mass is {total}")]
    NotTotalToOne {
        /// Total mass that was observed
        total: String,
    },

    /// A conditioning or indexed algebra is not contained in the ambient one
    #[error("Invalid sub-algebra: {0}")]
    InvalidSubalgebra(String),

    /// An expectation or integral does not converge absolutely
    #[error("Not integrable: {0}")]
    NotIntegrable(String),

    /// Monotonicity of a filtration is broken between two indices
    #[error("Filtration violation: algebra at {from} is not contained in algebra at {to}")]
    FiltrationViolation {
        /// Earlier index
        from: String,
        /// Later index that loses information
        to: String,
    },

    /// The event `{tau <= index}` is not measurable at `index`
    #[error("Stopping time violation at index {index}: {reason}")]
    StoppingTimeViolation {
        /// Index at which the check failed
        index: String,
        /// Description of the offending event
        reason: String,
    },

    /// A supplied assignment is not additive, monotone or zero on the empty set
    #[error("Not additive: {0}")]
    NotAdditive(String),

    /// A probability query produced a value outside `[0, 1]`
    #[error("Probability out of range: {0}")]
    ProbabilityOutOfRange(String),

    /// A process fails the martingale condition between two indices
    #[error("Not a martingale: E[X_{to} | F_{from}] differs from X_{from} ({reason})")]
    NotAMartingale {
        /// Conditioning index
        from: String,
        /// Later index
        to: String,
        /// Description of the mismatch
        reason: String,
    },

    /// Validation configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for measure-theoretic operations
pub type MeasureResult<T> = Result<T, MeasureError>;

impl From<serde_json::Error> for MeasureError {
    fn from(err: serde_json::Error) -> Self {
        MeasureError::InvalidConfig(err.to_string())
    }
}

impl MeasureError {
    /// Create a measurability error
    pub fn not_measurable(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        MeasureError::NotMeasurable {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a measurability error
    pub fn is_measurability_error(&self) -> bool {
        matches!(self, MeasureError::NotMeasurable { .. })
    }

    /// Check if this error can only be raised while constructing an object
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            MeasureError::NotTotalToOne { .. }
                | MeasureError::FiltrationViolation { .. }
                | MeasureError::StoppingTimeViolation { .. }
                | MeasureError::NotAdditive(_)
                | MeasureError::NotAMartingale { .. }
                | MeasureError::InvalidConfig(_)
        )
    }
}
