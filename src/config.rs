// Copyright 2025 Cowboy AI, LLC.

//! Validation policy for runtime-checked constructions
//!
//! Measures built from a caller-supplied assignment function cannot be
//! verified for free: additivity has to be checked against pairs of
//! measurable sets. This module configures how much of that work is done
//! and which numeric tolerance applies to floating comparisons.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{MeasureError, MeasureResult};
use crate::measurable::MAX_ENUMERABLE_ATOMS;

/// How a supplied assignment function is checked at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ValidationStrategy {
    /// Check every pair of disjoint measurable sets.
    ///
    /// Falls back to `Sampled` with the default sample size when the
    /// algebra has more than `max_exhaustive_atoms` atoms, which may not
    /// exceed `MAX_ENUMERABLE_ATOMS`.
    Exhaustive,
    /// Check a deterministic pseudo-random sample of measurable set pairs.
    Sampled {
        /// Number of disjoint pairs to check
        samples: u32,
        /// Seed for the sampler
        seed: u64,
    },
    /// Trust the assignment; only atom masses are read.
    Trusted,
}

impl ValidationStrategy {
    /// Default sample size for `Sampled`
    pub const DEFAULT_SAMPLES: u32 = 256;
    /// Default sampler seed
    pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

    /// Sampled validation with default parameters
    pub fn sampled() -> Self {
        ValidationStrategy::Sampled {
            samples: Self::DEFAULT_SAMPLES,
            seed: Self::DEFAULT_SEED,
        }
    }
}

impl Default for ValidationStrategy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::sampled()
        } else {
            ValidationStrategy::Trusted
        }
    }
}

/// Validation configuration shared by smart constructors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ValidationConfig {
    /// Absolute tolerance for floating comparisons (normalization, independence)
    pub tolerance: f64,
    /// How assignment functions are validated
    pub strategy: ValidationStrategy,
    /// Largest atom count for which exhaustive validation is attempted
    pub max_exhaustive_atoms: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            strategy: ValidationStrategy::default(),
            max_exhaustive_atoms: 12,
        }
    }
}

impl ValidationConfig {
    /// Configuration that checks every pair of sets
    pub fn exhaustive() -> Self {
        Self {
            strategy: ValidationStrategy::Exhaustive,
            ..Self::default()
        }
    }

    /// Configuration that trusts supplied assignments
    pub fn trusted() -> Self {
        Self {
            strategy: ValidationStrategy::Trusted,
            ..Self::default()
        }
    }

    /// Replace the tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject unusable settings
    pub fn validate(&self) -> MeasureResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MeasureError::InvalidConfig(format!(
                "tolerance must be a finite nonnegative number, got {}",
                self.tolerance
            )));
        }
        if let ValidationStrategy::Sampled { samples: 0, .. } = self.strategy {
            return Err(MeasureError::InvalidConfig(
                "sampled validation needs at least one sample".to_string(),
            ));
        }
        if self.max_exhaustive_atoms > MAX_ENUMERABLE_ATOMS {
            return Err(MeasureError::InvalidConfig(format!(
                "max_exhaustive_atoms must be at most {MAX_ENUMERABLE_ATOMS}, got {}",
                self.max_exhaustive_atoms
            )));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> MeasureResult<Self> {
        let config: ValidationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
