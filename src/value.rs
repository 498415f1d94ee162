// Copyright 2025 Cowboy AI, LLC.

//! Value domains for measures: extended nonnegative reals and probabilities.
//!
//! Both types enforce their invariants at construction time, so every
//! operation on an existing value can assume it is valid.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use crate::errors::{MeasureError, MeasureResult};

/// A value in `[0, ∞]`.
///
/// # Invariants
///
/// - Never NaN, never negative
/// - `-0.0` is normalized to `0.0`
/// - `f64::INFINITY` is the top element
///
/// Addition saturates at infinity and multiplication follows the measure
/// theory convention `0 · ∞ = 0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ExtendedReal(f64);

impl ExtendedReal {
    /// Zero mass
    pub const ZERO: ExtendedReal = ExtendedReal(0.0);
    /// Unit mass
    pub const ONE: ExtendedReal = ExtendedReal(1.0);
    /// Infinite mass
    pub const INFINITY: ExtendedReal = ExtendedReal(f64::INFINITY);

    /// Validate a raw value.
    pub fn new(value: f64) -> MeasureResult<Self> {
        if value.is_nan() || value < 0.0 {
            return Err(MeasureError::NotAdditive(format!(
                "mass {value} is not in [0, ∞]"
            )));
        }
        Ok(Self(value + 0.0))
    }

    /// Mass of `count` unit points.
    pub fn from_count(count: usize) -> Self {
        Self(count as f64)
    }

    /// Finite value, if any.
    pub fn as_finite(self) -> Option<f64> {
        self.0.is_finite().then_some(self.0)
    }

    /// Raw value; infinity maps to `f64::INFINITY`.
    pub fn to_f64(self) -> f64 {
        self.0
    }

    /// True for the top element.
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    /// True for zero mass.
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Equality up to an absolute tolerance; infinities only equal each other.
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => true,
            (false, false) => (self.0 - other.0).abs() <= tolerance,
            _ => false,
        }
    }

    /// Truncated subtraction, `∞ - x = ∞` for finite `x`.
    ///
    /// Returns `None` for `∞ - ∞`, which has no value in this domain.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => None,
            (true, false) => Some(Self::INFINITY),
            (false, true) => Some(Self::ZERO),
            (false, false) => Some(Self((self.0 - other.0).max(0.0))),
        }
    }
}

impl TryFrom<f64> for ExtendedReal {
    type Error = MeasureError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExtendedReal> for f64 {
    fn from(value: ExtendedReal) -> Self {
        value.0
    }
}

impl PartialEq for ExtendedReal {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ExtendedReal {}

impl PartialOrd for ExtendedReal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtendedReal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for ExtendedReal {
    type Output = ExtendedReal;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul for ExtendedReal {
    type Output = ExtendedReal;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            Self::ZERO
        } else {
            Self(self.0 * rhs.0)
        }
    }
}

impl Sum for ExtendedReal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for ExtendedReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            f.write_str("∞")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A probability in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Certain event
    pub const ONE: Probability = Probability(1.0);
    /// Impossible event
    pub const ZERO: Probability = Probability(0.0);

    /// Validate a raw value.
    pub fn new(value: f64) -> MeasureResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MeasureError::ProbabilityOutOfRange(format!(
                "{value} is not in [0, 1]"
            )));
        }
        Ok(Self(value + 0.0))
    }

    /// Checked conversion of a measure value into a probability.
    ///
    /// Masses within `tolerance` of one, on either side, report exactly one;
    /// anything larger, or an infinite mass, fails.
    pub fn from_mass(mass: ExtendedReal, tolerance: f64) -> MeasureResult<Self> {
        let value = mass.as_finite().ok_or_else(|| {
            MeasureError::ProbabilityOutOfRange("infinite mass under a probability measure".to_string())
        })?;
        if value > 1.0 + tolerance {
            return Err(MeasureError::ProbabilityOutOfRange(format!(
                "mass {value} exceeds one beyond tolerance {tolerance}"
            )));
        }
        if (value - 1.0).abs() <= tolerance {
            return Ok(Self::ONE);
        }
        Self::new(value)
    }

    /// Probability of the complementary event.
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }

    /// Raw value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = MeasureError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

impl From<Probability> for ExtendedReal {
    fn from(value: Probability) -> Self {
        ExtendedReal(value.0)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
