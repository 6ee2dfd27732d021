//! This module defines a wrapper type [Coordinate] for [f64] that excludes NaN.

use std::{cmp::Ordering, fmt};

use crate::error::Error;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

/// Numeric projection of a join key used by the inequality join algorithms.
///
/// Wraps an [f64] that is guaranteed not to be [f64::NAN],
/// which makes the type totally ordered.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Coordinate(f64);

impl Coordinate {
    /// Wraps the given [f64]-`value` as a [Coordinate].
    ///
    /// # Errors
    /// Returns an error if `value` is [f64::NAN].
    pub fn new(value: f64) -> Result<Self, Error> {
        if value.is_nan() {
            return Err(Error::FloatIsNaN);
        }

        Ok(Self(value))
    }

    /// Returns the wrapped [f64].
    pub fn value(self) -> f64 {
        self.0
    }

    /// Absolute distance between two coordinates.
    pub fn distance(self, other: Self) -> f64 {
        (self.0 - other.0).abs()
    }
}

impl Eq for Coordinate {}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .partial_cmp(&other.0)
            .expect("Comparison can only fail on NaN values which have been forbidden in this type")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<f64> for Coordinate {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<i32> for Coordinate {
    fn from(value: i32) -> Self {
        Self(f64::from(value))
    }
}

#[cfg(test)]
impl Arbitrary for Coordinate {
    fn arbitrary(g: &mut Gen) -> Self {
        // small integral values produce plenty of ties
        let value = i8::arbitrary(g) % 16;
        Self(f64::from(value))
    }
}
