//! This module implements the matching step of the rolling join.
//!
//! A left key `k` spans a window around itself; every right key inside
//! that window matches. Which bounds belong to the window is decided by
//! [ClosedInterval].

use std::fmt::Display;

use crate::datatypes::Coordinate;

/// Where the window of a left key lies relative to the key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowDirection {
    /// `[k - size, k]`
    #[default]
    Backward,
    /// `[k, k + size]`
    Forward,
    /// `[k - size, k + size]`
    Both,
}

/// Which bounds of a window are part of it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClosedInterval {
    /// Only the lower bound
    Left,
    /// Only the upper bound
    #[default]
    Right,
    /// Both bounds
    Both,
    /// Neither bound
    Neither,
}

impl ClosedInterval {
    fn includes_lower(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    fn includes_upper(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

impl Display for ClosedInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClosedInterval::Left => write!(f, "left"),
            ClosedInterval::Right => write!(f, "right"),
            ClosedInterval::Both => write!(f, "both"),
            ClosedInterval::Neither => write!(f, "neither"),
        }
    }
}

/// Finds the right keys inside the window of a left key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMatcher {
    size: f64,
    direction: WindowDirection,
    closed: ClosedInterval,
    center: bool,
    min_periods: usize,
}

impl WindowMatcher {
    /// Create a new [WindowMatcher] for windows of the given `size`.
    ///
    /// `size` is expected to be positive.
    pub fn new(size: f64, direction: WindowDirection, closed: ClosedInterval) -> Self {
        Self {
            size,
            direction,
            closed,
            center: false,
            min_periods: 0,
        }
    }

    /// Center the window on the key, i.e. `[k - size / 2, k + size / 2]`.
    ///
    /// This overrides the [WindowDirection].
    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Windows with fewer matches than `min_periods` match nothing.
    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Lower and upper bound of the window around `key`.
    pub fn bounds(&self, key: Coordinate) -> (f64, f64) {
        let key = key.value();

        if self.center {
            let half = self.size / 2.0;
            return (key - half, key + half);
        }

        match self.direction {
            WindowDirection::Backward => (key - self.size, key),
            WindowDirection::Forward => (key, key + self.size),
            WindowDirection::Both => (key - self.size, key + self.size),
        }
    }

    /// Returns the candidates inside the window around `key`.
    ///
    /// `candidates` are pairs of row and key, sorted by key.
    pub fn find<'a>(
        &self,
        candidates: &'a [(usize, Coordinate)],
        key: Coordinate,
    ) -> &'a [(usize, Coordinate)] {
        #[cfg(feature = "check_column_sorting")]
        debug_assert!(candidates.windows(2).all(|pair| pair[0].1 <= pair[1].1));

        let (lower, upper) = self.bounds(key);

        let start = if self.closed.includes_lower() {
            candidates.partition_point(|&(_, candidate)| candidate.value() < lower)
        } else {
            candidates.partition_point(|&(_, candidate)| candidate.value() <= lower)
        };
        let end = if self.closed.includes_upper() {
            candidates.partition_point(|&(_, candidate)| candidate.value() <= upper)
        } else {
            candidates.partition_point(|&(_, candidate)| candidate.value() < upper)
        };

        let window = &candidates[start..end.max(start)];
        if window.len() < self.min_periods {
            return &[];
        }

        window
    }
}
