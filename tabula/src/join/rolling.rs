//! This module implements the rolling join.
//!
//! Every left row is matched with all right rows whose key lies in a window
//! around the left key, optionally restricted to right rows that agree on a
//! set of `by` columns. A left row produces one output row per match, or a
//! single row padded with nulls if its window holds fewer than
//! `min_periods` matches.

use tabula_physical::{
    join::{asof::sorted_candidates, ClosedInterval, JoinIndices, WindowDirection, WindowMatcher},
    util::Interrupt,
};

use crate::{error::Error, table::Table};

use super::{
    config::DEFAULT_SUFFIX, groups::Groups, resolve_columns, result::ResultBuilder, JoinSide,
};

/// Options of [Table::join_rolling]
#[derive(Debug, Clone)]
pub struct RollingOptions {
    /// Numeric key column of the left table
    pub left_on: String,
    /// Numeric key column of the right table
    pub right_on: String,
    /// Left columns that have to be equal to `right_by`
    pub left_by: Vec<String>,
    /// Right columns that have to be equal to `left_by`
    pub right_by: Vec<String>,
    /// Width of the window; must be positive
    pub window_size: f64,
    /// Minimal number of matches in a window
    pub min_periods: usize,
    /// Center the window on the left key, ignoring `direction`
    pub center: bool,
    /// Where the window lies relative to the left key
    pub direction: WindowDirection,
    /// Which bounds belong to the window
    pub closed: ClosedInterval,
    /// Appended to right column names that already exist in the output
    pub suffix: String,
    /// Allows cancelling the join from another thread
    pub interrupt: Interrupt,
}

impl RollingOptions {
    /// Create [RollingOptions] matching on the column `on` in both tables.
    pub fn new(on: impl Into<String>, window_size: f64) -> Self {
        let on = on.into();

        Self {
            left_on: on.clone(),
            right_on: on,
            left_by: Vec::new(),
            right_by: Vec::new(),
            window_size,
            min_periods: 0,
            center: false,
            direction: WindowDirection::default(),
            closed: ClosedInterval::default(),
            suffix: DEFAULT_SUFFIX.to_owned(),
            interrupt: Interrupt::default(),
        }
    }

    /// Use different key columns in the two tables.
    pub fn on_columns(mut self, left_on: impl Into<String>, right_on: impl Into<String>) -> Self {
        self.left_on = left_on.into();
        self.right_on = right_on.into();
        self
    }

    /// Only match rows that agree on the given columns, which must exist in both tables.
    pub fn by<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect::<Vec<_>>();

        Self {
            left_by: columns.clone(),
            right_by: columns,
            ..self
        }
    }

    /// Only match rows where `left_by[i]` equals `right_by[i]`.
    pub fn by_columns<I, J, S, T>(mut self, left_by: I, right_by: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.left_by = left_by.into_iter().map(Into::into).collect();
        self.right_by = right_by.into_iter().map(Into::into).collect();
        self
    }

    /// Require at least `min_periods` matches per window.
    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Set whether the window is centered on the left key.
    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Set the [WindowDirection].
    pub fn direction(mut self, direction: WindowDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the [ClosedInterval].
    pub fn closed(mut self, closed: ClosedInterval) -> Self {
        self.closed = closed;
        self
    }

    /// Set the suffix for colliding column names; `""` selects [DEFAULT_SUFFIX].
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Observe the given [Interrupt].
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }
}

pub(super) fn rolling_join(
    left: &Table,
    right: &Table,
    options: &RollingOptions,
) -> Result<Table, Error> {
    if options.window_size.is_nan() || options.window_size <= 0.0 {
        return Err(Error::InvalidWindowSize(options.window_size));
    }

    let left_on = resolve_columns(left, &[&options.left_on], JoinSide::Left)?[0];
    let right_on = resolve_columns(right, &[&options.right_on], JoinSide::Right)?[0];
    let groups = Groups::resolve(left, right, &options.left_by, &options.right_by)?;

    let left_keys = left_on.coordinates()?;
    sorted_candidates(left_on.name(), &left_keys)?;
    let right_candidates = sorted_candidates(right_on.name(), &right_on.coordinates()?)?;

    log::debug!(
        "rolling join ({:?}, closed {}, size {}) of {} x {} rows on {} = {}",
        options.direction,
        options.closed,
        options.window_size,
        left.height(),
        right.height(),
        left_on.name(),
        right_on.name()
    );

    let matcher = WindowMatcher::new(options.window_size, options.direction, options.closed)
        .center(options.center)
        .min_periods(options.min_periods);
    let mut candidates = groups.partition(&right_candidates);

    let mut indices = JoinIndices::with_capacity(left.height());
    for (row, key) in left_keys.iter().enumerate() {
        options.interrupt.check()?;

        let window = match key {
            Some(key) => matcher.find(candidates.of_left_row(row), *key),
            None => &[][..],
        };

        if window.is_empty() {
            indices.push(Some(row), None);
        }
        for &(matched, _) in window {
            indices.push(Some(row), Some(matched));
        }
    }

    let shared_on = (left_on.name() == right_on.name()).then_some(right_on.name());

    ResultBuilder::new(left, right, &options.suffix)
        .skip_right(shared_on.into_iter().chain(groups.shared_names()))
        .build(&indices)
}
