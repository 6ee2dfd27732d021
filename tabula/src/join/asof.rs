//! This module implements the asof join.
//!
//! Every left row is matched with at most one right row: the one whose key
//! is nearest in the configured [AsofDirection], optionally restricted to
//! right rows that agree on a set of `by` columns. Both key columns must be
//! sorted in ascending order; nulls are ignored for this purpose.

use tabula_physical::join::{asof::sorted_candidates, AsofDirection, AsofMatcher, JoinIndices};

use crate::{error::Error, table::Table};

use super::{
    config::DEFAULT_SUFFIX, groups::Groups, resolve_columns, result::ResultBuilder, JoinSide,
};

/// Options of [Table::join_asof]
#[derive(Debug, Clone)]
pub struct AsofOptions {
    /// Numeric key column of the left table
    pub left_on: String,
    /// Numeric key column of the right table
    pub right_on: String,
    /// Left columns that have to be equal to `right_by`
    pub left_by: Vec<String>,
    /// Right columns that have to be equal to `left_by`
    pub right_by: Vec<String>,
    /// Which right key is matched
    pub direction: AsofDirection,
    /// Maximal distance between matched keys
    pub tolerance: Option<f64>,
    /// Whether keys may match if they are equal
    pub allow_exact_matches: bool,
    /// Appended to right column names that already exist in the output
    pub suffix: String,
}

impl AsofOptions {
    /// Create [AsofOptions] matching on the column `on` in both tables.
    pub fn new(on: impl Into<String>) -> Self {
        let on = on.into();

        Self {
            left_on: on.clone(),
            right_on: on,
            left_by: Vec::new(),
            right_by: Vec::new(),
            direction: AsofDirection::default(),
            tolerance: None,
            allow_exact_matches: true,
            suffix: DEFAULT_SUFFIX.to_owned(),
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

    /// Set the [AsofDirection].
    pub fn direction(mut self, direction: AsofDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Discard matches whose keys are farther apart than `tolerance`.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Set whether equal keys may match.
    pub fn allow_exact_matches(mut self, allow: bool) -> Self {
        self.allow_exact_matches = allow;
        self
    }

    /// Set the suffix for colliding column names.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

pub(super) fn asof_join(
    left: &Table,
    right: &Table,
    options: &AsofOptions,
) -> Result<Table, Error> {
    if let Some(tolerance) = options.tolerance {
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(Error::InvalidTolerance(tolerance));
        }
    }

    let left_on = resolve_columns(left, &[&options.left_on], JoinSide::Left)?[0];
    let right_on = resolve_columns(right, &[&options.right_on], JoinSide::Right)?[0];
    let groups = Groups::resolve(left, right, &options.left_by, &options.right_by)?;

    let left_keys = left_on.coordinates()?;
    sorted_candidates(left_on.name(), &left_keys)?;
    let right_candidates = sorted_candidates(right_on.name(), &right_on.coordinates()?)?;

    log::debug!(
        "asof join ({:?}) of {} x {} rows on {} = {}",
        options.direction,
        left.height(),
        right.height(),
        left_on.name(),
        right_on.name()
    );

    let matcher = AsofMatcher::new(
        options.direction,
        options.tolerance,
        options.allow_exact_matches,
    );
    let mut candidates = groups.partition(&right_candidates);

    let mut indices = JoinIndices::with_capacity(left.height());
    for (row, key) in left_keys.iter().enumerate() {
        let matched = key.and_then(|key| matcher.find(candidates.of_left_row(row), key));
        indices.push(Some(row), matched);
    }

    let shared_on = (left_on.name() == right_on.name()).then_some(right_on.name());

    ResultBuilder::new(left, right, &options.suffix)
        .skip_right(shared_on.into_iter().chain(groups.shared_names()))
        .build(&indices)
}
