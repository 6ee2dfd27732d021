//! This module defines [CoordinateSet], the numeric projection of inequality join columns.

use crate::{columnar::Column, datatypes::Coordinate, error::Error};

/// How rows with a null or NaN value in an inequality join column are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullPolicy {
    /// Fail with [Error::NullInJoinKey]
    #[default]
    Reject,
    /// Drop the row; it never matches anything
    Skip,
}

/// Projection of one table onto one or more numeric axes.
///
/// Only rows without null values survive the projection.
/// `rows` maps every projected position back to its row in the original table,
/// and `axes[a][i]` is the coordinate of `rows[i]` on axis `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSet {
    rows: Vec<usize>,
    axes: Vec<Vec<Coordinate>>,
}

impl CoordinateSet {
    /// Project the given columns, one axis per column.
    ///
    /// # Errors
    /// Returns [Error::NonNumericColumn] if a column is not numeric,
    /// and [Error::NullInJoinKey] if a null is found under [NullPolicy::Reject].
    pub fn project(columns: &[&Column], policy: NullPolicy) -> Result<Self, Error> {
        let projected = columns
            .iter()
            .map(|column| column.coordinates())
            .collect::<Result<Vec<_>, _>>()?;
        let height = columns.first().map_or(0, |column| column.len());

        let mut rows = Vec::with_capacity(height);
        let mut axes = vec![Vec::with_capacity(height); columns.len()];

        'rows: for row in 0..height {
            for (column, coordinates) in columns.iter().zip(&projected) {
                if coordinates[row].is_none() {
                    match policy {
                        NullPolicy::Reject => {
                            return Err(Error::NullInJoinKey {
                                column: column.name().to_owned(),
                                row,
                            })
                        }
                        NullPolicy::Skip => continue 'rows,
                    }
                }
            }

            rows.push(row);
            for (axis, coordinates) in axes.iter_mut().zip(&projected) {
                if let Some(coordinate) = coordinates[row] {
                    axis.push(coordinate);
                }
            }
        }

        log::trace!(
            "projected {} of {height} rows onto {} axes",
            rows.len(),
            columns.len()
        );

        Ok(Self { rows, axes })
    }

    /// Number of projected rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no row survived the projection.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Original row of the projected position `index`.
    pub fn row(&self, index: usize) -> usize {
        self.rows[index]
    }

    /// Coordinates along the given axis.
    pub fn axis(&self, axis: usize) -> &[Coordinate] {
        &self.axes[axis]
    }
}
