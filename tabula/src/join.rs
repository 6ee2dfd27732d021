//! This module contains the join operations on [Table]s.
//!
//! | entry point | predicate |
//! |---|---|
//! | [Table::join], [Table::join_on], [Table::join_with_config] | equality of key columns |
//! | [Table::join_where], [Table::join_where_with_options] | comparisons between columns |
//! | [Table::join_asof] | nearest key, optionally within equal groups |
//! | [Table::join_rolling] | every key within a window, optionally within equal groups |

pub mod asof;
pub mod config;
mod equi;
mod evaluate;
mod groups;
pub mod inequality;
mod result;
pub mod rolling;

use std::fmt::Display;

pub use asof::AsofOptions;
pub use config::{JoinConfig, JoinType, JoinWhereOptions};
pub use inequality::{InequalityStrategy, JoinWhereOutput};
pub use rolling::RollingOptions;

use tabula_physical::columnar::Column;

use crate::{error::Error, expression::Expr, table::Table};

/// One of the two inputs of a join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinSide {
    /// The table the join is called on
    Left,
    /// The table passed as argument
    Right,
}

impl Display for JoinSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinSide::Left => write!(f, "left"),
            JoinSide::Right => write!(f, "right"),
        }
    }
}

/// Look up the columns with the given names.
fn resolve_columns<'a, S: AsRef<str>>(
    table: &'a Table,
    names: &[S],
    side: JoinSide,
) -> Result<Vec<&'a Column>, Error> {
    names
        .iter()
        .map(|name| {
            table
                .column(name.as_ref())
                .ok_or_else(|| Error::ColumnNotFound {
                    side,
                    name: name.as_ref().to_owned(),
                })
        })
        .collect()
}

impl Table {
    /// Join with `other` on equality of the column `on`, which must exist in both tables.
    pub fn join(&self, other: &Table, on: &str, how: JoinType) -> Result<Table, Error> {
        self.join_with_config(other, &JoinConfig::new(how).on([on]))
    }

    /// Join with `other` on equality of `left_on[i]` in this table and `right_on[i]` in `other`.
    pub fn join_on<S: AsRef<str>>(
        &self,
        other: &Table,
        left_on: &[S],
        right_on: &[S],
        how: JoinType,
    ) -> Result<Table, Error> {
        let config = JoinConfig::new(how)
            .left_on(left_on.iter().map(|key| key.as_ref().to_owned()))
            .right_on(right_on.iter().map(|key| key.as_ref().to_owned()));

        self.join_with_config(other, &config)
    }

    /// Join with `other` as described by `config`.
    ///
    /// # Errors
    /// Fails if key columns are missing, their numbers differ,
    /// or a pair of key columns cannot be compared for equality.
    pub fn join_with_config(&self, other: &Table, config: &JoinConfig) -> Result<Table, Error> {
        equi::equi_join(self, other, config)
    }

    /// Join with `other` on a conjunction of comparisons.
    ///
    /// Without predicates, this is the cross join.
    pub fn join_where<I>(&self, other: &Table, predicates: I) -> Result<Table, Error>
    where
        I: IntoIterator<Item = Expr>,
    {
        self.join_where_with_options(other, predicates, &JoinWhereOptions::default())
            .map(|output| output.table)
    }

    /// Like [Table::join_where], but reports the algorithm that was used.
    pub fn join_where_with_options<I>(
        &self,
        other: &Table,
        predicates: I,
        options: &JoinWhereOptions,
    ) -> Result<JoinWhereOutput, Error>
    where
        I: IntoIterator<Item = Expr>,
    {
        inequality::inequality_join(self, other, predicates, options)
    }

    /// Match every row with the row of `other` whose key is nearest, see [AsofOptions].
    pub fn join_asof(&self, other: &Table, options: &AsofOptions) -> Result<Table, Error> {
        asof::asof_join(self, other, options)
    }

    /// Match every row with all rows of `other` whose key lies in a window around its key,
    /// see [RollingOptions].
    pub fn join_rolling(&self, other: &Table, options: &RollingOptions) -> Result<Table, Error> {
        rolling::rolling_join(self, other, options)
    }
}
