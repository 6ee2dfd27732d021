//! Error-handling module for the crate

use thiserror::Error;

use tabula_physical::datatypes::DataType;

use crate::join::{JoinSide, JoinType};

/// Error-Collection for all the possible Errors occurring in this crate
#[allow(variant_size_differences)]
#[derive(Error, Debug)]
pub enum Error {
    /// A column name does not exist in one of the join inputs
    #[error("Column `{name}` does not exist in the {side} table")]
    ColumnNotFound {
        /// Table that was searched
        side: JoinSide,
        /// The missing name
        name: String,
    },
    /// A predicate refers to a column that exists in neither input
    #[error("Column `{0}` exists in neither the left nor the right table")]
    UnknownColumn(String),
    /// Left and right key lists differ in length
    #[error("Cannot join {left} left key columns with {right} right key columns")]
    KeyCountMismatch {
        /// Number of left keys
        left: usize,
        /// Number of right keys
        right: usize,
    },
    /// A pair of key columns cannot be compared for equality
    #[error("Key column `{left}` ({left_type}) cannot be joined with `{right}` ({right_type})")]
    IncompatibleKeyTypes {
        /// Left key column
        left: String,
        /// Type of the left key column
        left_type: DataType,
        /// Right key column
        right: String,
        /// Type of the right key column
        right_type: DataType,
    },
    /// A join type that needs keys was called without any
    #[error("A {0} join needs at least one key column")]
    MissingJoinKeys(JoinType),
    /// A join type name could not be parsed
    #[error("Unknown join type `{0}`; expected one of inner, left, right, outer, semi, anti, cross")]
    UnknownJoinType(String),
    /// Two columns of one table share a name
    #[error("Column name `{0}` appears more than once")]
    DuplicateColumn(String),
    /// Columns of one table differ in length
    #[error("Column `{column}` has {found} rows, expected {expected}")]
    HeightMismatch {
        /// The offending column
        column: String,
        /// Height of the table
        expected: usize,
        /// Length of the column
        found: usize,
    },
    /// A join predicate does not have the shape `operand op operand`
    #[error("Unsupported join predicate `{0}`; expected a comparison between columns or literals")]
    UnsupportedPredicate(String),
    /// The two sides of a predicate cannot be compared
    #[error("Cannot compare {left} with {right} in predicate `{predicate}`")]
    IncomparableOperands {
        /// The predicate
        predicate: String,
        /// Type of its left operand
        left: DataType,
        /// Type of its right operand
        right: DataType,
    },
    /// Asof tolerance is negative or NaN
    #[error("Asof tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),
    /// Rolling window size is not positive
    #[error("Window size must be positive, got {0}")]
    InvalidWindowSize(f64),
    /// Error in the physical layer
    #[error(transparent)]
    PhysicalError(#[from] tabula_physical::error::Error),
}
