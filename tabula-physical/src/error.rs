//! Error-handling module for the crate

use thiserror::Error;

use crate::datatypes::DataType;

/// Error-Collection for all the possible Errors occurring in this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A row index points past the end of a column
    #[error("Row index {index} is out of bounds for a column of length {len}")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// Length of the column
        len: usize,
    },
    /// Values and validity mask of a column disagree in length
    #[error("Column has {values} values but a validity mask of length {validity}")]
    ValidityLength {
        /// Number of values
        values: usize,
        /// Number of validity bits
        validity: usize,
    },
    /// A column cannot be projected onto a float64 coordinate
    #[error("Column `{column}` of type {data_type} cannot be used as a numeric join key")]
    NonNumericColumn {
        /// Name of the column
        column: String,
        /// Type of the column
        data_type: DataType,
    },
    /// A null or NaN value was found in a column used by an inequality join
    #[error("Column `{column}` contains a null or NaN value at row {row}; inequality join keys must not be null")]
    NullInJoinKey {
        /// Name of the column
        column: String,
        /// First offending row
        row: usize,
    },
    /// Floating point value is NaN
    #[error("The floating point value is NaN, which cannot be ordered")]
    FloatIsNaN,
    /// A column that must be sorted is not
    #[error("Column `{0}` must be sorted in ascending order")]
    UnsortedColumn(String),
    /// Input slices that must be parallel differ in length
    #[error("The provided data-structures do not have the same length: {0:?}")]
    LengthMismatch(Vec<usize>),
    /// The operation was cancelled through an [`Interrupt`][crate::util::interrupt::Interrupt]
    #[error("The join was cancelled")]
    Cancelled,
}
