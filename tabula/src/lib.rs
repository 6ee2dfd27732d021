//! An in-memory columnar table library with equality, inequality, asof and rolling joins.
//!
//! Tables are immutable: every join borrows its two inputs and returns a
//! freshly built [Table]. The row level algorithms live in [tabula_physical];
//! this crate resolves column names, validates keys and predicates,
//! selects an algorithm and assembles the output.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

/// The crate for underlying physical operations.
pub extern crate tabula_physical;

pub mod error;
pub mod expression;
pub mod join;
pub mod table;

// Columns and values are part of our API, so re-export them here.
pub use tabula_physical::{
    columnar::Column,
    datatypes::{DataType, Value},
    join::{AsofDirection, ClosedInterval, NullPolicy, WindowDirection},
    util::Interrupt,
};

pub use error::Error;
pub use expression::{col, lit, Expr};
pub use join::{
    AsofOptions, InequalityStrategy, JoinConfig, JoinSide, JoinType, JoinWhereOptions,
    JoinWhereOutput, RollingOptions,
};
pub use table::Table;
