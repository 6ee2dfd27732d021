//! This crate defines low-level data structures and operations, i.e.,
//! it corresponds to the physical layer of the table library.
//! Columns are stored as typed, nullable vectors and all join
//! algorithms in here work on row indices rather than on tables.

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
    variant_size_differences,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

pub mod columnar;
pub mod datatypes;
pub mod error;
pub mod join;
pub mod util;
