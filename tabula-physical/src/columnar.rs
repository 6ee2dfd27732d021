//! This module collects the typed column storage used by tables.

pub mod column;
pub mod vector;

pub use column::{Column, ColumnData, NativeType};
pub use vector::ColumnVector;
