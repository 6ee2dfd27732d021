//! This module defines the types of values that can be stored in a column.

pub mod coordinate;
pub mod data_type;
pub mod value;

pub use coordinate::Coordinate;
pub use data_type::DataType;
pub use value::Value;
