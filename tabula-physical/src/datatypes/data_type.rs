use std::fmt::Display;

/// Descriptors to refer to the possible column types at runtime.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum DataType {
    /// Data type [`i32`]
    Int32,
    /// Data type [`i64`]
    Int64,
    /// Data type [`f64`]
    Float64,
    /// Data type [`String`]
    Utf8,
    /// Data type [`bool`]
    Boolean,
}

impl DataType {
    /// Returns whether values of this type can be compared numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int32 | DataType::Int64 | DataType::Float64)
    }

    /// Returns whether columns of type `self` and `other` may be joined on equality.
    ///
    /// Equal types are always compatible, and so are any two numeric types.
    pub fn is_join_compatible(&self, other: &DataType) -> bool {
        self == other || (self.is_numeric() && other.is_numeric())
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Int32 => write!(f, "Int32"),
            DataType::Int64 => write!(f, "Int64"),
            DataType::Float64 => write!(f, "Float64"),
            DataType::Utf8 => write!(f, "Utf8"),
            DataType::Boolean => write!(f, "Boolean"),
        }
    }
}
