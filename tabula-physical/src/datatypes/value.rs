use std::{cmp::Ordering, fmt::Display};

use super::DataType;

/// Enum for single values of all supported column types, including null.
///
/// This should not be used to represent large numbers of values,
/// due to the overhead for each value, but it is a convenient option
/// for literals and for reading individual cells.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// A value of type [`DataType::Int32`]
    Int32(i32),
    /// A value of type [`DataType::Int64`]
    Int64(i64),
    /// A value of type [`DataType::Float64`]
    Float64(f64),
    /// A value of type [`DataType::Utf8`]
    Utf8(String),
    /// A value of type [`DataType::Boolean`]
    Boolean(bool),
}

impl Value {
    /// Returns the [`DataType`] of this value or `None` if it is null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Utf8(_) => Some(DataType::Utf8),
            Value::Boolean(_) => Some(DataType::Boolean),
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as [`i64`] if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(value) => Some(i64::from(*value)),
            Value::Int64(value) => Some(*value),
            _ => None,
        }
    }

    /// Compares two values.
    ///
    /// Numeric values are compared exactly across widths, strings lexicographically
    /// and booleans with `false < true`. Returns `None` if either value is null,
    /// if the types cannot be compared, or if a NaN is involved.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Utf8(left), Value::Utf8(right)) => Some(left.cmp(right)),
            (Value::Boolean(left), Value::Boolean(right)) => Some(left.cmp(right)),
            (Value::Float64(left), Value::Float64(right)) => left.partial_cmp(right),
            (Value::Float64(left), _) => {
                compare_integer_float(other.as_i64()?, *left).map(Ordering::reverse)
            }
            (_, Value::Float64(right)) => compare_integer_float(self.as_i64()?, *right),
            _ => Some(self.as_i64()?.cmp(&other.as_i64()?)),
        }
    }
}

/// Smallest [f64] that is too large to be represented as [i64]
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Returns the [i64] equal to `value`, if there is one.
pub(crate) fn exact_i64(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && (-I64_UPPER_BOUND..I64_UPPER_BOUND).contains(&value) {
        #[allow(clippy::cast_possible_truncation)]
        let integer = value as i64;
        Some(integer)
    } else {
        None
    }
}

/// Compares an integer with a float without rounding the integer.
fn compare_integer_float(integer: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= I64_UPPER_BOUND {
        return Some(Ordering::Less);
    }
    if float < -I64_UPPER_BOUND {
        return Some(Ordering::Greater);
    }

    let floor = float.floor();
    #[allow(clippy::cast_possible_truncation)]
    let floor_integer = floor as i64;

    Some(match integer.cmp(&floor_integer) {
        Ordering::Equal if floor < float => Ordering::Less,
        ordering => ordering,
    })
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int32(value) => write!(f, "{value}"),
            Value::Int64(value) => write!(f, "{value}"),
            Value::Float64(value) => write!(f, "{value}"),
            Value::Utf8(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Utf8(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Utf8(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
