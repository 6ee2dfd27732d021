//! This module defines [Column], a named and typed sequence of nullable values.

use std::fmt::Debug;

use crate::{
    datatypes::{Coordinate, DataType, Value},
    error::Error,
};

use super::ColumnVector;

/// Native Rust types that can be stored in a [Column].
pub trait NativeType: Debug + Clone + Default {
    /// The [DataType] of columns holding this type
    const DATA_TYPE: DataType;

    /// Wraps a [ColumnVector] of this type into the matching [ColumnData] variant.
    fn into_column_data(vector: ColumnVector<Self>) -> ColumnData;
}

macro_rules! impl_native_type {
    ($type:ty, $variant:ident) => {
        impl NativeType for $type {
            const DATA_TYPE: DataType = DataType::$variant;

            fn into_column_data(vector: ColumnVector<Self>) -> ColumnData {
                ColumnData::$variant(vector)
            }
        }
    };
}

impl_native_type!(i32, Int32);
impl_native_type!(i64, Int64);
impl_native_type!(f64, Float64);
impl_native_type!(String, Utf8);
impl_native_type!(bool, Boolean);

/// Typed storage of a column, one variant per [DataType].
///
/// Code that needs typed access matches on this enum once
/// and then works on the contained [ColumnVector].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Column of [i32] values
    Int32(ColumnVector<i32>),
    /// Column of [i64] values
    Int64(ColumnVector<i64>),
    /// Column of [f64] values
    Float64(ColumnVector<f64>),
    /// Column of [String] values
    Utf8(ColumnVector<String>),
    /// Column of [bool] values
    Boolean(ColumnVector<bool>),
}

/// Applies `$body` to the [ColumnVector] inside a [ColumnData],
/// optionally re-wrapping the result into the same variant.
macro_rules! dispatch_data {
    ($data:expr, $vector:ident => $body:expr) => {
        match $data {
            ColumnData::Int32($vector) => $body,
            ColumnData::Int64($vector) => $body,
            ColumnData::Float64($vector) => $body,
            ColumnData::Utf8($vector) => $body,
            ColumnData::Boolean($vector) => $body,
        }
    };
    ($data:expr, $vector:ident => $body:expr; rewrap) => {
        match $data {
            ColumnData::Int32($vector) => ColumnData::Int32($body),
            ColumnData::Int64($vector) => ColumnData::Int64($body),
            ColumnData::Float64($vector) => ColumnData::Float64($body),
            ColumnData::Utf8($vector) => ColumnData::Utf8($body),
            ColumnData::Boolean($vector) => ColumnData::Boolean($body),
        }
    };
}

impl ColumnData {
    /// Returns the [DataType] of the stored values.
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnData::Int32(_) => DataType::Int32,
            ColumnData::Int64(_) => DataType::Int64,
            ColumnData::Float64(_) => DataType::Float64,
            ColumnData::Utf8(_) => DataType::Utf8,
            ColumnData::Boolean(_) => DataType::Boolean,
        }
    }

    /// Creates storage of the given type and length that only contains nulls.
    pub fn nulls(data_type: DataType, len: usize) -> Self {
        match data_type {
            DataType::Int32 => ColumnData::Int32(ColumnVector::nulls(len)),
            DataType::Int64 => ColumnData::Int64(ColumnVector::nulls(len)),
            DataType::Float64 => ColumnData::Float64(ColumnVector::nulls(len)),
            DataType::Utf8 => ColumnData::Utf8(ColumnVector::nulls(len)),
            DataType::Boolean => ColumnData::Boolean(ColumnVector::nulls(len)),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        dispatch_data!(self, vector => vector.len())
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the entry at `index` is null.
    pub fn is_null(&self, index: usize) -> bool {
        dispatch_data!(self, vector => vector.is_null(index))
    }

    /// Returns the number of nulls.
    pub fn null_count(&self) -> usize {
        dispatch_data!(self, vector => vector.null_count())
    }

    /// Returns the entry at `index` as a [Value].
    pub fn get(&self, index: usize) -> Value {
        match self {
            ColumnData::Int32(vector) => vector.get(index).map(|v| Value::Int32(*v)),
            ColumnData::Int64(vector) => vector.get(index).map(|v| Value::Int64(*v)),
            ColumnData::Float64(vector) => vector.get(index).map(|v| Value::Float64(*v)),
            ColumnData::Utf8(vector) => vector.get(index).map(|v| Value::Utf8(v.clone())),
            ColumnData::Boolean(vector) => vector.get(index).map(|v| Value::Boolean(*v)),
        }
        .unwrap_or(Value::Null)
    }

    /// Gathers the entries at the given positions.
    pub fn take(&self, indices: &[usize]) -> Result<Self, Error> {
        Ok(dispatch_data!(self, vector => vector.take(indices)?; rewrap))
    }

    /// Gathers the entries at the given positions, producing null for `None`.
    pub fn take_optional(&self, indices: &[Option<usize>]) -> Result<Self, Error> {
        Ok(dispatch_data!(self, vector => vector.take_optional(indices)?; rewrap))
    }
}

/// A named, typed and nullable sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a new [Column] from already typed storage.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a new [Column] in which every value is valid.
    pub fn from_values<T: NativeType>(name: impl Into<String>, values: Vec<T>) -> Self {
        Self::new(name, T::into_column_data(ColumnVector::new(values)))
    }

    /// Create a new [Column] from optional values, where `None` denotes null.
    pub fn from_options<T, I>(name: impl Into<String>, values: I) -> Self
    where
        T: NativeType,
        I: IntoIterator<Item = Option<T>>,
    {
        Self::new(name, T::into_column_data(ColumnVector::from_options(values)))
    }

    /// Create a new [Column] of the given type and length that only contains nulls.
    pub fn nulls(name: impl Into<String>, data_type: DataType, len: usize) -> Self {
        Self::new(name, ColumnData::nulls(data_type, len))
    }

    /// Name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// [DataType] of the column.
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Typed storage of the column.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Number of entries, including nulls.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the column has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns whether the entry at `index` is null.
    pub fn is_null(&self, index: usize) -> bool {
        self.data.is_null(index)
    }

    /// Returns the number of nulls.
    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    /// Returns the entry at `index`, or [Value::Null] if it is null or out of bounds.
    pub fn get(&self, index: usize) -> Value {
        self.data.get(index)
    }

    /// String rendering of the entry at `index`, `None` for nulls.
    pub fn render(&self, index: usize) -> Option<String> {
        let value = self.get(index);
        (!value.is_null()).then(|| value.to_string())
    }

    /// Gathers the entries at the given positions into a new column with the same name.
    ///
    /// # Errors
    /// Returns [Error::IndexOutOfBounds] if any index exceeds the length.
    pub fn take(&self, indices: &[usize]) -> Result<Self, Error> {
        Ok(Self::new(self.name.clone(), self.data.take(indices)?))
    }

    /// Like [Column::take], but `None` positions produce nulls.
    pub fn take_optional(&self, indices: &[Option<usize>]) -> Result<Self, Error> {
        Ok(Self::new(
            self.name.clone(),
            self.data.take_optional(indices)?,
        ))
    }

    /// Returns the column under a different name.
    pub fn rename(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: self.data,
        }
    }

    /// Projects the column onto [Coordinate]s.
    ///
    /// Nulls and NaN values are mapped to `None`.
    ///
    /// # Errors
    /// Returns [Error::NonNumericColumn] if the column is not numeric.
    pub fn coordinates(&self) -> Result<Vec<Option<Coordinate>>, Error> {
        match &self.data {
            ColumnData::Int32(vector) => Ok(vector
                .iter()
                .map(|value| value.map(|v| Coordinate::from(*v)))
                .collect()),
            ColumnData::Int64(vector) => Ok(vector
                .iter()
                .map(|value| {
                    value
                        .and_then(num::ToPrimitive::to_f64)
                        .and_then(|v| Coordinate::new(v).ok())
                })
                .collect()),
            ColumnData::Float64(vector) => Ok(vector
                .iter()
                .map(|value| value.and_then(|v| Coordinate::new(*v).ok()))
                .collect()),
            ColumnData::Utf8(_) | ColumnData::Boolean(_) => Err(Error::NonNumericColumn {
                column: self.name.clone(),
                data_type: self.data_type(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::Column;
    use crate::datatypes::{DataType, Value};

    #[test]
    fn typed_construction() {
        let column = Column::from_options("score", vec![Some(1.5), None]);

        assert_eq!(column.name(), "score");
        assert_eq!(column.data_type(), DataType::Float64);
        assert_eq!(column.get(0), Value::Float64(1.5));
        assert_eq!(column.get(1), Value::Null);
        assert_eq!(column.render(0), Some("1.5".to_owned()));
        assert_eq!(column.render(1), None);
    }

    #[test]
    fn take_optional_keeps_type() {
        let column = Column::from_values("id", vec![10i32, 20, 30]);
        let taken = column.take_optional(&[None, Some(2)]).unwrap();

        assert_eq!(taken.data_type(), DataType::Int32);
        assert_eq!(taken.get(0), Value::Null);
        assert_eq!(taken.get(1), Value::Int32(30));

        let empty = column.take(&[]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.data_type(), DataType::Int32);
    }

    #[test]
    fn coordinates_skip_nan_and_null() {
        let column = Column::from_options("x", vec![Some(1.0), Some(f64::NAN), None]);
        let coordinates = column.coordinates().unwrap();

        assert_eq!(coordinates[0].map(|c| c.value()), Some(1.0));
        assert_eq!(coordinates[1], None);
        assert_eq!(coordinates[2], None);

        let strings = Column::from_values("s", vec!["a".to_owned()]);
        assert!(strings.coordinates().is_err());
    }

    #[test]
    fn rename_keeps_data() {
        let column = Column::from_values("a", vec![true, false]).rename("b");
        assert_eq!(column.name(), "b");
        assert_eq!(column.get(1), Value::Boolean(false));
    }
}
