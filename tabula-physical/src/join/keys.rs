//! This module defines [KeyEncoder], which turns composite join keys into byte strings.
//!
//! Every field is written as a one byte type tag, a little-endian `u64` length
//! and the payload. Since the length of every field is explicit, two distinct
//! tuples can never produce the same encoding.
//!
//! Numeric values are canonicalized before encoding so that keys compare
//! equal across column widths: every integral value, whether it is stored as
//! [i32], [i64] or [f64], is written as an [i64]. Remaining floats are written
//! with their bit pattern, where `-0.0` was already mapped to the integer `0`
//! and every NaN is mapped to one canonical NaN.

use crate::{
    columnar::{Column, ColumnData, ColumnVector},
    datatypes::value::exact_i64,
};

const TAG_INTEGER: u8 = 1;
const TAG_FLOAT: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_BOOLEAN: u8 = 4;

/// Typed access to one key column, selected once per join
#[derive(Debug, Clone, Copy)]
enum KeyColumn<'a> {
    Int32(&'a ColumnVector<i32>),
    Int64(&'a ColumnVector<i64>),
    Float64(&'a ColumnVector<f64>),
    Utf8(&'a ColumnVector<String>),
    Boolean(&'a ColumnVector<bool>),
}

impl<'a> KeyColumn<'a> {
    fn new(column: &'a Column) -> Self {
        match column.data() {
            ColumnData::Int32(vector) => KeyColumn::Int32(vector),
            ColumnData::Int64(vector) => KeyColumn::Int64(vector),
            ColumnData::Float64(vector) => KeyColumn::Float64(vector),
            ColumnData::Utf8(vector) => KeyColumn::Utf8(vector),
            ColumnData::Boolean(vector) => KeyColumn::Boolean(vector),
        }
    }

    fn len(&self) -> usize {
        match self {
            KeyColumn::Int32(vector) => vector.len(),
            KeyColumn::Int64(vector) => vector.len(),
            KeyColumn::Float64(vector) => vector.len(),
            KeyColumn::Utf8(vector) => vector.len(),
            KeyColumn::Boolean(vector) => vector.len(),
        }
    }

    /// Append the encoding of the value at `row` to `buffer`.
    /// Returns `false` and leaves `buffer` in an unspecified state if the value is null.
    fn encode(&self, row: usize, buffer: &mut Vec<u8>) -> bool {
        match self {
            KeyColumn::Int32(vector) => vector
                .get(row)
                .map(|value| write_integer(i64::from(*value), buffer))
                .is_some(),
            KeyColumn::Int64(vector) => vector
                .get(row)
                .map(|value| write_integer(*value, buffer))
                .is_some(),
            KeyColumn::Float64(vector) => vector
                .get(row)
                .map(|value| write_float(*value, buffer))
                .is_some(),
            KeyColumn::Utf8(vector) => vector
                .get(row)
                .map(|value| write_field(TAG_STRING, value.as_bytes(), buffer))
                .is_some(),
            KeyColumn::Boolean(vector) => vector
                .get(row)
                .map(|value| write_field(TAG_BOOLEAN, &[u8::from(*value)], buffer))
                .is_some(),
        }
    }
}

fn write_field(tag: u8, payload: &[u8], buffer: &mut Vec<u8>) {
    buffer.push(tag);
    buffer.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buffer.extend_from_slice(payload);
}

fn write_integer(value: i64, buffer: &mut Vec<u8>) {
    write_field(TAG_INTEGER, &value.to_le_bytes(), buffer);
}

fn write_float(value: f64, buffer: &mut Vec<u8>) {
    if let Some(integer) = exact_i64(value) {
        write_integer(integer, buffer);
    } else if value.is_nan() {
        write_field(TAG_FLOAT, &f64::NAN.to_bits().to_le_bytes(), buffer);
    } else {
        write_field(TAG_FLOAT, &value.to_bits().to_le_bytes(), buffer);
    }
}

/// Encodes the values of several key columns at one row into a single byte string.
#[derive(Debug, Clone)]
pub struct KeyEncoder<'a> {
    columns: Vec<KeyColumn<'a>>,
    height: usize,
}

impl<'a> KeyEncoder<'a> {
    /// Create a new [KeyEncoder] for the given key columns.
    ///
    /// All columns are expected to have the same length.
    pub fn new(columns: &[&'a Column]) -> Self {
        let columns = columns
            .iter()
            .map(|column| KeyColumn::new(column))
            .collect::<Vec<_>>();
        let height = columns.first().map_or(0, KeyColumn::len);
        debug_assert!(columns.iter().all(|column| column.len() == height));

        Self { columns, height }
    }

    /// Number of rows that can be encoded.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of key columns.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Write the key of `row` into `buffer`, replacing its previous content.
    ///
    /// Returns `false` if any component of the key is null.
    /// Such keys never match any other key, including themselves.
    pub fn encode(&self, row: usize, buffer: &mut Vec<u8>) -> bool {
        buffer.clear();
        self.columns.iter().all(|column| column.encode(row, buffer))
    }
}
