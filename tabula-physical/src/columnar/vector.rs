//! This module defines [ColumnVector].

use std::fmt::Debug;

use bitvec::vec::BitVec;

use crate::error::Error;

/// Nullable column storage backed by a [Vec] and an optional validity mask.
///
/// A cleared bit in the validity mask marks the value at that position as null;
/// the stored value is then a placeholder and must not be read.
/// A missing mask means that every value is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnVector<T> {
    values: Vec<T>,
    validity: Option<BitVec>,
}

impl<T: Debug + Clone + Default> ColumnVector<T> {
    /// Constructs a new [ColumnVector] where all values are valid.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            validity: None,
        }
    }

    /// Constructs a new [ColumnVector] from values and a validity mask.
    ///
    /// # Errors
    /// Returns [Error::ValidityLength] if `values` and `validity` differ in length.
    pub fn with_validity(values: Vec<T>, validity: BitVec) -> Result<Self, Error> {
        if values.len() != validity.len() {
            return Err(Error::ValidityLength {
                values: values.len(),
                validity: validity.len(),
            });
        }

        Ok(Self::normalized(values, validity))
    }

    /// Constructs a new [ColumnVector] from optional values, where `None` denotes null.
    pub fn from_options<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let (validity, values): (BitVec, Vec<T>) = values
            .into_iter()
            .map(|value| match value {
                Some(value) => (true, value),
                None => (false, T::default()),
            })
            .unzip();

        Self::normalized(values, validity)
    }

    /// Constructs a [ColumnVector] of the given length that only contains nulls.
    pub fn nulls(len: usize) -> Self {
        Self {
            values: vec![T::default(); len],
            validity: Some(BitVec::repeat(false, len)),
        }
    }

    fn normalized(values: Vec<T>, validity: BitVec) -> Self {
        let validity = validity.not_all().then_some(validity);
        Self { values, validity }
    }

    /// Returns the number of entries, including nulls.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns whether the entry at `index` is non-null.
    pub fn is_valid(&self, index: usize) -> bool {
        self.validity
            .as_ref()
            .map_or(index < self.values.len(), |validity| {
                validity.get(index).is_some_and(|valid| *valid)
            })
    }

    /// Returns whether the entry at `index` is null.
    pub fn is_null(&self, index: usize) -> bool {
        !self.is_valid(index)
    }

    /// Returns the number of nulls.
    pub fn null_count(&self) -> usize {
        self.validity
            .as_ref()
            .map_or(0, |validity| validity.count_zeros())
    }

    /// Returns the value at `index` or `None` if it is null.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.is_valid(index).then(|| &self.values[index])
    }

    /// Raw values, including the placeholders stored for nulls.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        (0..self.len()).map(|index| self.get(index))
    }

    /// Gathers the entries at the given positions into a new [ColumnVector].
    ///
    /// # Errors
    /// Returns [Error::IndexOutOfBounds] if any index exceeds the length.
    pub fn take(&self, indices: &[usize]) -> Result<Self, Error> {
        self.check_bounds(indices.iter().copied())?;

        let values = indices
            .iter()
            .map(|&index| self.values[index].clone())
            .collect();
        let validity = self
            .validity
            .as_ref()
            .map(|validity| indices.iter().map(|&index| validity[index]).collect::<BitVec>());

        Ok(match validity {
            Some(validity) => Self::normalized(values, validity),
            None => Self::new(values),
        })
    }

    /// Gathers the entries at the given positions into a new [ColumnVector],
    /// where a position of `None` produces a null.
    ///
    /// # Errors
    /// Returns [Error::IndexOutOfBounds] if any index exceeds the length.
    pub fn take_optional(&self, indices: &[Option<usize>]) -> Result<Self, Error> {
        self.check_bounds(indices.iter().flatten().copied())?;

        let (validity, values): (BitVec, Vec<T>) = indices
            .iter()
            .map(|index| match index {
                Some(index) if self.is_valid(*index) => (true, self.values[*index].clone()),
                _ => (false, T::default()),
            })
            .unzip();

        Ok(Self::normalized(values, validity))
    }

    fn check_bounds(&self, mut indices: impl Iterator<Item = usize>) -> Result<(), Error> {
        let len = self.len();
        match indices.find(|&index| index >= len) {
            Some(index) => Err(Error::IndexOutOfBounds { index, len }),
            None => Ok(()),
        }
    }
}
