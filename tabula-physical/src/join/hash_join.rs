//! This module implements the hash based equi-join.
//!
//! The right input is always the build side. Rows whose key contains a null
//! are never inserted into the index and never probed, so they cannot match.

use bitvec::bitvec;
use hashbrown::HashMap;

use crate::{error::Error, util::Interrupt};

use super::{keys::KeyEncoder, JoinIndices};

/// Number of probe rows between two checks of the [Interrupt]
pub const PROBE_BATCH_SIZE: usize = 4096;

/// Join types that produce pairs of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquiJoinKind {
    /// Only matching pairs
    Inner,
    /// Matching pairs and every unmatched left row
    Left,
    /// Matching pairs and every unmatched row of either side
    Outer,
}

/// Join types that select rows of the left input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterJoinKind {
    /// Left rows with at least one match
    Semi,
    /// Left rows without any match
    Anti,
}

/// Hash index from encoded keys to the rows containing them
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    buckets: HashMap<Vec<u8>, Vec<usize>>,
    indexed_rows: usize,
}

impl HashIndex {
    /// Build the index over all rows of `keys` that do not contain a null.
    ///
    /// Rows of each bucket are kept in ascending order.
    pub fn build(keys: &KeyEncoder<'_>) -> Self {
        let mut buckets = HashMap::<Vec<u8>, Vec<usize>>::new();
        let mut indexed_rows = 0;
        let mut buffer = Vec::new();

        for row in 0..keys.height() {
            if !keys.encode(row, &mut buffer) {
                continue;
            }

            indexed_rows += 1;
            if let Some(rows) = buckets.get_mut(buffer.as_slice()) {
                rows.push(row);
            } else {
                buckets.insert(buffer.clone(), vec![row]);
            }
        }

        log::trace!(
            "hash index: {indexed_rows} of {} rows in {} buckets",
            keys.height(),
            buckets.len()
        );

        Self {
            buckets,
            indexed_rows,
        }
    }

    /// Rows whose key encodes to `key`, in ascending order.
    pub fn probe(&self, key: &[u8]) -> &[usize] {
        self.buckets.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct keys.
    pub fn distinct_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Number of rows that were inserted, i.e. rows without null keys.
    pub fn indexed_rows(&self) -> usize {
        self.indexed_rows
    }
}

fn check_arity(left: &KeyEncoder<'_>, right: &KeyEncoder<'_>) -> Result<(), Error> {
    if left.arity() != right.arity() {
        return Err(Error::LengthMismatch(vec![left.arity(), right.arity()]));
    }

    Ok(())
}

/// Compute the row pairs of an equi-join between `left` and `right`.
///
/// Output rows follow the order of the left input;
/// the matches of one left row follow the order of the right input.
/// For [EquiJoinKind::Outer], unmatched right rows are appended at the end in their original order.
pub fn hash_join(
    left: &KeyEncoder<'_>,
    right: &KeyEncoder<'_>,
    kind: EquiJoinKind,
    interrupt: &Interrupt,
) -> Result<JoinIndices, Error> {
    check_arity(left, right)?;

    let index = HashIndex::build(right);
    let mut matched_right = bitvec![0; right.height()];
    let mut result = JoinIndices::with_capacity(left.height());
    let mut buffer = Vec::new();

    for row in 0..left.height() {
        if row % PROBE_BATCH_SIZE == 0 {
            interrupt.check()?;
        }

        let matches: &[usize] = if left.encode(row, &mut buffer) {
            index.probe(&buffer)
        } else {
            &[]
        };

        for &right_row in matches {
            result.push(Some(row), Some(right_row));
        }

        if kind == EquiJoinKind::Outer {
            for &right_row in matches {
                matched_right.set(right_row, true);
            }
        }

        if matches.is_empty() && kind != EquiJoinKind::Inner {
            result.push(Some(row), None);
        }
    }

    if kind == EquiJoinKind::Outer {
        for right_row in matched_right.iter_zeros() {
            result.push(None, Some(right_row));
        }
    }

    log::debug!(
        "{kind:?} hash join of {} x {} rows produced {} rows",
        left.height(),
        right.height(),
        result.len()
    );

    Ok(result)
}

/// Select the rows of `left` that have a match in `right` ([FilterJoinKind::Semi])
/// or that have none ([FilterJoinKind::Anti]).
///
/// Every left row appears at most once, in ascending order.
/// Rows with a null key never match and therefore belong to the anti join.
pub fn hash_filter(
    left: &KeyEncoder<'_>,
    right: &KeyEncoder<'_>,
    kind: FilterJoinKind,
    interrupt: &Interrupt,
) -> Result<Vec<usize>, Error> {
    check_arity(left, right)?;

    let index = HashIndex::build(right);
    let mut selected = Vec::new();
    let mut buffer = Vec::new();

    for row in 0..left.height() {
        if row % PROBE_BATCH_SIZE == 0 {
            interrupt.check()?;
        }

        let has_match = left.encode(row, &mut buffer) && !index.probe(&buffer).is_empty();
        let keep = match kind {
            FilterJoinKind::Semi => has_match,
            FilterJoinKind::Anti => !has_match,
        };

        if keep {
            selected.push(row);
        }
    }

    log::debug!(
        "{kind:?} hash join kept {} of {} rows",
        selected.len(),
        left.height()
    );

    Ok(selected)
}
