//! This module implements the piecewise merge join for a single inequality predicate.
//!
//! Both inputs are sorted once. For a monotone predicate, the right rows
//! matching a left value form a suffix (for `<`, `<=`) or a prefix (for `>`, `>=`)
//! of the sorted right input, and the boundary only moves forward while the
//! left values increase. The boundary is advanced with exponential search.

use crate::{
    datatypes::Coordinate,
    error::Error,
    util::{search::exponential_search, Interrupt},
};

use super::InequalityOperator;

/// Positions of `values` in ascending order of their values, ties in original order.
pub(crate) fn sorted_order(values: &[Coordinate]) -> Vec<usize> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by_key(|&index| values[index]);
    order
}

/// Compute all pairs `(l, r)` with `left[l] operator right[r]`.
///
/// The result lists pairs grouped by left value in ascending order;
/// callers that need a particular order have to sort it.
pub fn piecewise_merge_join(
    left: &[Coordinate],
    right: &[Coordinate],
    operator: InequalityOperator,
    interrupt: &Interrupt,
) -> Result<Vec<(usize, usize)>, Error> {
    let left_order = sorted_order(left);
    let right_order = sorted_order(right);
    let right_sorted = right_order
        .iter()
        .map(|&index| right[index])
        .collect::<Vec<_>>();

    let mut result = Vec::new();
    let mut cursor = 0;

    for &left_index in &left_order {
        interrupt.check()?;
        let value = left[left_index];

        let matches = if operator.is_less() {
            cursor = exponential_search(&right_sorted, cursor, |r| !operator.holds(&value, r));
            &right_order[cursor..]
        } else {
            cursor = exponential_search(&right_sorted, cursor, |r| operator.holds(&value, r));
            &right_order[..cursor]
        };

        result.extend(matches.iter().map(|&right_index| (left_index, right_index)));
    }

    log::trace!(
        "piecewise merge join ({operator}) of {} x {} values produced {} pairs",
        left.len(),
        right.len(),
        result.len()
    );

    Ok(result)
}
