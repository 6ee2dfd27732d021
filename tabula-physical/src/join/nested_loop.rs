//! This module implements joins that consider every pair of rows.

use crate::{error::Error, util::Interrupt};

use super::JoinIndices;

/// Compute all pairs `(l, r)` with `l < left_height` and `r < right_height`
/// for which `predicate(l, r)` holds, ordered by `l` and then by `r`.
///
/// This is the fallback for predicates that none of the accelerated
/// algorithms can evaluate, and costs `left_height * right_height` evaluations.
pub fn nested_loop_join<P>(
    left_height: usize,
    right_height: usize,
    mut predicate: P,
    interrupt: &Interrupt,
) -> Result<Vec<(usize, usize)>, Error>
where
    P: FnMut(usize, usize) -> bool,
{
    let mut result = Vec::new();

    for left in 0..left_height {
        interrupt.check()?;
        result.extend(
            (0..right_height)
                .filter(|&right| predicate(left, right))
                .map(|right| (left, right)),
        );
    }

    log::trace!(
        "nested loop join of {left_height} x {right_height} rows produced {} pairs",
        result.len()
    );

    Ok(result)
}

/// Cartesian product of two inputs, ordered by left row and then by right row.
pub fn cross_product(
    left_height: usize,
    right_height: usize,
    interrupt: &Interrupt,
) -> Result<JoinIndices, Error> {
    let mut result = JoinIndices::with_capacity(left_height.saturating_mul(right_height));

    for left in 0..left_height {
        interrupt.check()?;
        for right in 0..right_height {
            result.push(Some(left), Some(right));
        }
    }

    Ok(result)
}

/// Brute force reference for the inequality joins:
/// all pairs for which `left[a][l] operators[a] right[a][r]` holds on every axis `a`.
#[cfg(test)]
pub(crate) fn naive_inequality_pairs(
    left: &[&[crate::datatypes::Coordinate]],
    right: &[&[crate::datatypes::Coordinate]],
    operators: &[super::InequalityOperator],
) -> Vec<(usize, usize)> {
    let left_height = left.first().map_or(0, |axis| axis.len());
    let right_height = right.first().map_or(0, |axis| axis.len());

    nested_loop_join(
        left_height,
        right_height,
        |l, r| {
            operators
                .iter()
                .enumerate()
                .all(|(axis, operator)| operator.holds(&left[axis][l], &right[axis][r]))
        },
        &Interrupt::new(),
    )
    .expect("interrupt is never raised")
}
