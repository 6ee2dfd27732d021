//! This module implements IEJoin, the inequality join for two predicates.
//!
//! Given predicates `x_l op1 x_r` and `y_l op2 y_r`, all rows of both inputs
//! are sorted into one array L1 by their x-value such that for each left row,
//! the right rows satisfying the first predicate are exactly those behind it.
//! A second ordering L2 visits the rows by their y-value such that
//! the right rows satisfying the second predicate are visited before a left row.
//! While walking L2, visited right rows are marked at their L1 position in a
//! [FilteredBitArray]; a left row then matches every marked bit behind its own
//! L1 position.
//!
//! Rows sharing the same y-value form a run and are handled together:
//! for a strict second predicate the left rows of a run are probed before its
//! right rows are marked, otherwise the right rows are marked first.

use std::cmp::Ordering;

use crate::{
    datatypes::Coordinate,
    error::Error,
    util::{FilteredBitArray, Interrupt},
};

use super::InequalityOperator;

/// Entry of the L1 array
#[derive(Debug, Clone, Copy)]
struct Entry {
    x: Coordinate,
    y: Coordinate,
    row: usize,
    is_left: bool,
}

/// Order of two entries in L1.
fn compare_l1(a: &Entry, b: &Entry, operator: InequalityOperator) -> Ordering {
    let by_value = if operator.is_less() {
        a.x.cmp(&b.x)
    } else {
        b.x.cmp(&a.x)
    };

    // Ties: right rows stay in front of a left row only if they must not match it
    let by_side = if operator.is_strict() {
        a.is_left.cmp(&b.is_left)
    } else {
        b.is_left.cmp(&a.is_left)
    };

    by_value.then(by_side)
}

/// Order of two y-values in L2.
fn compare_l2(a: Coordinate, b: Coordinate, operator: InequalityOperator) -> Ordering {
    if operator.is_less() {
        b.cmp(&a)
    } else {
        a.cmp(&b)
    }
}

/// The two inequality predicates joined by IEJoin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IeJoinPredicates {
    /// Operator comparing the x-values
    pub first: InequalityOperator,
    /// Operator comparing the y-values
    pub second: InequalityOperator,
}

/// Compute all pairs `(l, r)` with
/// `left_x[l] first right_x[r]` and `left_y[l] second right_y[r]`.
///
/// No particular order of the result is guaranteed.
///
/// # Errors
/// Returns [Error::LengthMismatch] if the x- and y-values of one input differ in length,
/// and [Error::Cancelled] if `interrupt` is raised during the join.
pub fn iejoin(
    left: (&[Coordinate], &[Coordinate]),
    right: (&[Coordinate], &[Coordinate]),
    predicates: IeJoinPredicates,
    interrupt: &Interrupt,
) -> Result<Vec<(usize, usize)>, Error> {
    let (left_x, left_y) = left;
    let (right_x, right_y) = right;

    if left_x.len() != left_y.len() || right_x.len() != right_y.len() {
        return Err(Error::LengthMismatch(vec![
            left_x.len(),
            left_y.len(),
            right_x.len(),
            right_y.len(),
        ]));
    }

    let IeJoinPredicates { first, second } = predicates;

    let mut l1 = Vec::with_capacity(left_x.len() + right_x.len());
    l1.extend(
        left_x
            .iter()
            .zip(left_y)
            .enumerate()
            .map(|(row, (&x, &y))| Entry {
                x,
                y,
                row,
                is_left: true,
            }),
    );
    l1.extend(
        right_x
            .iter()
            .zip(right_y)
            .enumerate()
            .map(|(row, (&x, &y))| Entry {
                x,
                y,
                row,
                is_left: false,
            }),
    );
    l1.sort_unstable_by(|a, b| compare_l1(a, b, first));

    let mut l2 = (0..l1.len()).collect::<Vec<_>>();
    l2.sort_unstable_by(|&a, &b| compare_l2(l1[a].y, l1[b].y, second));

    let mut visited = FilteredBitArray::new(l1.len());
    let mut result = Vec::new();
    let probe_offset = usize::from(first.is_strict());

    let mut probe = |positions: &[usize], visited: &FilteredBitArray| {
        for &position in positions {
            let entry = &l1[position];
            if !entry.is_left {
                continue;
            }

            result.extend(
                visited
                    .iter_set_from(position + probe_offset)
                    .map(|marked| (entry.row, l1[marked].row)),
            );
        }
    };
    let mark = |positions: &[usize], visited: &mut FilteredBitArray| {
        for &position in positions {
            if !l1[position].is_left {
                visited.set(position);
            }
        }
    };

    for run in l2.chunk_by(|&a, &b| l1[a].y == l1[b].y) {
        interrupt.check()?;

        if second.is_strict() {
            probe(run, &visited);
            mark(run, &mut visited);
        } else {
            mark(run, &mut visited);
            probe(run, &visited);
        }
    }

    log::trace!(
        "iejoin ({first}, {second}) of {} x {} rows produced {} pairs",
        left_x.len(),
        right_x.len(),
        result.len()
    );

    Ok(result)
}
