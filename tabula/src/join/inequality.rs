//! This module implements joins on a conjunction of comparisons.
//!
//! Comparisons between a numeric column of each table using `<`, `<=`, `>` or `>=`
//! can be accelerated: one of them is evaluated by a piecewise merge join,
//! two of them by IEJoin. All other comparisons are checked afterwards on
//! the candidate pairs. Without any accelerable comparison, every pair of
//! rows is checked in a nested loop.

use std::fmt::Display;

use itertools::Itertools;

use tabula_physical::{
    columnar::Column,
    error::Error as PhysicalError,
    join::{
        iejoin::iejoin,
        nested_loop::{cross_product, nested_loop_join},
        piecewise::piecewise_merge_join,
        CoordinateSet, IeJoinPredicates, JoinIndices, NullPolicy,
    },
};

use crate::{error::Error, expression::Expr, table::Table};

use super::{
    evaluate::{first_missing, Comparison, InequalityPredicate},
    result::ResultBuilder,
    JoinWhereOptions,
};

/// Algorithm chosen for an inequality join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InequalityStrategy {
    /// No predicates, every pair of rows
    Cross,
    /// One accelerated comparison
    PiecewiseMerge,
    /// Two accelerated comparisons
    IeJoin,
    /// No accelerated comparison, every pair of rows is checked
    NestedLoop,
}

impl Display for InequalityStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InequalityStrategy::Cross => write!(f, "cross product"),
            InequalityStrategy::PiecewiseMerge => write!(f, "piecewise merge join"),
            InequalityStrategy::IeJoin => write!(f, "IEJoin"),
            InequalityStrategy::NestedLoop => write!(f, "nested loop"),
        }
    }
}

/// Result of [Table::join_where_with_options]
#[derive(Debug, Clone)]
pub struct JoinWhereOutput {
    /// The joined table
    pub table: Table,
    /// Algorithm that produced the candidate pairs
    pub strategy: InequalityStrategy,
    /// Number of comparisons checked on the candidate pairs
    pub residual_predicates: usize,
}

/// Maximal number of comparisons that drive the accelerated algorithms
const MAX_ACCELERATED: usize = 2;

/// Fail on the first null or NaN in any of the given columns.
fn reject_missing<'a, I>(columns: I) -> Result<(), Error>
where
    I: IntoIterator<Item = &'a Column>,
{
    for column in columns {
        if let Some(row) = first_missing(column) {
            return Err(PhysicalError::NullInJoinKey {
                column: column.name().to_owned(),
                row,
            }
            .into());
        }
    }

    Ok(())
}

/// Candidate pairs satisfying the accelerated predicates.
fn accelerated_pairs(
    drivers: &[InequalityPredicate<'_>],
    options: &JoinWhereOptions,
) -> Result<Vec<(usize, usize)>, Error> {
    let left_columns = drivers.iter().map(|driver| driver.left).collect::<Vec<_>>();
    let right_columns = drivers.iter().map(|driver| driver.right).collect::<Vec<_>>();

    let left = CoordinateSet::project(&left_columns, options.null_policy)?;
    let right = CoordinateSet::project(&right_columns, options.null_policy)?;

    let local_pairs = match drivers {
        [single] => {
            piecewise_merge_join(left.axis(0), right.axis(0), single.operator, &options.interrupt)?
        }
        [first, second] => iejoin(
            (left.axis(0), left.axis(1)),
            (right.axis(0), right.axis(1)),
            IeJoinPredicates {
                first: first.operator,
                second: second.operator,
            },
            &options.interrupt,
        )?,
        _ => unreachable!("between one and {MAX_ACCELERATED} accelerated predicates"),
    };

    Ok(local_pairs
        .into_iter()
        .map(|(l, r)| (left.row(l), right.row(r)))
        .collect())
}

pub(super) fn inequality_join<I>(
    left: &Table,
    right: &Table,
    predicates: I,
    options: &JoinWhereOptions,
) -> Result<JoinWhereOutput, Error>
where
    I: IntoIterator<Item = Expr>,
{
    let comparisons = predicates
        .into_iter()
        .flat_map(Expr::conjuncts)
        .map(|expr| Comparison::resolve(expr, left, right))
        .collect::<Result<Vec<_>, _>>()?;

    if options.null_policy == NullPolicy::Reject {
        reject_missing(
            comparisons
                .iter()
                .flat_map(Comparison::columns)
                .unique_by(|&(side, column)| (side, column.name()))
                .map(|(_, column)| column),
        )?;
    }

    let mut drivers = Vec::with_capacity(MAX_ACCELERATED);
    let mut residuals = Vec::new();
    for comparison in &comparisons {
        match comparison.as_inequality() {
            Some(inequality) if drivers.len() < MAX_ACCELERATED => drivers.push(inequality),
            _ => residuals.push(comparison),
        }
    }

    let strategy = match drivers.len() {
        0 if comparisons.is_empty() => InequalityStrategy::Cross,
        0 => InequalityStrategy::NestedLoop,
        1 => InequalityStrategy::PiecewiseMerge,
        _ => InequalityStrategy::IeJoin,
    };
    log::debug!(
        "inequality join of {} x {} rows with {} predicates: {strategy}, {} residual",
        left.height(),
        right.height(),
        comparisons.len(),
        residuals.len()
    );

    let satisfies_residuals =
        |l: usize, r: usize| residuals.iter().all(|comparison| comparison.evaluate(l, r));

    let mut indices = match strategy {
        InequalityStrategy::Cross => {
            cross_product(left.height(), right.height(), &options.interrupt)?
        }
        InequalityStrategy::NestedLoop => {
            log::warn!(
                "no predicate compares a numeric left column with a numeric right column; \
                 checking all {} x {} pairs in a nested loop",
                left.height(),
                right.height()
            );

            JoinIndices::from_pairs(nested_loop_join(
                left.height(),
                right.height(),
                satisfies_residuals,
                &options.interrupt,
            )?)
        }
        InequalityStrategy::PiecewiseMerge | InequalityStrategy::IeJoin => {
            let mut pairs = accelerated_pairs(&drivers, options)?;
            if !residuals.is_empty() {
                pairs.retain(|&(l, r)| satisfies_residuals(l, r));
            }

            JoinIndices::from_pairs(pairs)
        }
    };

    if options.maintain_order {
        indices.sort();
    }

    let table = ResultBuilder::new(left, right, &options.suffix).build(&indices)?;

    Ok(JoinWhereOutput {
        table,
        strategy,
        residual_predicates: residuals.len(),
    })
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use test_log::test;

    use tabula_physical::error::Error as PhysicalError;

    use super::InequalityStrategy;
    use crate::{
        col, error::Error, lit, Column, Interrupt, JoinWhereOptions, NullPolicy, Table, Value,
    };

    fn events() -> (Table, Table) {
        let left = Table::new(vec![
            Column::from_values("id", vec![0i32, 1, 2]),
            Column::from_values("dur", vec![1i64, 5, 10]),
            Column::from_values("rev", vec![3.0, 8.0, 1.0]),
        ])
        .unwrap();
        let right = Table::new(vec![
            Column::from_values("id", vec![0i32, 1, 2]),
            Column::from_values("time", vec![2i64, 6, 9]),
            Column::from_values("cost", vec![2.0, 9.0, 0.5]),
        ])
        .unwrap();

        (left, right)
    }

    fn pairs(table: &Table) -> Vec<(Value, Value)> {
        (0..table.height())
            .map(|row| {
                (
                    table.get(row, "id").unwrap(),
                    table.get(row, "id_right").unwrap(),
                )
            })
            .collect()
    }

    fn pair(l: i32, r: i32) -> (Value, Value) {
        (Value::Int32(l), Value::Int32(r))
    }

    #[test]
    fn strategies() {
        let (left, right) = events();
        let options = JoinWhereOptions::default();

        let cases = [
            (vec![], InequalityStrategy::Cross, 0, 9),
            (vec![col("dur").lt(col("time"))], InequalityStrategy::PiecewiseMerge, 0, 5),
            (
                vec![col("dur").lt(col("time")).and(col("rev").gt(col("cost")))],
                InequalityStrategy::IeJoin,
                0,
                3,
            ),
            (
                vec![
                    col("dur").lt(col("time")),
                    col("rev").gt(col("cost")),
                    col("id").not_equal(col("id")),
                ],
                InequalityStrategy::IeJoin,
                1,
                2,
            ),
            (vec![col("dur").lt(lit(6))], InequalityStrategy::NestedLoop, 1, 6),
        ];

        for (predicates, strategy, residual, height) in cases {
            let output = left
                .join_where_with_options(&right, predicates, &options)
                .unwrap();

            assert_eq!(output.strategy, strategy);
            assert_eq!(output.residual_predicates, residual);
            assert_eq!(output.table.height(), height, "{strategy}");
        }
    }

    #[test]
    fn residual_predicates_filter_candidates() {
        let (left, right) = events();

        let table = left
            .join_where(
                &right,
                [
                    col("dur").lt(col("time")),
                    col("rev").gt(col("cost")),
                    col("rev").gt(col("time")),
                ],
            )
            .unwrap();

        // The first two predicates leave (0, 0), (0, 2) and (1, 2)
        assert_eq!(pairs(&table), vec![pair(0, 0)]);
    }

    #[test]
    fn null_policies() {
        let left = Table::new(vec![
            Column::from_values("id", vec![0i32, 1]),
            Column::from_options("x", vec![Some(1i64), None]),
        ])
        .unwrap();
        let right = Table::new(vec![
            Column::from_values("id", vec![0i32]),
            Column::from_values("y", vec![5.0]),
        ])
        .unwrap();

        for predicate in [col("x").lt(col("y")), col("x").not_equal(col("y"))] {
            assert!(matches!(
                left.join_where(&right, [predicate.clone()]),
                Err(Error::PhysicalError(_))
            ));

            let skipping = JoinWhereOptions::default().null_policy(NullPolicy::Skip);
            let output = left
                .join_where_with_options(&right, [predicate], &skipping)
                .unwrap();
            assert_eq!(pairs(&output.table), vec![pair(0, 0)]);
        }
    }

    #[test]
    fn cancelled() {
        let (left, right) = events();
        let interrupt = Interrupt::new();
        interrupt.raise();

        let result = left.join_where_with_options(
            &right,
            [col("dur").lt(col("time"))],
            &JoinWhereOptions::default().interrupt(interrupt),
        );

        assert!(matches!(result, Err(Error::PhysicalError(_))));
    }

    #[test]
    fn cancelled_with_two_predicates() {
        let (left, right) = events();
        let interrupt = Interrupt::new();
        interrupt.raise();

        let result = left.join_where_with_options(
            &right,
            [col("dur").lt(col("time")), col("rev").gt(col("cost"))],
            &JoinWhereOptions::default().interrupt(interrupt),
        );

        assert!(matches!(
            result,
            Err(Error::PhysicalError(PhysicalError::Cancelled))
        ));
    }

    #[quickcheck]
    fn accelerated_agrees_with_brute_force(left: Vec<(i8, i8)>, right: Vec<(i8, i8)>) -> bool {
        let table = |rows: &[(i8, i8)]| {
            Table::new(vec![
                Column::from_values("id", (0..).take(rows.len()).collect::<Vec<i32>>()),
                Column::from_values(
                    "x",
                    rows.iter().map(|&(x, _)| i64::from(x % 8)).collect::<Vec<_>>(),
                ),
                Column::from_values(
                    "y",
                    rows.iter().map(|&(_, y)| f64::from(y % 8)).collect::<Vec<_>>(),
                ),
            ])
            .unwrap()
        };
        let left_table = table(&left);
        let right_table = table(&right);

        let output = left_table
            .join_where_with_options(
                &right_table,
                [col("x").lt_eq(col("x")), col("y").gt(col("y"))],
                &JoinWhereOptions::default(),
            )
            .unwrap();

        let mut expected = Vec::new();
        for (l, &(lx, ly)) in (0..).zip(&left) {
            for (r, &(rx, ry)) in (0..).zip(&right) {
                if lx % 8 <= rx % 8 && ly % 8 > ry % 8 {
                    expected.push(pair(l, r));
                }
            }
        }

        output.strategy == InequalityStrategy::IeJoin && pairs(&output.table) == expected
    }
}
