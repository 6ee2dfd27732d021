//! This module resolves join predicates against two tables and evaluates them row by row.

use std::{borrow::Cow, cmp::Ordering};

use tabula_physical::{
    columnar::{Column, ColumnData},
    datatypes::{DataType, Value},
    join::InequalityOperator,
};

use crate::{
    error::Error,
    expression::{BinaryOperator, Expr},
    table::Table,
};

use super::JoinSide;

/// Comparison operators allowed in join predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl ComparisonOperator {
    fn from_binary(operator: BinaryOperator) -> Option<Self> {
        match operator {
            BinaryOperator::Equal => Some(Self::Equal),
            BinaryOperator::NotEqual => Some(Self::NotEqual),
            BinaryOperator::Less => Some(Self::Less),
            BinaryOperator::LessEqual => Some(Self::LessEqual),
            BinaryOperator::Greater => Some(Self::Greater),
            BinaryOperator::GreaterEqual => Some(Self::GreaterEqual),
            BinaryOperator::And
            | BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide => None,
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
            Self::Less => ordering.is_lt(),
            Self::LessEqual => ordering.is_le(),
            Self::Greater => ordering.is_gt(),
            Self::GreaterEqual => ordering.is_ge(),
        }
    }

    fn inequality(self) -> Option<InequalityOperator> {
        match self {
            Self::Less => Some(InequalityOperator::Lt),
            Self::LessEqual => Some(InequalityOperator::Le),
            Self::Greater => Some(InequalityOperator::Gt),
            Self::GreaterEqual => Some(InequalityOperator::Ge),
            Self::Equal | Self::NotEqual => None,
        }
    }
}

/// Operand of a resolved comparison
#[derive(Debug, Clone)]
pub(crate) enum Operand<'a> {
    Column { side: JoinSide, column: &'a Column },
    Literal(Value),
}

impl<'a> Operand<'a> {
    fn resolve(name: String, left: &'a Table, right: &'a Table) -> Result<Self, Error> {
        if let Some(column) = left.column(&name) {
            Ok(Operand::Column {
                side: JoinSide::Left,
                column,
            })
        } else if let Some(column) = right.column(&name) {
            Ok(Operand::Column {
                side: JoinSide::Right,
                column,
            })
        } else {
            Err(Error::UnknownColumn(name))
        }
    }

    /// Resolve two column names, preferring an assignment to different sides.
    fn resolve_pair(
        first: String,
        second: String,
        left: &'a Table,
        right: &'a Table,
    ) -> Result<(Self, Self), Error> {
        let assignments = [
            (JoinSide::Left, left, JoinSide::Right, right),
            (JoinSide::Right, right, JoinSide::Left, left),
        ];

        for (first_side, first_table, second_side, second_table) in assignments {
            if let (Some(first_column), Some(second_column)) =
                (first_table.column(&first), second_table.column(&second))
            {
                return Ok((
                    Operand::Column {
                        side: first_side,
                        column: first_column,
                    },
                    Operand::Column {
                        side: second_side,
                        column: second_column,
                    },
                ));
            }
        }

        Ok((
            Self::resolve(first, left, right)?,
            Self::resolve(second, left, right)?,
        ))
    }

    fn data_type(&self) -> Option<DataType> {
        match self {
            Operand::Column { column, .. } => Some(column.data_type()),
            Operand::Literal(value) => value.data_type(),
        }
    }

    fn value(&self, left_row: usize, right_row: usize) -> Cow<'_, Value> {
        match self {
            Operand::Column {
                side: JoinSide::Left,
                column,
            } => Cow::Owned(column.get(left_row)),
            Operand::Column {
                side: JoinSide::Right,
                column,
            } => Cow::Owned(column.get(right_row)),
            Operand::Literal(value) => Cow::Borrowed(value),
        }
    }
}

/// Inequality between a left and a right numeric column, `left operator right`
#[derive(Debug, Clone, Copy)]
pub(crate) struct InequalityPredicate<'a> {
    pub(crate) left: &'a Column,
    pub(crate) operator: InequalityOperator,
    pub(crate) right: &'a Column,
}

/// Predicate `left operator right` with resolved operands
#[derive(Debug, Clone)]
pub(crate) struct Comparison<'a> {
    left: Operand<'a>,
    operator: ComparisonOperator,
    right: Operand<'a>,
}

impl<'a> Comparison<'a> {
    /// Resolve the columns of `expr`.
    ///
    /// # Errors
    /// Fails if `expr` is not a comparison between columns and literals,
    /// if a column exists in neither table, or if the operand types cannot be compared.
    pub(crate) fn resolve(expr: Expr, left: &'a Table, right: &'a Table) -> Result<Self, Error> {
        let text = expr.to_string();

        let Expr::Binary {
            left: first,
            operator,
            right: second,
        } = expr
        else {
            return Err(Error::UnsupportedPredicate(text));
        };
        let Some(operator) = ComparisonOperator::from_binary(operator) else {
            return Err(Error::UnsupportedPredicate(text));
        };

        let (first, second) = match (*first, *second) {
            (Expr::Column(first), Expr::Column(second)) => {
                Operand::resolve_pair(first, second, left, right)?
            }
            (Expr::Column(name), Expr::Literal(value)) => (
                Operand::resolve(name, left, right)?,
                Operand::Literal(value),
            ),
            (Expr::Literal(value), Expr::Column(name)) => (
                Operand::Literal(value),
                Operand::resolve(name, left, right)?,
            ),
            (Expr::Literal(first), Expr::Literal(second)) => {
                (Operand::Literal(first), Operand::Literal(second))
            }
            _ => return Err(Error::UnsupportedPredicate(text)),
        };

        if let (Some(first_type), Some(second_type)) = (first.data_type(), second.data_type()) {
            if !first_type.is_join_compatible(&second_type) {
                return Err(Error::IncomparableOperands {
                    predicate: text,
                    left: first_type,
                    right: second_type,
                });
            }
        }

        Ok(Self {
            left: first,
            operator,
            right: second,
        })
    }

    /// Evaluate the predicate on a pair of rows.
    ///
    /// Comparisons involving nulls or NaN are false.
    pub(crate) fn evaluate(&self, left_row: usize, right_row: usize) -> bool {
        let first = self.left.value(left_row, right_row);
        let second = self.right.value(left_row, right_row);

        first
            .compare(&second)
            .is_some_and(|ordering| self.operator.holds(ordering))
    }

    /// View this predicate as an inequality between a left and a right column,
    /// if it has that shape and both columns are numeric.
    pub(crate) fn as_inequality(&self) -> Option<InequalityPredicate<'a>> {
        let operator = self.operator.inequality()?;

        let (left, operator, right) = match (&self.left, &self.right) {
            (
                Operand::Column {
                    side: JoinSide::Left,
                    column: left,
                },
                Operand::Column {
                    side: JoinSide::Right,
                    column: right,
                },
            ) => (*left, operator, *right),
            (
                Operand::Column {
                    side: JoinSide::Right,
                    column: right,
                },
                Operand::Column {
                    side: JoinSide::Left,
                    column: left,
                },
            ) => (*left, operator.flip(), *right),
            _ => return None,
        };

        (left.data_type().is_numeric() && right.data_type().is_numeric()).then_some(
            InequalityPredicate {
                left,
                operator,
                right,
            },
        )
    }

    /// Columns referenced by this predicate, with their side.
    pub(crate) fn columns(&self) -> impl Iterator<Item = (JoinSide, &'a Column)> + '_ {
        [&self.left, &self.right]
            .into_iter()
            .filter_map(|operand| match operand {
                Operand::Column { side, column } => Some((*side, *column)),
                Operand::Literal(_) => None,
            })
    }
}

/// First row of `column` that is null or NaN.
pub(crate) fn first_missing(column: &Column) -> Option<usize> {
    match column.data() {
        ColumnData::Float64(vector) => vector.iter().position(|value| match value {
            Some(value) => value.is_nan(),
            None => true,
        }),
        _ => (0..column.len()).find(|&row| column.is_null(row)),
    }
}
