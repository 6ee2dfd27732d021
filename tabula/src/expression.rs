//! This module defines [Expr], the predicates accepted by inequality joins.
//!
//! Expressions are plain syntax trees. Joins only evaluate comparisons
//! whose operands are column references or literals; any other shape is
//! rejected when the join is validated.

use std::{
    fmt::Display,
    ops::{Add, Div, Mul, Sub},
};

use tabula_physical::datatypes::Value;

/// Binary operators of an [Expr]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// Logical conjunction
    And,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        };

        write!(f, "{symbol}")
    }
}

/// Expression tree over the columns of one or two tables
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a column by name
    Column(String),
    /// Constant value
    Literal(Value),
    /// Application of a [BinaryOperator]
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// The operator
        operator: BinaryOperator,
        /// Right operand
        right: Box<Expr>,
    },
}

/// Reference to the column with the given name.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Constant expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

impl Expr {
    fn binary(self, operator: BinaryOperator, other: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            operator,
            right: Box::new(other),
        }
    }

    /// `self == other`
    pub fn equal(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Equal, other)
    }

    /// `self != other`
    pub fn not_equal(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::NotEqual, other)
    }

    /// `self < other`
    pub fn lt(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Less, other)
    }

    /// `self <= other`
    pub fn lt_eq(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::LessEqual, other)
    }

    /// `self > other`
    pub fn gt(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Greater, other)
    }

    /// `self >= other`
    pub fn gt_eq(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::GreaterEqual, other)
    }

    /// Conjunction of `self` and `other`.
    pub fn and(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    /// Splits nested conjunctions into their parts, in order.
    pub fn conjuncts(self) -> Vec<Expr> {
        let mut result = Vec::new();
        let mut pending = vec![self];

        while let Some(expr) = pending.pop() {
            match expr {
                Expr::Binary {
                    left,
                    operator: BinaryOperator::And,
                    right,
                } => {
                    pending.push(*right);
                    pending.push(*left);
                }
                other => result.push(other),
            }
        }

        result
    }
}

macro_rules! impl_arithmetic {
    ($trait:ident, $method:ident, $operator:ident) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, other: Expr) -> Expr {
                self.binary(BinaryOperator::$operator, other)
            }
        }
    };
}

impl_arithmetic!(Add, add, Add);
impl_arithmetic!(Sub, sub, Subtract);
impl_arithmetic!(Mul, mul, Multiply);
impl_arithmetic!(Div, div, Divide);

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{name}"),
            Expr::Literal(Value::Utf8(value)) => write!(f, "{value:?}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Binary {
                left,
                operator,
                right,
            } => write!(f, "({left} {operator} {right})"),
        }
    }
}
