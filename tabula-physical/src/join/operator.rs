//! This module defines [InequalityOperator].

use std::fmt::Display;

/// Comparison operator of an inequality join predicate `left op right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InequalityOperator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl InequalityOperator {
    /// Returns `true` for `<` and `>`.
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Lt | Self::Gt)
    }

    /// Returns `true` for `<` and `<=`.
    pub fn is_less(&self) -> bool {
        matches!(self, Self::Lt | Self::Le)
    }

    /// Returns the operator that holds for `right op' left`
    /// whenever `left op right` holds.
    pub fn flip(&self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
        }
    }

    /// Evaluate `left op right`.
    pub fn holds<T: PartialOrd>(&self, left: &T, right: &T) -> bool {
        match self {
            Self::Lt => left < right,
            Self::Le => left <= right,
            Self::Gt => left > right,
            Self::Ge => left >= right,
        }
    }
}

impl Display for InequalityOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}
