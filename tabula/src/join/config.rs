//! This module defines the options of the join operations.

use std::{fmt::Display, str::FromStr};

use tabula_physical::{join::NullPolicy, util::Interrupt};

use crate::error::Error;

/// Suffix appended to right column names that collide with left ones
pub const DEFAULT_SUFFIX: &str = "_right";

/// Kind of an equi-join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JoinType {
    /// Matching pairs only
    #[default]
    Inner,
    /// Every left row, padded with nulls if it has no match
    Left,
    /// Every right row, padded with nulls if it has no match
    Right,
    /// Every row of either side
    Outer,
    /// Left rows with at least one match, left columns only
    Semi,
    /// Left rows without a match, left columns only
    Anti,
    /// Every combination of rows, no keys
    Cross,
}

impl Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
            JoinType::Outer => "outer",
            JoinType::Semi => "semi",
            JoinType::Anti => "anti",
            JoinType::Cross => "cross",
        };

        write!(f, "{name}")
    }
}

impl FromStr for JoinType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            "outer" | "full" => Ok(JoinType::Outer),
            "semi" => Ok(JoinType::Semi),
            "anti" => Ok(JoinType::Anti),
            "cross" => Ok(JoinType::Cross),
            _ => Err(Error::UnknownJoinType(s.to_owned())),
        }
    }
}

/// Configuration of an equi-join
#[derive(Debug, Clone)]
pub struct JoinConfig {
    /// Kind of join
    pub how: JoinType,
    /// Key columns of the left table
    pub left_on: Vec<String>,
    /// Key columns of the right table, paired with `left_on` by position
    pub right_on: Vec<String>,
    /// Appended to right column names that already exist in the output
    pub suffix: String,
    /// Allows cancelling the join from another thread
    pub interrupt: Interrupt,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            how: JoinType::default(),
            left_on: Vec::new(),
            right_on: Vec::new(),
            suffix: DEFAULT_SUFFIX.to_owned(),
            interrupt: Interrupt::default(),
        }
    }
}

impl JoinConfig {
    /// Create a new [JoinConfig] for the given kind of join without keys.
    pub fn new(how: JoinType) -> Self {
        Self {
            how,
            ..Self::default()
        }
    }

    /// Use the same key columns on both sides.
    pub fn on<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys.into_iter().map(Into::into).collect::<Vec<_>>();

        Self {
            left_on: keys.clone(),
            right_on: keys,
            ..self
        }
    }

    /// Set the key columns of the left table.
    pub fn left_on<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.left_on = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the key columns of the right table.
    pub fn right_on<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.right_on = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the suffix for colliding column names; `""` selects [DEFAULT_SUFFIX].
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Observe the given [Interrupt].
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }
}

/// Options of an inequality join
#[derive(Debug, Clone)]
pub struct JoinWhereOptions {
    /// Appended to right column names that already exist in the output
    pub suffix: String,
    /// Treatment of nulls in columns referenced by predicates
    pub null_policy: NullPolicy,
    /// Sort the output by left row and then by right row
    pub maintain_order: bool,
    /// Allows cancelling the join from another thread
    pub interrupt: Interrupt,
}

impl Default for JoinWhereOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_owned(),
            null_policy: NullPolicy::default(),
            maintain_order: true,
            interrupt: Interrupt::default(),
        }
    }
}

impl JoinWhereOptions {
    /// Set the suffix for colliding column names; `""` selects [DEFAULT_SUFFIX].
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the [NullPolicy].
    pub fn null_policy(mut self, null_policy: NullPolicy) -> Self {
        self.null_policy = null_policy;
        self
    }

    /// Set whether the output is sorted by left row and then by right row.
    pub fn maintain_order(mut self, maintain_order: bool) -> Self {
        self.maintain_order = maintain_order;
        self
    }

    /// Observe the given [Interrupt].
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }
}

#[cfg(test)]
mod test {
    use super::{JoinConfig, JoinType, DEFAULT_SUFFIX};

    #[test]
    fn join_type_names() {
        for how in [
            JoinType::Inner,
            JoinType::Left,
            JoinType::Right,
            JoinType::Outer,
            JoinType::Semi,
            JoinType::Anti,
            JoinType::Cross,
        ] {
            assert_eq!(how.to_string().parse::<JoinType>().unwrap(), how);
        }

        assert_eq!("FULL".parse::<JoinType>().unwrap(), JoinType::Outer);
        assert!("sideways".parse::<JoinType>().is_err());
    }

    #[test]
    fn builder() {
        let config = JoinConfig::new(JoinType::Left).on(["a", "b"]).right_on(["c", "d"]);

        assert_eq!(config.left_on, vec!["a", "b"]);
        assert_eq!(config.right_on, vec!["c", "d"]);
        assert_eq!(config.suffix, DEFAULT_SUFFIX);
    }
}
