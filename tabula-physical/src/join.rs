//! This module collects the join algorithms of the physical layer.
//!
//! All of them compute which rows of two inputs belong together;
//! materializing the joined columns is left to the caller.

pub mod asof;
pub mod coordinates;
pub mod hash_join;
pub mod iejoin;
pub mod keys;
pub mod nested_loop;
pub mod operator;
pub mod piecewise;
pub mod rolling;

pub use asof::{AsofDirection, AsofMatcher};
pub use coordinates::{CoordinateSet, NullPolicy};
pub use hash_join::{EquiJoinKind, FilterJoinKind};
pub use iejoin::IeJoinPredicates;
pub use keys::KeyEncoder;
pub use operator::InequalityOperator;
pub use rolling::{ClosedInterval, WindowDirection, WindowMatcher};

/// Result of a join on the level of row indices.
///
/// The two lists are parallel: position `i` pairs `left[i]` with `right[i]`.
/// `None` means that there is no row on that side, i.e. the output row
/// is padded with nulls on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinIndices {
    left: Vec<Option<usize>>,
    right: Vec<Option<usize>>,
}

impl JoinIndices {
    /// Create an empty [JoinIndices].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty [JoinIndices] with space for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            left: Vec::with_capacity(capacity),
            right: Vec::with_capacity(capacity),
        }
    }

    /// Create [JoinIndices] from pairs of rows that both exist.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let (left, right) = pairs
            .into_iter()
            .map(|(left, right)| (Some(left), Some(right)))
            .unzip();

        Self { left, right }
    }

    /// Append an output row.
    pub fn push(&mut self, left: Option<usize>, right: Option<usize>) {
        self.left.push(left);
        self.right.push(right);
    }

    /// Number of output rows.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Returns `true` if there are no output rows.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Row indices into the left input.
    pub fn left(&self) -> &[Option<usize>] {
        &self.left
    }

    /// Row indices into the right input.
    pub fn right(&self) -> &[Option<usize>] {
        &self.right
    }

    /// Iterate over the output rows as pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Option<usize>, Option<usize>)> + '_ {
        self.left.iter().copied().zip(self.right.iter().copied())
    }

    /// Sort the output rows by left row and then by right row,
    /// with padding rows after all rows of the respective side.
    pub fn sort(&mut self) {
        let mut pairs = self.iter().collect::<Vec<_>>();
        pairs.sort_unstable_by_key(|&(left, right)| {
            (left.is_none(), left, right.is_none(), right)
        });

        (self.left, self.right) = pairs.into_iter().unzip();
    }
}

#[cfg(test)]
mod test {
    use super::JoinIndices;

    #[test]
    fn sort_puts_padding_last() {
        let mut indices = JoinIndices::new();
        indices.push(Some(2), Some(0));
        indices.push(None, Some(1));
        indices.push(Some(0), Some(3));
        indices.push(Some(0), None);

        indices.sort();
        assert_eq!(
            indices.iter().collect::<Vec<_>>(),
            vec![
                (Some(0), Some(3)),
                (Some(0), None),
                (Some(2), Some(0)),
                (None, Some(1))
            ]
        );
        assert_eq!(indices.right(), &[Some(3), None, Some(0), Some(1)]);
    }
}
