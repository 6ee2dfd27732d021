//! This module implements the matching step of the asof join.

use crate::{datatypes::Coordinate, error::Error};

/// Which right row an asof join matches with a left key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AsofDirection {
    /// Last right key that is not greater than the left key
    #[default]
    Backward,
    /// First right key that is not smaller than the left key
    Forward,
    /// Closest right key in either direction; ties go backward
    Nearest,
}

/// Finds the asof partner of a key among sorted candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsofMatcher {
    direction: AsofDirection,
    tolerance: Option<f64>,
    allow_exact_matches: bool,
}

impl AsofMatcher {
    /// Create a new [AsofMatcher].
    ///
    /// A match farther away than `tolerance` is discarded.
    /// If `allow_exact_matches` is false, candidates equal to the key are ignored.
    pub fn new(
        direction: AsofDirection,
        tolerance: Option<f64>,
        allow_exact_matches: bool,
    ) -> Self {
        Self {
            direction,
            tolerance,
            allow_exact_matches,
        }
    }

    /// Returns the row of the candidate matching `key`.
    ///
    /// `candidates` are pairs of row and key, sorted by key.
    pub fn find(&self, candidates: &[(usize, Coordinate)], key: Coordinate) -> Option<usize> {
        #[cfg(feature = "check_column_sorting")]
        debug_assert!(candidates.windows(2).all(|pair| pair[0].1 <= pair[1].1));

        let backward = || {
            let end = if self.allow_exact_matches {
                candidates.partition_point(|&(_, candidate)| candidate <= key)
            } else {
                candidates.partition_point(|&(_, candidate)| candidate < key)
            };
            end.checked_sub(1).map(|index| candidates[index])
        };
        let forward = || {
            let start = if self.allow_exact_matches {
                candidates.partition_point(|&(_, candidate)| candidate < key)
            } else {
                candidates.partition_point(|&(_, candidate)| candidate <= key)
            };
            candidates.get(start).copied()
        };

        let (row, candidate) = match self.direction {
            AsofDirection::Backward => backward(),
            AsofDirection::Forward => forward(),
            AsofDirection::Nearest => match (backward(), forward()) {
                (Some(before), Some(after)) => {
                    if after.1.distance(key) < before.1.distance(key) {
                        Some(after)
                    } else {
                        Some(before)
                    }
                }
                (before, after) => before.or(after),
            },
        }?;

        match self.tolerance {
            Some(tolerance) if candidate.distance(key) > tolerance => None,
            _ => Some(row),
        }
    }
}

/// Pairs every non-null key with its row and checks that the keys are sorted.
///
/// # Errors
/// Returns [Error::UnsortedColumn] naming `column` if the keys are not ascending.
pub fn sorted_candidates(
    column: &str,
    keys: &[Option<Coordinate>],
) -> Result<Vec<(usize, Coordinate)>, Error> {
    let candidates = keys
        .iter()
        .enumerate()
        .filter_map(|(row, key)| key.map(|key| (row, key)))
        .collect::<Vec<_>>();

    if candidates.windows(2).any(|pair| pair[0].1 > pair[1].1) {
        return Err(Error::UnsortedColumn(column.to_owned()));
    }

    Ok(candidates)
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::{sorted_candidates, AsofDirection, AsofMatcher};
    use crate::{datatypes::Coordinate, error::Error};

    fn candidates(keys: &[i32]) -> Vec<(usize, Coordinate)> {
        keys.iter()
            .enumerate()
            .map(|(row, &key)| (row, Coordinate::from(key)))
            .collect()
    }

    #[test]
    fn directions() {
        let right = candidates(&[1, 5, 10]);
        let find = |direction, key: i32| {
            AsofMatcher::new(direction, None, true).find(&right, Coordinate::from(key))
        };

        assert_eq!(find(AsofDirection::Backward, 6), Some(1));
        assert_eq!(find(AsofDirection::Backward, 0), None);
        assert_eq!(find(AsofDirection::Forward, 6), Some(2));
        assert_eq!(find(AsofDirection::Forward, 11), None);
        assert_eq!(find(AsofDirection::Nearest, 6), Some(1));
        assert_eq!(find(AsofDirection::Nearest, 9), Some(2));
        assert_eq!(find(AsofDirection::Nearest, 3), Some(0));
        assert_eq!(find(AsofDirection::Nearest, 11), Some(2));
    }

    #[test]
    fn exact_matches_and_tolerance() {
        let right = candidates(&[1, 5, 5, 10]);
        let key = Coordinate::from(5);

        assert_eq!(
            AsofMatcher::new(AsofDirection::Backward, None, true).find(&right, key),
            Some(2)
        );
        assert_eq!(
            AsofMatcher::new(AsofDirection::Forward, None, true).find(&right, key),
            Some(1)
        );
        assert_eq!(
            AsofMatcher::new(AsofDirection::Backward, None, false).find(&right, key),
            Some(0)
        );
        assert_eq!(
            AsofMatcher::new(AsofDirection::Forward, None, false).find(&right, key),
            Some(3)
        );
        assert_eq!(
            AsofMatcher::new(AsofDirection::Backward, Some(3.0), false).find(&right, key),
            None
        );
        assert_eq!(
            AsofMatcher::new(AsofDirection::Forward, Some(5.0), false).find(&right, key),
            Some(3)
        );
    }

    #[test]
    fn candidates_skip_nulls_and_must_be_sorted() {
        let keys = vec![Some(Coordinate::from(1)), None, Some(Coordinate::from(2))];
        assert_eq!(
            sorted_candidates("t", &keys).unwrap(),
            vec![(0, Coordinate::from(1)), (2, Coordinate::from(2))]
        );

        let keys = vec![Some(Coordinate::from(2)), None, Some(Coordinate::from(1))];
        assert_eq!(
            sorted_candidates("t", &keys),
            Err(Error::UnsortedColumn("t".to_owned()))
        );
    }
}
