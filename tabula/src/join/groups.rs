//! This module restricts the candidates of asof and rolling joins to rows with equal `by` columns.

use hashbrown::HashMap;

use tabula_physical::{columnar::Column, datatypes::Coordinate, join::KeyEncoder};

use crate::{error::Error, table::Table};

use super::{resolve_columns, JoinSide};

/// Resolved `by` columns of both sides
#[derive(Debug)]
pub(super) struct Groups<'a> {
    left: Vec<&'a Column>,
    right: Vec<&'a Column>,
}

impl<'a> Groups<'a> {
    /// Look up the `by` columns and check that they can be compared pairwise.
    pub(super) fn resolve(
        left: &'a Table,
        right: &'a Table,
        left_by: &[String],
        right_by: &[String],
    ) -> Result<Self, Error> {
        if left_by.len() != right_by.len() {
            return Err(Error::KeyCountMismatch {
                left: left_by.len(),
                right: right_by.len(),
            });
        }

        let left_by = resolve_columns(left, left_by, JoinSide::Left)?;
        let right_by = resolve_columns(right, right_by, JoinSide::Right)?;

        for (left_column, right_column) in left_by.iter().zip(&right_by) {
            if !left_column
                .data_type()
                .is_join_compatible(&right_column.data_type())
            {
                return Err(Error::IncompatibleKeyTypes {
                    left: left_column.name().to_owned(),
                    left_type: left_column.data_type(),
                    right: right_column.name().to_owned(),
                    right_type: right_column.data_type(),
                });
            }
        }

        Ok(Self {
            left: left_by,
            right: right_by,
        })
    }

    /// Right `by` columns named like their left partner.
    pub(super) fn shared_names(&self) -> Vec<&'a str> {
        self.left
            .iter()
            .zip(&self.right)
            .filter(|(left_column, right_column)| left_column.name() == right_column.name())
            .map(|(_, &right_column)| right_column.name())
            .collect()
    }

    /// Split the sorted right candidates by the values of their `by` columns.
    ///
    /// Candidates with a null `by` value are dropped.
    /// Without `by` columns, all candidates form a single group.
    pub(super) fn partition(&self, right_candidates: &[(usize, Coordinate)]) -> Candidates<'a> {
        let right_keys = KeyEncoder::new(&self.right);
        let mut buffer = Vec::new();

        let mut groups = HashMap::<Vec<u8>, Vec<(usize, Coordinate)>>::new();
        for &(row, key) in right_candidates {
            if right_keys.encode(row, &mut buffer) {
                groups
                    .entry_ref(buffer.as_slice())
                    .or_default()
                    .push((row, key));
            }
        }

        log::trace!("{} right groups", groups.len());

        Candidates {
            left_keys: KeyEncoder::new(&self.left),
            groups,
            buffer,
        }
    }
}

/// Right candidates split into groups, see [Groups::partition]
#[derive(Debug)]
pub(super) struct Candidates<'a> {
    left_keys: KeyEncoder<'a>,
    groups: HashMap<Vec<u8>, Vec<(usize, Coordinate)>>,
    buffer: Vec<u8>,
}

impl Candidates<'_> {
    /// Sorted candidates of the group the given left row belongs to.
    pub(super) fn of_left_row(&mut self, row: usize) -> &[(usize, Coordinate)] {
        if !self.left_keys.encode(row, &mut self.buffer) {
            return &[];
        }

        self.groups
            .get(self.buffer.as_slice())
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use tabula_physical::datatypes::Coordinate;

    use super::Groups;
    use crate::{error::Error, Column, JoinSide, Table};

    fn table(keys: &[Option<i64>]) -> Table {
        Table::new(vec![
            Column::from_options("key", keys.iter().copied()),
            Column::from_values("at", (0..keys.len() as i32).collect::<Vec<_>>()),
        ])
        .unwrap()
    }

    fn candidates(height: usize) -> Vec<(usize, Coordinate)> {
        (0..height)
            .map(|row| (row, Coordinate::from(row as i32)))
            .collect()
    }

    #[test]
    fn rows_find_their_group() {
        let left = table(&[Some(1), Some(2), None]);
        let right = table(&[Some(2), None, Some(1), Some(2)]);
        let by = vec!["key".to_owned()];

        let groups = Groups::resolve(&left, &right, &by, &by).unwrap();
        assert_eq!(groups.shared_names(), vec!["key"]);

        let mut grouped = groups.partition(&candidates(4));
        let rows = |candidates: &[(usize, Coordinate)]| {
            candidates.iter().map(|&(row, _)| row).collect::<Vec<_>>()
        };
        assert_eq!(rows(grouped.of_left_row(0)), vec![2]);
        assert_eq!(rows(grouped.of_left_row(1)), vec![0, 3]);
        assert!(grouped.of_left_row(2).is_empty());
    }

    #[test]
    fn no_columns_form_one_group() {
        let left = table(&[Some(1)]);
        let right = table(&[Some(2), None]);

        let groups = Groups::resolve(&left, &right, &[], &[]).unwrap();
        assert!(groups.shared_names().is_empty());
        assert_eq!(groups.partition(&candidates(2)).of_left_row(0).len(), 2);
    }

    #[test]
    fn columns_must_pair_up() {
        let left = table(&[Some(1)]);
        let right = table(&[Some(1)]);

        assert!(matches!(
            Groups::resolve(&left, &right, &["key".to_owned()], &[]),
            Err(Error::KeyCountMismatch { left: 1, right: 0 })
        ));
        assert!(matches!(
            Groups::resolve(&left, &right, &["key".to_owned()], &["missing".to_owned()]),
            Err(Error::ColumnNotFound { side: JoinSide::Right, .. })
        ));
    }
}
