//! This module assembles the output table of a join from matched row indices.

use hashbrown::HashSet;

use tabula_physical::join::JoinIndices;

use crate::{error::Error, table::Table};

use super::config::DEFAULT_SUFFIX;

/// Gathers the columns of both join inputs into the output [Table].
///
/// Left columns come first and keep their names. Right columns follow;
/// a right column whose name is already taken gets the suffix appended
/// until the name is free. An empty suffix means [DEFAULT_SUFFIX].
#[derive(Debug, Clone)]
pub(crate) struct ResultBuilder<'a> {
    left: &'a Table,
    right: &'a Table,
    suffix: &'a str,
    skipped_right: Vec<&'a str>,
}

impl<'a> ResultBuilder<'a> {
    pub(crate) fn new(left: &'a Table, right: &'a Table, suffix: &'a str) -> Self {
        Self {
            left,
            right,
            suffix: if suffix.is_empty() {
                DEFAULT_SUFFIX
            } else {
                suffix
            },
            skipped_right: Vec::new(),
        }
    }

    /// Leave out the right columns with the given names.
    pub(crate) fn skip_right<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.skipped_right.extend(names);
        self
    }

    /// Gather the rows given by `indices`; `None` produces nulls.
    pub(crate) fn build(&self, indices: &JoinIndices) -> Result<Table, Error> {
        let mut names = HashSet::<String>::new();
        let mut columns = Vec::with_capacity(self.left.width() + self.right.width());

        for column in self.left.columns() {
            names.insert(column.name().to_owned());
            columns.push(column.take_optional(indices.left())?);
        }

        for column in self.right.columns() {
            if self.skipped_right.contains(&column.name()) {
                continue;
            }

            let mut name = column.name().to_owned();
            while names.contains(&name) {
                name.push_str(self.suffix);
            }

            names.insert(name.clone());
            columns.push(column.take_optional(indices.right())?.rename(name));
        }

        log::trace!(
            "gathered {} rows into {} columns",
            indices.len(),
            columns.len()
        );

        Table::new(columns)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use tabula_physical::join::JoinIndices;

    use super::ResultBuilder;
    use crate::{Column, DataType, Table, Value};

    fn tables() -> (Table, Table) {
        let left = Table::new(vec![
            Column::from_values("id", vec![1i64, 2]),
            Column::from_values("value", vec![10i32, 20]),
            Column::from_values("value_right", vec![true, false]),
        ])
        .unwrap();
        let right = Table::new(vec![
            Column::from_values("id", vec![2i64, 3]),
            Column::from_values("value", vec!["b".to_owned(), "c".to_owned()]),
        ])
        .unwrap();

        (left, right)
    }

    #[test]
    fn suffix_is_repeated_until_unique() {
        let (left, right) = tables();
        let indices = JoinIndices::from_pairs([(1, 0)]);

        let table = ResultBuilder::new(&left, &right, "_right")
            .build(&indices)
            .unwrap();

        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["id", "value", "value_right", "id_right", "value_right_right"]
        );
        assert_eq!(table.get(0, "value_right_right"), Some(Value::from("b")));
    }

    #[test]
    fn skipped_and_padded() {
        let (left, right) = tables();
        let mut indices = JoinIndices::new();
        indices.push(Some(0), None);
        indices.push(None, Some(1));

        let table = ResultBuilder::new(&left, &right, "_r")
            .skip_right(["id"])
            .build(&indices)
            .unwrap();

        assert_eq!(table.width(), 4);
        assert!(!table.has_column("id_r"));
        assert_eq!(table.get(0, "value_r"), Some(Value::Null));
        assert_eq!(table.get(1, "id"), Some(Value::Null));
        assert_eq!(table.get(1, "value_r"), Some(Value::from("c")));
    }

    #[test]
    fn empty_result_keeps_schema() {
        let (left, right) = tables();

        let table = ResultBuilder::new(&left, &right, "_right")
            .build(&JoinIndices::new())
            .unwrap();

        assert_eq!(table.height(), 0);
        assert_eq!(table.width(), 5);
        assert_eq!(table.schema()[4].1, DataType::Utf8);
    }

    #[test]
    fn empty_suffix_falls_back_to_default() {
        let (left, right) = tables();

        let table = ResultBuilder::new(&left, &right, "")
            .build(&JoinIndices::new())
            .unwrap();

        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["id", "value", "value_right", "id_right", "value_right_right"]
        );
    }
}
