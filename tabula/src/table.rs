//! This module defines [Table].

use hashbrown::HashSet;

use tabula_physical::{
    columnar::Column,
    datatypes::{DataType, Value},
};

use crate::error::Error;

/// Ordered collection of uniquely named columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Create a new [Table] from the given columns.
    ///
    /// # Errors
    /// Returns an error if two columns share a name or differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self, Error> {
        let height = columns.first().map_or(0, Column::len);
        let mut names = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !names.insert(column.name()) {
                return Err(Error::DuplicateColumn(column.name().to_owned()));
            }

            if column.len() != height {
                return Err(Error::HeightMismatch {
                    column: column.name().to_owned(),
                    expected: height,
                    found: column.len(),
                });
            }
        }
        drop(names);

        Ok(Self { columns, height })
    }

    /// Create a [Table] without any columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column with the given name, if there is one.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Returns whether a column with the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Names of all columns in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Name and type of every column.
    pub fn schema(&self) -> Vec<(String, DataType)> {
        self.columns
            .iter()
            .map(|column| (column.name().to_owned(), column.data_type()))
            .collect()
    }

    /// Value of the given column at the given row.
    ///
    /// Returns `None` if there is no such column.
    pub fn get(&self, row: usize, name: &str) -> Option<Value> {
        self.column(name).map(|column| column.get(row))
    }

    /// New table containing the given rows in the given order.
    ///
    /// # Errors
    /// Returns an error if a row is out of bounds.
    pub fn take(&self, rows: &[usize]) -> Result<Self, Error> {
        let columns = self
            .columns
            .iter()
            .map(|column| column.take(rows))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            height: rows.len(),
        })
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::Table;
    use crate::{error::Error, Column, DataType, Value};

    #[test]
    fn construction_is_validated() {
        let a = Column::from_values("a", vec![1i64, 2]);
        let b = Column::from_values("b", vec!["x".to_owned()]);

        assert!(matches!(
            Table::new(vec![a.clone(), a.clone()]),
            Err(Error::DuplicateColumn(name)) if name == "a"
        ));
        assert!(matches!(
            Table::new(vec![a, b]),
            Err(Error::HeightMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));
        assert_eq!(Table::empty().height(), 0);
        assert_eq!(Table::empty().width(), 0);
    }

    #[test]
    fn accessors() {
        let table = Table::new(vec![
            Column::from_values("id", vec![1i32, 2, 3]),
            Column::from_options("name", vec![Some("a".to_owned()), None, Some("c".to_owned())]),
        ])
        .unwrap();

        assert_eq!(table.height(), 3);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(
            table.schema(),
            vec![
                ("id".to_owned(), DataType::Int32),
                ("name".to_owned(), DataType::Utf8)
            ]
        );
        assert_eq!(table.get(1, "name"), Some(Value::Null));
        assert_eq!(table.get(0, "missing"), None);

        let taken = table.take(&[2, 0]).unwrap();
        assert_eq!(taken.height(), 2);
        assert_eq!(taken.get(0, "id"), Some(Value::Int32(3)));
        assert!(table.take(&[3]).is_err());
    }
}
