// fairy-core/src/domain/table.rs

/// An immutable, fully materialized table: named columns in header order and
/// rows in input order. Every cell is a string; blank cells are `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, padding short rows with `""` and dropping cells beyond
    /// the header width so that every row has exactly `columns.len()` cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Convenience constructor for tests and in-memory callers.
    pub fn from_rows<C, R, S>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        Self::new(
            columns.into_iter().map(Into::into).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of the first column carrying `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Cells of one column in row order, or `None` when the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| r[idx].as_str()))
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// A cell counts as blank when nothing but whitespace remains after trimming.
pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_rows_are_padded() {
        let t = Table::from_rows(["a", "b", "c"], vec![vec!["1"], vec!["1", "2", "3", "4"]]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.cell(0, "c"), Some(""));
        assert_eq!(t.rows().nth(1).unwrap().len(), 3);
    }

    #[test]
    fn test_column_lookup() {
        let t = Table::from_rows(["id", "name"], vec![vec!["1", "x"], vec!["2", "y"]]);
        let names: Vec<&str> = t.column("name").unwrap().collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(t.column("missing").is_none());
        assert!(t.has_column("id"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank(" x "));
    }
}
