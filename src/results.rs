use std::sync::Arc;

use crate::types::RowValues;

/// A single row from a query result, with access by column name or index.
///
/// Column names are shared across all rows of a result set.
#[derive(Debug, Clone)]
pub struct Row {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValues>,
}

impl Row {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// The column names, in result order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Get the index of a column by name.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value by column name, or `None` if the column is absent.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column index, or `None` if out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// The values, in column order.
    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}

/// Ordered rows returned by a read statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<Row>,
    column_names: Option<Arc<Vec<String>>>,
}

impl ResultSet {
    /// Create a result set with preallocated row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            column_names: None,
        }
    }

    /// Set the column names shared by every row of this result set.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_names = Some(column_names);
    }

    /// The shared column names, if any row metadata has been recorded.
    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row built from raw values and the shared column names.
    pub fn add_row_values(&mut self, values: Vec<RowValues>) {
        let names = self
            .column_names
            .get_or_insert_with(|| Arc::new(Vec::new()))
            .clone();
        self.rows.push(Row::new(names, values));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of [`exec`](crate::connection::DbConnection::exec).
///
/// Read statements return their rows; write statements return the constant
/// success marker `Done` instead of an affected-row count. This mirrors the
/// legacy contract: callers that need a count after a read can consult
/// [`result_count`](crate::connection::DbConnection::result_count), which
/// reflects the last read statement only.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// Ordered rows from a read statement (empty on no match).
    Rows(ResultSet),
    /// Constant success marker for a write statement.
    Done,
}

impl QueryOutcome {
    /// The rows of a read outcome, or `None` for a write.
    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            QueryOutcome::Rows(rs) => Some(rs),
            QueryOutcome::Done => None,
        }
    }

    /// Consume the outcome, returning the rows of a read and an empty result
    /// set for a write.
    #[must_use]
    pub fn into_rows(self) -> ResultSet {
        match self {
            QueryOutcome::Rows(rs) => rs,
            QueryOutcome::Done => ResultSet::default(),
        }
    }
}
