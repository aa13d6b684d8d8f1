use crate::error::SqlHelperError;
use crate::sql::{build_where, escape_column_name, escape_table_name};
use crate::types::RowValues;

/// Sort direction for an `ORDER BY` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    fn token(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Options for [`fetch`](crate::connection::DbConnection::fetch).
///
/// Defaults match the historical contract: all columns, no conditions,
/// `ORDER BY "id" ASC`, `LIMIT 1000`, no offset, no joins. A limit of zero
/// omits the `LIMIT` clause entirely.
///
/// ```rust
/// use sql_helper::prelude::*;
///
/// let options = Fetch::new()
///     .columns(&["id", "name"])
///     .conditions(&[("age >=", Some(RowValues::Int(18)))])
///     .limit(50);
/// # let _ = options;
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Fetch<'a> {
    columns: Vec<&'a str>,
    conditions: &'a [(&'a str, Option<RowValues>)],
    limit: i64,
    offset: i64,
    order: Vec<(&'a str, SortOrder)>,
    joins: Vec<&'a str>,
}

impl Default for Fetch<'_> {
    fn default() -> Self {
        Self {
            columns: vec!["*"],
            conditions: &[],
            limit: 1000,
            offset: 0,
            order: vec![("id", SortOrder::Asc)],
            joins: Vec::new(),
        }
    }
}

impl<'a> Fetch<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to select; an empty list falls back to the wildcard.
    pub fn columns(mut self, columns: &'a [&'a str]) -> Self {
        self.columns = columns.to_vec();
        self
    }

    /// Ordered where conditions (see the where-clause mini-language).
    pub fn conditions(mut self, conditions: &'a [(&'a str, Option<RowValues>)]) -> Self {
        self.conditions = conditions;
        self
    }

    /// Maximum row count; zero omits the `LIMIT` clause.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Replace the `ORDER BY` keys; an empty list omits the clause.
    pub fn order(mut self, order: &'a [(&'a str, SortOrder)]) -> Self {
        self.order = order.to_vec();
        self
    }

    /// Additional table expressions appended comma-separated after the
    /// primary table (a plain cross-style join list).
    pub fn joins(mut self, joins: &'a [&'a str]) -> Self {
        self.joins = joins.to_vec();
        self
    }
}

/// Build a `SELECT` statement from fetch options.
///
/// # Errors
/// `SqlHelperError::InvalidTableName` for an empty table name,
/// `SqlHelperError::InvalidLimit`/`InvalidOffset` for negative bounds.
pub fn build_fetch(
    table: &str,
    options: &Fetch<'_>,
) -> Result<(String, Vec<RowValues>), SqlHelperError> {
    if table.trim().is_empty() {
        return Err(SqlHelperError::InvalidTableName);
    }
    if options.limit < 0 {
        return Err(SqlHelperError::InvalidLimit);
    }
    if options.offset < 0 {
        return Err(SqlHelperError::InvalidOffset);
    }

    let columns = if options.columns.is_empty() {
        "*".to_string()
    } else {
        options
            .columns
            .iter()
            .map(|col| escape_column_name(col))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut sql = format!("SELECT {} FROM {}", columns, escape_table_name(table));

    if !options.joins.is_empty() {
        let joins = options
            .joins
            .iter()
            .map(|join| escape_table_name(join))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(", ");
        sql.push_str(&joins);
    }

    let mut values = Vec::new();
    if let Some((where_sql, where_values)) = build_where(options.conditions) {
        sql.push(' ');
        sql.push_str(&where_sql);
        values = where_values;
    }

    if !options.order.is_empty() {
        let order = options
            .order
            .iter()
            .map(|(col, dir)| format!("{} {}", escape_column_name(col), dir.token()))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(" ORDER BY ");
        sql.push_str(&order);
    }

    // LIMIT n OFFSET m runs on both shipped drivers, unlike the
    // MySQL-only `LIMIT offset, limit` form.
    if options.limit > 0 {
        sql.push_str(&format!(" LIMIT {}", options.limit));
        if options.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", options.offset));
        }
    }

    Ok((sql, values))
}
