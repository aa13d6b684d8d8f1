//! Minimal SQL generation for insert/update/delete/fetch.
//!
//! The `build_*` functions are pure (table name in, SQL text and ordered
//! bound values out) so generation is testable without a connection; the
//! [`DbConnection`] methods execute what they build. Data and condition
//! mappings are slices of pairs, so binding order is always the caller's
//! iteration order.

mod select;

pub use select::{Fetch, SortOrder, build_fetch};

use crate::connection::DbConnection;
use crate::error::SqlHelperError;
use crate::results::{QueryOutcome, ResultSet};
use crate::sql::{build_where, escape_column_name, escape_table_name};
use crate::types::RowValues;

fn validated_table(table: &str) -> Result<String, SqlHelperError> {
    if table.trim().is_empty() {
        return Err(SqlHelperError::InvalidTableName);
    }
    Ok(escape_table_name(table))
}

/// Build an `INSERT` statement: one column, one placeholder, and one bound
/// value per data entry, in mapping order.
///
/// # Errors
/// `SqlHelperError::InvalidTableName` for an empty table name,
/// `SqlHelperError::EmptyData` for an empty mapping.
pub fn build_insert(
    table: &str,
    data: &[(&str, RowValues)],
) -> Result<(String, Vec<RowValues>), SqlHelperError> {
    let table = validated_table(table)?;
    if data.is_empty() {
        return Err(SqlHelperError::EmptyData);
    }

    let columns: Vec<String> = data.iter().map(|(col, _)| escape_column_name(col)).collect();
    let values: Vec<RowValues> = data.iter().map(|(_, val)| val.clone()).collect();
    let placeholders = vec!["?"; values.len()];

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );

    Ok((sql, values))
}

/// Build an `UPDATE` statement. Bound values are the data values in mapping
/// order, followed by the non-null where values in mapping order.
///
/// # Errors
/// `SqlHelperError::InvalidTableName` for an empty table name,
/// `SqlHelperError::EmptyData` for an empty data mapping.
pub fn build_update(
    table: &str,
    data: &[(&str, RowValues)],
    conditions: &[(&str, Option<RowValues>)],
) -> Result<(String, Vec<RowValues>), SqlHelperError> {
    let table = validated_table(table)?;
    if data.is_empty() {
        return Err(SqlHelperError::EmptyData);
    }

    let assignments: Vec<String> = data
        .iter()
        .map(|(col, _)| format!("{} = ?", escape_column_name(col)))
        .collect();
    let mut values: Vec<RowValues> = data.iter().map(|(_, val)| val.clone()).collect();

    let mut sql = format!("UPDATE {} SET {}", table, assignments.join(", "));

    if let Some((where_sql, where_values)) = build_where(conditions) {
        sql.push(' ');
        sql.push_str(&where_sql);
        values.extend(where_values);
    }

    Ok((sql, values))
}

/// Build a `DELETE` statement. Bound values are the non-null where values
/// in mapping order; with no conditions the statement deletes every row.
///
/// # Errors
/// `SqlHelperError::InvalidTableName` for an empty table name.
pub fn build_delete(
    table: &str,
    conditions: &[(&str, Option<RowValues>)],
) -> Result<(String, Vec<RowValues>), SqlHelperError> {
    let table = validated_table(table)?;
    let mut sql = format!("DELETE FROM {table}");
    let mut values = Vec::new();

    if let Some((where_sql, where_values)) = build_where(conditions) {
        sql.push(' ');
        sql.push_str(&where_sql);
        values = where_values;
    }

    Ok((sql, values))
}

impl DbConnection {
    /// Insert one record. See [`build_insert`] for the generated SQL.
    ///
    /// # Errors
    /// Usage errors from generation, plus anything
    /// [`exec`](Self::exec) reports.
    pub async fn insert(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
    ) -> Result<QueryOutcome, SqlHelperError> {
        let (sql, values) = build_insert(table, data)?;
        self.exec(&sql, &values).await
    }

    /// Update matching records. See [`build_update`] for the generated SQL
    /// and binding order.
    ///
    /// # Errors
    /// Usage errors from generation, plus anything
    /// [`exec`](Self::exec) reports.
    pub async fn update(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
        conditions: &[(&str, Option<RowValues>)],
    ) -> Result<QueryOutcome, SqlHelperError> {
        let (sql, values) = build_update(table, data, conditions)?;
        self.exec(&sql, &values).await
    }

    /// Delete matching records; with no conditions, all of them.
    ///
    /// # Errors
    /// Usage errors from generation, plus anything
    /// [`exec`](Self::exec) reports.
    pub async fn delete(
        &mut self,
        table: &str,
        conditions: &[(&str, Option<RowValues>)],
    ) -> Result<QueryOutcome, SqlHelperError> {
        let (sql, values) = build_delete(table, conditions)?;
        self.exec(&sql, &values).await
    }

    /// Fetch a recordset. Options default to `SELECT * ... ORDER BY "id" ASC
    /// LIMIT 1000`; see [`Fetch`].
    ///
    /// # Errors
    /// Usage errors from generation (invalid table, negative limit/offset),
    /// plus anything [`exec`](Self::exec) reports.
    pub async fn fetch(
        &mut self,
        table: &str,
        options: Fetch<'_>,
    ) -> Result<ResultSet, SqlHelperError> {
        let (sql, values) = build_fetch(table, &options)?;
        Ok(self.exec(&sql, &values).await?.into_rows())
    }
}
