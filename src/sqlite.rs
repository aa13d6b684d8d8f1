//! `SQLite` backend: connection opening, parameter conversion, and result
//! set construction over `rusqlite`.

use std::fmt::Write as _;
use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};

use crate::error::SqlHelperError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Open a connection from a path-style connection string. Accepts either a
/// bare path (the `base` config field) or the full `sqlite://path` form;
/// `:memory:` opens an in-memory database.
pub fn open(dsn: &str) -> Result<Connection, SqlHelperError> {
    let path = dsn.strip_prefix("sqlite://").unwrap_or(dsn);
    if path.is_empty() {
        return Err(SqlHelperError::ConfigError(
            "sqlite connection string has no path".to_string(),
        ));
    }
    Ok(Connection::open(path)?)
}

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => {
            let mut out = String::with_capacity(32);
            // Infallible for String.
            let _ = write!(out, "{}", dt.format("%F %T%.f"));
            Value::Text(out)
        }
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

fn convert_params(params: &[RowValues]) -> Vec<Value> {
    params.iter().map(row_value_to_sqlite_value).collect()
}

/// Extract a `RowValues` from a `SQLite` row at the given index.
///
/// # Errors
/// Returns `SqlHelperError::SqliteError` if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlHelperError> {
    let value: Value = row.get(idx)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Run a prepared statement and collect every row into a [`ResultSet`].
///
/// # Errors
/// Returns `SqlHelperError::SqliteError` if execution or row conversion
/// fails.
pub fn build_result_set(
    stmt: &mut rusqlite::Statement,
    params: &[Value],
) -> Result<ResultSet, SqlHelperError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows = stmt.query(&param_refs[..])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// Execute a read statement with positional parameters.
pub fn execute_select(
    conn: &Connection,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlHelperError> {
    let values = convert_params(params);
    let mut stmt = conn.prepare(sql)?;
    build_result_set(&mut stmt, &values)
}

/// Execute a write statement, returning the affected-row count.
pub fn execute_dml(
    conn: &Connection,
    sql: &str,
    params: &[RowValues],
) -> Result<usize, SqlHelperError> {
    let values = convert_params(params);
    let refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
    Ok(conn.execute(sql, &refs[..])?)
}

/// Execute a batch of statements with no parameters (DDL scripts and the
/// transaction-control statements).
pub fn execute_batch(conn: &Connection, sql: &str) -> Result<(), SqlHelperError> {
    Ok(conn.execute_batch(sql)?)
}

/// The rowid assigned by the most recent successful insert.
#[must_use]
pub fn last_insert_id(conn: &Connection) -> i64 {
    conn.last_insert_rowid()
}
