//! `PostgreSQL` backend: connection setup over `tokio-postgres`, parameter
//! binding for [`RowValues`], and result set construction.

use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use tokio::task::JoinHandle;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_postgres::{Client, NoTls};
use tokio_util::bytes;
use tracing::warn;

use crate::config::ConnectionConfig;
use crate::error::SqlHelperError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// A live Postgres session: the client plus the background task driving the
/// connection. Dropping or aborting the task closes the session.
pub struct PgSession {
    pub client: Client,
    task: JoinHandle<()>,
}

impl PgSession {
    /// Stop the background connection task, closing the session.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// Connect using the config fields, or parse the raw connection-string
/// override when one is set. The charset is applied afterwards as a session
/// directive (`SET NAMES`).
pub async fn connect(config: &ConnectionConfig) -> Result<PgSession, SqlHelperError> {
    let dsn = config.dsn();
    let mut pg_config = if is_template_form(&dsn) {
        let mut c = tokio_postgres::Config::new();
        apply_dsn_pairs(&mut c, &dsn)?;
        c
    } else {
        // A raw override in tokio-postgres's native key=value format.
        dsn.parse::<tokio_postgres::Config>()
            .map_err(|e| SqlHelperError::ConfigError(format!("invalid connection string: {e}")))?
    };

    if pg_config.get_hosts().is_empty() {
        pg_config.host(config.host_name());
    }
    if pg_config.get_ports().is_empty() {
        pg_config.port(parse_port(config.port_str())?);
    }
    if pg_config.get_dbname().is_none() {
        pg_config.dbname(config.database_name());
    }
    if pg_config.get_user().is_none() && !config.user_name().is_empty() {
        pg_config.user(config.user_name());
    }
    if pg_config.get_password().is_none() && !config.password().is_empty() {
        pg_config.password(config.password());
    }

    let (client, connection) = pg_config.connect(NoTls).await?;
    let task = tokio::spawn(async move {
        if let Err(e) = connection.await {
            warn!(error = %e, "postgres connection task ended with error");
        }
    });

    Ok(PgSession { client, task })
}

/// Whether the connection string is the helper's semicolon template, as
/// opposed to a raw override in tokio-postgres's native key=value or URL
/// form.
fn is_template_form(dsn: &str) -> bool {
    dsn.contains(';') || (dsn.starts_with("postgres:") && !dsn.starts_with("postgres://"))
}

fn parse_port(port: &str) -> Result<u16, SqlHelperError> {
    port.parse()
        .map_err(|_| SqlHelperError::ConfigError(format!("invalid port: {port}")))
}

/// Fill a `tokio_postgres::Config` from the helper's semicolon-separated
/// template form (`postgres:host=..;port=..;dbname=..;charset=..`). The
/// charset key is ignored here; it travels as a session directive instead.
fn apply_dsn_pairs(
    pg_config: &mut tokio_postgres::Config,
    dsn: &str,
) -> Result<(), SqlHelperError> {
    let body = dsn.strip_prefix("postgres:").unwrap_or(dsn);
    for pair in body.split(';').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            SqlHelperError::ConfigError(format!("malformed connection string near '{pair}'"))
        })?;
        match key.trim() {
            "host" => {
                pg_config.host(value);
            }
            "port" => {
                pg_config.port(parse_port(value)?);
            }
            "dbname" => {
                pg_config.dbname(value);
            }
            "user" => {
                pg_config.user(value);
            }
            "password" | "pass" => {
                pg_config.password(value);
            }
            // Charset is applied post-connect via SET NAMES.
            "charset" => {}
            other => {
                return Err(SqlHelperError::ConfigError(format!(
                    "unrecognized connection string option '{other}'"
                )));
            }
        }
    }
    Ok(())
}

/// Apply the session charset directive; `SET NAMES` is the Postgres alias
/// for `SET client_encoding`.
pub async fn apply_charset(client: &Client, charset: &str) -> Result<(), SqlHelperError> {
    let stmt = format!("SET NAMES '{}'", charset.replace('\'', "''"));
    client.batch_execute(&stmt).await?;
    Ok(())
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            RowValues::Int(i) => (*i).to_sql(ty, out),
            RowValues::Float(f) => (*f).to_sql(ty, out),
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Bool(b) => (*b).to_sql(ty, out),
            RowValues::Timestamp(dt) => dt.to_sql(ty, out),
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jsval) => jsval.to_sql(ty, out),
            RowValues::Blob(b) => b.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::CHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

fn param_refs(params: &[RowValues]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

/// Extract a `RowValues` from a Postgres row at the given index.
///
/// # Errors
/// Returns `SqlHelperError::PostgresError` if the column cannot be read.
pub fn extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<RowValues, SqlHelperError> {
    let type_name = row.columns()[idx].type_().name();
    match type_name {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" | "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "json" | "jsonb" => {
            let val: Option<JsonValue> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        // text, varchar, char, and anything else representable as a string.
        _ => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}

/// Build a result set from already-fetched rows.
///
/// # Errors
/// Returns `SqlHelperError::PostgresError` if any value cannot be read.
pub fn build_result_set(rows: &[tokio_postgres::Row]) -> Result<ResultSet, SqlHelperError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        let cols: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        result_set.set_column_names(Arc::new(cols));
    }

    for row in rows {
        let col_count = row.columns().len();
        let mut values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// Execute a read statement with positional parameters.
pub async fn execute_select(
    client: &Client,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlHelperError> {
    let refs = param_refs(params);
    let rows = client.query(sql, &refs).await?;
    build_result_set(&rows)
}

/// Execute a write statement, returning the affected-row count.
pub async fn execute_dml(
    client: &Client,
    sql: &str,
    params: &[RowValues],
) -> Result<usize, SqlHelperError> {
    let refs = param_refs(params);
    let affected = client.execute(sql, &refs).await?;
    Ok(usize::try_from(affected).unwrap_or(usize::MAX))
}

/// Execute a batch of statements with no parameters.
pub async fn execute_batch(client: &Client, sql: &str) -> Result<(), SqlHelperError> {
    client.batch_execute(sql).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_postgres::config::Host;

    #[test]
    fn template_pairs_populate_the_driver_config() {
        let mut config = tokio_postgres::Config::new();
        apply_dsn_pairs(
            &mut config,
            "postgres:host=db.internal;port=5433;dbname=app;charset=utf8",
        )
        .unwrap();
        assert_eq!(config.get_hosts(), &[Host::Tcp("db.internal".to_string())]);
        assert_eq!(config.get_ports(), &[5433]);
        assert_eq!(config.get_dbname(), Some("app"));
        // The charset key never reaches the driver config; it travels as a
        // session directive after connect.
    }

    #[test]
    fn user_and_both_password_spellings_are_recognized() {
        let mut config = tokio_postgres::Config::new();
        apply_dsn_pairs(&mut config, "host=x;user=svc;pass=secret").unwrap();
        assert_eq!(config.get_user(), Some("svc"));
        assert_eq!(config.get_password(), Some(&b"secret"[..]));

        let mut config = tokio_postgres::Config::new();
        apply_dsn_pairs(&mut config, "host=x;user=svc;password=secret").unwrap();
        assert_eq!(config.get_password(), Some(&b"secret"[..]));
    }

    #[test]
    fn malformed_pair_is_a_config_error() {
        let mut config = tokio_postgres::Config::new();
        let err = apply_dsn_pairs(&mut config, "postgres:host").unwrap_err();
        assert!(matches!(err, SqlHelperError::ConfigError(_)));
        assert!(err.to_string().contains("malformed connection string"));
    }

    #[test]
    fn unrecognized_option_is_rejected() {
        let mut config = tokio_postgres::Config::new();
        let err = apply_dsn_pairs(&mut config, "host=x;sslmode=disable").unwrap_err();
        assert!(err.to_string().contains("unrecognized connection string option"));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut config = tokio_postgres::Config::new();
        let err = apply_dsn_pairs(&mut config, "host=x;port=abc").unwrap_err();
        assert!(matches!(err, SqlHelperError::ConfigError(_)));
        assert!(err.to_string().contains("invalid port"));
    }

    #[test]
    fn template_detection_routes_overrides() {
        // Derived template and semicolon-separated overrides.
        assert!(is_template_form(
            "postgres:host=localhost;port=5432;dbname=test;charset=utf8"
        ));
        assert!(is_template_form("host=x;port=1"));
        assert!(is_template_form("postgres:host=x"));
        // Native tokio-postgres forms go to the driver's own parser.
        assert!(!is_template_form("postgres://user@db.internal/app"));
        assert!(!is_template_form("host=localhost user=postgres"));
    }
}
