//! Driver connection dispatch.
//!
//! [`DriverConnection`] wraps whichever backend is live so the executor,
//! transaction controller, and query builder can run statements without
//! branching on driver types themselves.

use async_trait::async_trait;

use crate::error::SqlHelperError;
use crate::results::ResultSet;
use crate::types::{DriverKind, RowValues};

#[cfg(feature = "postgres")]
use crate::postgres;
#[cfg(feature = "sqlite")]
use crate::sqlite;

/// One live driver connection.
pub enum DriverConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Connection),
    #[cfg(feature = "postgres")]
    Postgres(postgres::PgSession),
}

impl std::fmt::Debug for DriverConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(_) => f.write_str("DriverConnection::Sqlite"),
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(_) => f.write_str("DriverConnection::Postgres"),
        }
    }
}

impl DriverConnection {
    /// Which driver family this connection belongs to.
    #[must_use]
    pub fn kind(&self) -> DriverKind {
        match self {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(_) => DriverKind::Sqlite,
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(_) => DriverKind::Postgres,
        }
    }

    /// Tear down the connection. SQLite closes on drop; Postgres also stops
    /// its background connection task.
    pub fn release(self) {
        match self {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(_) => {}
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(session) => session.shutdown(),
        }
    }
}

/// Uniform statement execution over the driver backends.
#[async_trait]
pub trait DatabaseExecutor {
    /// Execute a single read statement and return the result set.
    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlHelperError>;

    /// Execute a single write statement and return the affected-row count.
    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlHelperError>;

    /// Execute a batch of statements with no parameters.
    async fn execute_batch(&mut self, sql: &str) -> Result<(), SqlHelperError>;
}

#[async_trait]
impl DatabaseExecutor for DriverConnection {
    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlHelperError> {
        match self {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => sqlite::execute_select(conn, sql, params),
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(session) => {
                postgres::execute_select(&session.client, sql, params).await
            }
        }
    }

    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, SqlHelperError> {
        match self {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => sqlite::execute_dml(conn, sql, params),
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(session) => {
                postgres::execute_dml(&session.client, sql, params).await
            }
        }
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), SqlHelperError> {
        match self {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => sqlite::execute_batch(conn, sql),
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(session) => {
                postgres::execute_batch(&session.client, sql).await
            }
        }
    }
}
