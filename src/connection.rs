use tracing::debug;

use crate::config::ConnectionConfig;
use crate::driver::{DatabaseExecutor, DriverConnection};
use crate::error::SqlHelperError;
use crate::transaction::TxState;
use crate::types::DriverKind;

#[cfg(feature = "postgres")]
use crate::postgres;
#[cfg(feature = "sqlite")]
use crate::sqlite;

/// A database connection with reference-counted connect/disconnect and
/// emulated nested transactions.
///
/// One instance owns at most one live driver connection. `connect` calls
/// beyond the first only increment an attempt counter, so chained callers
/// can bracket their work with `connect`/`disconnect` pairs without tearing
/// down a connection someone further up the stack still uses. Every
/// operation is a blocking round trip; the type is not meant to be shared
/// across tasks without external synchronization.
///
/// ```rust,no_run
/// use sql_helper::prelude::*;
///
/// # async fn demo() -> Result<(), SqlHelperError> {
/// let config = ConnectionConfig::new(DriverKind::Sqlite).database(":memory:");
/// let mut db = DbConnection::new(config);
/// db.connect().await?;
/// db.insert("users", &[("name", RowValues::Text("bob".into()))]).await?;
/// db.disconnect();
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct DbConnection {
    config: ConnectionConfig,
    live: Option<DriverConnection>,
    /// How many connect calls share the live connection.
    attempts: u32,
    pub(crate) tx: TxState,
    pub(crate) last_result_count: usize,
}

impl DbConnection {
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            live: None,
            attempts: 0,
            tx: TxState::default(),
            last_result_count: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The driver family this connection targets.
    #[must_use]
    pub fn driver(&self) -> DriverKind {
        self.config.driver_kind()
    }

    /// Number of connect calls currently sharing the live connection.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.live.is_some()
    }

    /// Current transaction nesting depth (0 when idle).
    #[must_use]
    pub fn transaction_depth(&self) -> u32 {
        self.tx.depth()
    }

    /// Row count of the last read statement. Writes reset it to zero; the
    /// helper deliberately does not report affected-row counts here.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.last_result_count
    }

    /// Open the connection, or join an already-open one.
    ///
    /// When a live connection exists this only increments the attempt
    /// counter. Otherwise the connection string is derived from the config
    /// (unless a raw override was set), the driver connection is opened,
    /// and for network drivers the charset session directive is applied.
    ///
    /// # Errors
    /// Returns `SqlHelperError::ConfigError` for an unusable connection
    /// string, or the wrapped driver error when the open fails.
    pub async fn connect(&mut self) -> Result<&mut Self, SqlHelperError> {
        if self.live.is_some() {
            self.attempts += 1;
            debug!(attempts = self.attempts, "joined existing connection");
            return Ok(self);
        }

        let conn = match self.config.driver_kind() {
            #[cfg(feature = "sqlite")]
            DriverKind::Sqlite => DriverConnection::Sqlite(sqlite::open(&self.config.dsn())?),
            #[cfg(feature = "postgres")]
            DriverKind::Postgres => {
                let session = postgres::connect(&self.config).await?;
                postgres::apply_charset(&session.client, self.config.charset_name()).await?;
                DriverConnection::Postgres(session)
            }
        };

        debug!(dsn = %self.config.dsn(), "connected");
        self.live = Some(conn);
        self.attempts += 1;
        Ok(self)
    }

    /// Leave the connection, releasing it on the last disconnect.
    ///
    /// Decrements the attempt counter; the underlying connection is released
    /// exactly when the counter transitions from 1 to 0 (conventional
    /// reference counting). Calling this with no prior `connect` is a no-op.
    pub fn disconnect(&mut self) -> &mut Self {
        if self.attempts > 1 {
            self.attempts -= 1;
            debug!(attempts = self.attempts, "left shared connection");
            return self;
        }

        self.attempts = 0;
        if let Some(conn) = self.live.take() {
            conn.release();
            // Any open transaction died with the connection; a stale depth
            // would swallow the next real BEGIN.
            self.tx = TxState::default();
            debug!("connection released");
        }
        self
    }

    /// Change the charset. If already connected on a network driver, the
    /// session directive is re-applied immediately.
    ///
    /// # Errors
    /// Returns the wrapped driver error if re-applying the directive fails.
    pub async fn set_charset(&mut self, charset: &str) -> Result<&mut Self, SqlHelperError> {
        self.config.set_charset_value(charset);

        #[cfg(feature = "postgres")]
        if let Some(DriverConnection::Postgres(session)) = &self.live {
            postgres::apply_charset(&session.client, self.config.charset_name()).await?;
        }

        Ok(self)
    }

    /// Begin a transaction, or deepen an already-active one.
    ///
    /// Only the outermost `begin` reaches a driver without nested support;
    /// nesting-capable drivers get a savepoint named for the new depth.
    ///
    /// # Errors
    /// Returns `SqlHelperError::MissingConnection` when not connected, or
    /// the wrapped driver error.
    pub async fn begin(&mut self) -> Result<(), SqlHelperError> {
        let nested = self.driver().supports_nested_transactions();
        if self.live.is_none() {
            return Err(SqlHelperError::MissingConnection);
        }
        let statement = self.tx.begin(nested);
        self.forward_tx(statement).await
    }

    /// Commit one transaction level. Committing at depth zero is a no-op.
    ///
    /// # Errors
    /// Returns `SqlHelperError::MissingConnection` when a real commit must
    /// be forwarded without a connection, or the wrapped driver error.
    pub async fn commit(&mut self) -> Result<(), SqlHelperError> {
        let nested = self.driver().supports_nested_transactions();
        let statement = self.tx.commit(nested);
        self.forward_tx(statement).await
    }

    /// Roll back one transaction level. Rolling back at depth zero is a
    /// no-op; at inner depths on nesting-capable drivers this rolls back to
    /// the savepoint addressing the current depth.
    ///
    /// # Errors
    /// Returns `SqlHelperError::MissingConnection` when a real rollback must
    /// be forwarded without a connection, or the wrapped driver error.
    pub async fn rollback(&mut self) -> Result<(), SqlHelperError> {
        let nested = self.driver().supports_nested_transactions();
        let statement = self.tx.rollback(nested);
        self.forward_tx(statement).await
    }

    async fn forward_tx(
        &mut self,
        statement: Option<crate::transaction::TxStatement>,
    ) -> Result<(), SqlHelperError> {
        let Some(statement) = statement else {
            debug!(depth = self.tx.depth(), "transaction transition recorded");
            return Ok(());
        };
        let conn = self.live_mut()?;
        conn.execute_batch(&statement.sql()).await?;
        debug!(depth = self.tx.depth(), sql = %statement.sql(), "transaction statement forwarded");
        Ok(())
    }

    /// Execute a batch of statements with no bound values (DDL scripts).
    ///
    /// # Errors
    /// Returns `SqlHelperError::MissingConnection` when not connected, or
    /// the wrapped driver error.
    pub async fn exec_batch(&mut self, sql: &str) -> Result<(), SqlHelperError> {
        if sql.is_empty() {
            return Err(SqlHelperError::EmptyQuery);
        }
        let conn = self.live_mut()?;
        conn.execute_batch(sql).await
    }

    /// The id generated by the most recent insert.
    ///
    /// # Errors
    /// Returns `SqlHelperError::MissingConnection` when not connected, and
    /// `SqlHelperError::Unimplemented` on drivers without a session-level
    /// last-insert id (Postgres; use `RETURNING` there instead).
    pub fn inserted_id(&self) -> Result<i64, SqlHelperError> {
        match self.live.as_ref().ok_or(SqlHelperError::MissingConnection)? {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => Ok(sqlite::last_insert_id(conn)),
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(_) => Err(SqlHelperError::Unimplemented(
                "last-insert id is not exposed by Postgres; use a RETURNING clause".to_string(),
            )),
        }
    }

    /// The live driver connection, for driver-specific work the helper does
    /// not wrap. `None` when disconnected.
    #[must_use]
    pub fn connection(&self) -> Option<&DriverConnection> {
        self.live.as_ref()
    }

    /// Mutable access to the live driver connection.
    #[must_use]
    pub fn connection_mut(&mut self) -> Option<&mut DriverConnection> {
        self.live.as_mut()
    }

    pub(crate) fn live_mut(&mut self) -> Result<&mut DriverConnection, SqlHelperError> {
        self.live.as_mut().ok_or(SqlHelperError::MissingConnection)
    }
}
