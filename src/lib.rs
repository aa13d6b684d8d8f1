//! Lightweight database access helper over `rusqlite` and `tokio-postgres`.
//!
//! One [`DbConnection`](connection::DbConnection) owns one driver
//! connection, shared across chained callers through reference-counted
//! `connect`/`disconnect` pairs. On top of it sit emulated nested
//! transactions, a raw statement executor with read/write dispatch, and a
//! minimal insert/update/delete/fetch builder with identifier escaping and
//! a where-clause mini-language.
//!
//! ```rust,no_run
//! use sql_helper::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlHelperError> {
//! let config = ConnectionConfig::new(DriverKind::Sqlite).database("app.db");
//! let mut db = DbConnection::new(config);
//! db.connect().await?;
//!
//! db.begin().await?;
//! db.insert("users", &[("name", RowValues::Text("alice".into()))]).await?;
//! db.commit().await?;
//!
//! let rows = db
//!     .fetch("users", Fetch::new().conditions(&[("name", Some(RowValues::Text("alice".into())))]))
//!     .await?;
//! assert_eq!(rows.len(), 1);
//! db.disconnect();
//! # Ok(()) }
//! ```

pub mod builder;
pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod executor;
pub mod results;
pub mod sql;
pub mod transaction;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod prelude;

pub use builder::{Fetch, SortOrder};
pub use config::ConnectionConfig;
pub use connection::DbConnection;
pub use error::SqlHelperError;
pub use results::{QueryOutcome, ResultSet, Row};
pub use types::{DriverKind, RowValues};
