use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "postgres")]
use tokio_postgres;

/// HTTP-style class for caller misuse.
pub const STATUS_BAD_REQUEST: u16 = 400;
/// HTTP-style class for driver failures without a numeric code of their own.
pub const STATUS_INTERNAL: u16 = 500;

#[derive(Debug, Error)]
pub enum SqlHelperError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cannot run this query, connection is missing")]
    MissingConnection,

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Invalid table name")]
    InvalidTableName,

    #[error("Data cannot be empty")]
    EmptyData,

    #[error("Invalid limit: must be non-negative")]
    InvalidLimit,

    #[error("Invalid offset: must be non-negative")]
    InvalidOffset,

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl SqlHelperError {
    /// Numeric classification analogous to HTTP status semantics: caller
    /// misuse reports 400, driver failures report the driver's own code
    /// when it is numeric and 500 otherwise.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            #[cfg(feature = "sqlite")]
            SqlHelperError::SqliteError(e) => sqlite_code(e),
            #[cfg(feature = "postgres")]
            SqlHelperError::PostgresError(e) => postgres_code(e),
            _ => STATUS_BAD_REQUEST,
        }
    }

    /// Whether this error is a caller-side contract violation.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        self.status_code() == STATUS_BAD_REQUEST
    }

    /// Whether this error originated in the underlying driver.
    #[must_use]
    pub fn is_driver(&self) -> bool {
        !self.is_usage()
    }
}

#[cfg(feature = "sqlite")]
fn sqlite_code(err: &rusqlite::Error) -> u16 {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            u16::try_from(e.extended_code).unwrap_or(STATUS_INTERNAL)
        }
        _ => STATUS_INTERNAL,
    }
}

#[cfg(feature = "postgres")]
fn postgres_code(err: &tokio_postgres::Error) -> u16 {
    // SQLSTATE codes are five characters; keep the ones that are all digits
    // (e.g. 23505 unique_violation), fall back to the internal class.
    err.code()
        .map(tokio_postgres::error::SqlState::code)
        .filter(|c| c.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|c| c.parse().ok())
        .unwrap_or(STATUS_INTERNAL)
}
