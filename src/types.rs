use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row or bound as query parameters.
///
/// The same enum is reused across backends so callers never deal with driver
/// parameter types directly:
/// ```rust
/// use sql_helper::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// The driver families supported by this helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// `SQLite` database (file-based, path-style connection string)
    #[cfg(feature = "sqlite")]
    Sqlite,
    /// `PostgreSQL` database (network, host/port connection string)
    #[cfg(feature = "postgres")]
    Postgres,
}

impl Default for DriverKind {
    /// The network driver is the historical default; file-based builds fall
    /// back to `SQLite`.
    fn default() -> Self {
        #[cfg(feature = "postgres")]
        {
            DriverKind::Postgres
        }
        #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
        {
            DriverKind::Sqlite
        }
    }
}

impl DriverKind {
    /// File-based drivers address the database by path instead of host/port.
    #[must_use]
    pub fn is_file_based(self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            DriverKind::Sqlite => true,
            #[cfg(feature = "postgres")]
            DriverKind::Postgres => false,
        }
    }

    /// Whether nested `begin` calls map to real named savepoints. Drivers
    /// without this only see the outermost begin/commit/rollback; inner
    /// levels are tracked by the depth counter alone.
    #[must_use]
    pub fn supports_nested_transactions(self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            DriverKind::Sqlite => false,
            #[cfg(feature = "postgres")]
            DriverKind::Postgres => true,
        }
    }

    /// Whether the charset is applied as a session directive after connect
    /// (`SET NAMES`), as opposed to being a property of the file encoding.
    #[must_use]
    pub fn has_session_charset(self) -> bool {
        !self.is_file_based()
    }

    /// Scheme token used in connection strings.
    #[must_use]
    pub fn scheme(self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            DriverKind::Sqlite => "sqlite",
            #[cfg(feature = "postgres")]
            DriverKind::Postgres => "postgres",
        }
    }
}
