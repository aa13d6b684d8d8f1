use serde::Deserialize;

use crate::types::DriverKind;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> String {
    "5432".to_string()
}

fn default_base() -> String {
    "test".to_string()
}

fn default_charset() -> String {
    "utf8".to_string()
}

/// Connection settings for a [`DbConnection`](crate::connection::DbConnection).
///
/// Built either from a configuration mapping (any serde format with the
/// recognized keys `driver`, `host`, `port`, `base`, `charset`, `user`,
/// `pass`, `dsn`) or fluently:
/// ```rust
/// use sql_helper::prelude::*;
///
/// let config = ConnectionConfig::new(DriverKind::Sqlite)
///     .database("app.db");
/// # let _ = config;
/// ```
///
/// Every setter ignores empty input and keeps the previous value, so a blank
/// option from a config file never erases a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    driver: DriverKind,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: String,
    /// Database name, or the file path for file-based drivers.
    #[serde(default = "default_base")]
    base: String,
    #[serde(default = "default_charset")]
    charset: String,
    user: String,
    pass: String,
    /// Raw connection-string override; when set, [`dsn`](Self::dsn) returns
    /// it instead of the derived template.
    dsn: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            driver: DriverKind::default(),
            host: default_host(),
            port: default_port(),
            base: default_base(),
            charset: default_charset(),
            user: String::new(),
            pass: String::new(),
            dsn: None,
        }
    }
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(driver: DriverKind) -> Self {
        Self {
            driver,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_driver(mut self, driver: DriverKind) -> Self {
        self.driver = driver;
        self
    }

    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        if !host.is_empty() {
            self.host = host.to_string();
        }
        self
    }

    #[must_use]
    pub fn port(mut self, port: &str) -> Self {
        if !port.is_empty() {
            self.port = port.to_string();
        }
        self
    }

    /// Set user and password together.
    #[must_use]
    pub fn credentials(mut self, user: &str, pass: &str) -> Self {
        if !user.is_empty() {
            self.user = user.to_string();
        }
        if !pass.is_empty() {
            self.pass = pass.to_string();
        }
        self
    }

    /// Set the database name (the file path for file-based drivers).
    #[must_use]
    pub fn database(mut self, name: &str) -> Self {
        if !name.is_empty() {
            self.base = name.to_string();
        }
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: &str) -> Self {
        if !charset.is_empty() {
            self.charset = charset.to_string();
        }
        self
    }

    /// Supply a raw connection string, overriding the derived template.
    #[must_use]
    pub fn raw_dsn(mut self, dsn: &str) -> Self {
        if !dsn.is_empty() {
            self.dsn = Some(dsn.to_string());
        }
        self
    }

    #[must_use]
    pub fn driver_kind(&self) -> DriverKind {
        self.driver
    }

    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port_str(&self) -> &str {
        &self.port
    }

    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn charset_name(&self) -> &str {
        &self.charset
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.pass
    }

    pub(crate) fn set_charset_value(&mut self, charset: &str) {
        if !charset.is_empty() {
            self.charset = charset.to_string();
        }
    }

    /// The effective connection string: the raw override when one was set,
    /// otherwise the driver-specific template: path-style for file-based
    /// drivers, `scheme:host=..;port=..;dbname=..;charset=..` for network
    /// drivers.
    #[must_use]
    pub fn dsn(&self) -> String {
        if let Some(dsn) = &self.dsn {
            return dsn.clone();
        }
        if self.driver.is_file_based() {
            format!("{}://{}", self.driver.scheme(), self.base)
        } else {
            format!(
                "{}:host={};port={};dbname={};charset={}",
                self.driver.scheme(),
                self.host,
                self.port,
                self.base,
                self.charset
            )
        }
    }
}
