//! Convenient imports for common functionality.

pub use crate::builder::{Fetch, SortOrder, build_delete, build_fetch, build_insert, build_update};
pub use crate::config::ConnectionConfig;
pub use crate::connection::DbConnection;
pub use crate::driver::{DatabaseExecutor, DriverConnection};
pub use crate::error::SqlHelperError;
pub use crate::results::{QueryOutcome, ResultSet, Row};
pub use crate::sql::{build_where, escape_column_name, escape_table_name};
pub use crate::translation::{PlaceholderStyle, translate_placeholders};
pub use crate::types::{DriverKind, RowValues};
