//! Raw statement execution: normalization, read/write dispatch, and the
//! driver placeholder rewrite.

use tracing::debug;

use crate::connection::DbConnection;
use crate::driver::DatabaseExecutor;
use crate::error::SqlHelperError;
use crate::results::QueryOutcome;
use crate::translation::{PlaceholderStyle, translate_placeholders};
use crate::types::{DriverKind, RowValues};

/// Trim the statement and collapse internal line breaks to single spaces.
#[must_use]
pub fn normalize_statement(sql: &str) -> String {
    sql.trim()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Whether the statement is a read: an ASCII-case-insensitive `SELECT`
/// keyword at the start, followed by a non-identifier character or the end
/// of the statement. No regex, no locale-sensitive folding.
#[must_use]
pub fn is_read_statement(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    let Some(rest) = trimmed
        .get(..6)
        .filter(|head| head.eq_ignore_ascii_case("select"))
        .map(|_| &trimmed[6..])
    else {
        return false;
    };
    rest.is_empty() || !rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
}

fn placeholder_style(driver: DriverKind) -> PlaceholderStyle {
    match driver {
        #[cfg(feature = "sqlite")]
        DriverKind::Sqlite => PlaceholderStyle::Question,
        #[cfg(feature = "postgres")]
        DriverKind::Postgres => PlaceholderStyle::Numbered,
    }
}

impl DbConnection {
    /// Execute a raw SQL statement with optional bound values.
    ///
    /// The statement is trimmed and its line breaks collapsed before
    /// submission; placeholders are written as `?` and rewritten for the
    /// driver where needed. Read statements (leading `SELECT`) return their
    /// rows and record the row count; any other statement records a count of
    /// zero and returns the constant success marker [`QueryOutcome::Done`];
    /// real affected-row counts are intentionally not surfaced here.
    ///
    /// Exactly one statement runs per call; multi-statement scripts go
    /// through [`exec_batch`](Self::exec_batch).
    ///
    /// # Errors
    /// `SqlHelperError::MissingConnection` without a live connection,
    /// `SqlHelperError::EmptyQuery` for an empty statement, or the wrapped
    /// driver error with its numeric code preserved when available.
    pub async fn exec(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryOutcome, SqlHelperError> {
        if !self.is_connected() {
            return Err(SqlHelperError::MissingConnection);
        }

        let normalized = normalize_statement(sql);
        if normalized.is_empty() {
            return Err(SqlHelperError::EmptyQuery);
        }
        let style = placeholder_style(self.driver());
        let statement = translate_placeholders(&normalized, style);

        if is_read_statement(&statement) {
            let conn = self.live_mut()?;
            let rows = conn.execute_select(&statement, params).await?;
            self.last_result_count = rows.len();
            debug!(rows = rows.len(), "read statement executed");
            return Ok(QueryOutcome::Rows(rows));
        }

        let conn = self.live_mut()?;
        let affected = conn.execute_dml(&statement, params).await?;
        // Row count only ever reflects reads.
        self.last_result_count = 0;
        debug!(affected, "write statement executed");
        Ok(QueryOutcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_flattens_line_breaks() {
        assert_eq!(
            normalize_statement("  SELECT *\nFROM t\r\nWHERE a = ?  "),
            "SELECT * FROM t  WHERE a = ?"
        );
    }

    #[test]
    fn read_dispatch_matches_select_prefix_only() {
        assert!(is_read_statement("SELECT 1"));
        assert!(is_read_statement("  select * from t"));
        assert!(is_read_statement("\tSeLeCt(1)"));
        assert!(is_read_statement("select"));
        assert!(!is_read_statement("selection from t"));
        assert!(!is_read_statement("INSERT INTO t VALUES (1)"));
        assert!(!is_read_statement("UPDATE t SET a = 1"));
        assert!(!is_read_statement(""));
    }
}
