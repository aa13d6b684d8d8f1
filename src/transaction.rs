//! Nested-transaction emulation.
//!
//! [`TxState`] is a pure depth counter that decides which real statement, if
//! any, each transition sends to the driver. Drivers without nested support
//! only see the outermost `BEGIN`/`COMMIT`/`ROLLBACK`; nesting-capable
//! drivers get named savepoints keyed by the depth they address. Commit or
//! rollback at depth zero is silently absorbed.

/// A real transaction-control statement to forward to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatement {
    Begin,
    Commit,
    Rollback,
    /// `SAVEPOINT sp_{n}` marking entry to depth `n`.
    Savepoint(u32),
    /// `RELEASE SAVEPOINT sp_{n}` on committing out of depth `n`.
    ReleaseSavepoint(u32),
    /// `ROLLBACK TO SAVEPOINT sp_{n}` on rolling back out of depth `n`.
    RollbackToSavepoint(u32),
}

impl TxStatement {
    /// Render the statement as SQL.
    #[must_use]
    pub fn sql(&self) -> String {
        match self {
            TxStatement::Begin => "BEGIN".to_string(),
            TxStatement::Commit => "COMMIT".to_string(),
            TxStatement::Rollback => "ROLLBACK".to_string(),
            TxStatement::Savepoint(n) => format!("SAVEPOINT sp_{n}"),
            TxStatement::ReleaseSavepoint(n) => format!("RELEASE SAVEPOINT sp_{n}"),
            TxStatement::RollbackToSavepoint(n) => format!("ROLLBACK TO SAVEPOINT sp_{n}"),
        }
    }
}

/// Transaction depth tracker. `idle` at depth 0, `active` at depth >= 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxState {
    depth: u32,
}

impl TxState {
    #[must_use]
    pub fn depth(self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self.depth > 0
    }

    /// Record a `begin`. Returns the statement to forward, if any.
    pub fn begin(&mut self, nested_support: bool) -> Option<TxStatement> {
        self.depth += 1;
        if self.depth == 1 {
            Some(TxStatement::Begin)
        } else if nested_support {
            Some(TxStatement::Savepoint(self.depth))
        } else {
            // Recorded but not forwarded, the driver cannot nest.
            None
        }
    }

    /// Record a `commit`. A commit at depth zero is a no-op.
    pub fn commit(&mut self, nested_support: bool) -> Option<TxStatement> {
        if self.depth == 0 {
            return None;
        }
        let leaving = self.depth;
        self.depth -= 1;
        if self.depth == 0 {
            Some(TxStatement::Commit)
        } else if nested_support {
            Some(TxStatement::ReleaseSavepoint(leaving))
        } else {
            None
        }
    }

    /// Record a `rollback`. A rollback at depth zero is a no-op.
    pub fn rollback(&mut self, nested_support: bool) -> Option<TxStatement> {
        if self.depth == 0 {
            return None;
        }
        let leaving = self.depth;
        self.depth -= 1;
        if self.depth == 0 {
            Some(TxStatement::Rollback)
        } else if nested_support {
            Some(TxStatement::RollbackToSavepoint(leaving))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_nesting_driver_forwards_only_outer_pair() {
        let mut state = TxState::default();
        assert_eq!(state.begin(false), Some(TxStatement::Begin));
        assert_eq!(state.begin(false), None);
        assert_eq!(state.depth(), 2);
        assert_eq!(state.commit(false), None);
        assert_eq!(state.commit(false), Some(TxStatement::Commit));
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn nesting_driver_uses_savepoints_keyed_by_depth() {
        let mut state = TxState::default();
        assert_eq!(state.begin(true), Some(TxStatement::Begin));
        assert_eq!(state.begin(true), Some(TxStatement::Savepoint(2)));
        assert_eq!(state.begin(true), Some(TxStatement::Savepoint(3)));
        assert_eq!(state.rollback(true), Some(TxStatement::RollbackToSavepoint(3)));
        assert_eq!(state.commit(true), Some(TxStatement::ReleaseSavepoint(2)));
        assert_eq!(state.commit(true), Some(TxStatement::Commit));
    }

    #[test]
    fn commit_and_rollback_at_depth_zero_are_absorbed() {
        let mut state = TxState::default();
        assert_eq!(state.commit(true), None);
        assert_eq!(state.rollback(false), None);
        assert_eq!(state.depth(), 0);
        assert!(!state.is_active());
    }

    #[test]
    fn rollback_unwinds_to_idle_on_non_nesting_driver() {
        let mut state = TxState::default();
        state.begin(false);
        state.begin(false);
        assert_eq!(state.rollback(false), None);
        assert_eq!(state.rollback(false), Some(TxStatement::Rollback));
        assert!(!state.is_active());
    }

    #[test]
    fn savepoint_sql_rendering() {
        assert_eq!(TxStatement::Savepoint(2).sql(), "SAVEPOINT sp_2");
        assert_eq!(TxStatement::ReleaseSavepoint(2).sql(), "RELEASE SAVEPOINT sp_2");
        assert_eq!(
            TxStatement::RollbackToSavepoint(3).sql(),
            "ROLLBACK TO SAVEPOINT sp_3"
        );
    }
}
