//! Transaction handles returned by [`ConnectionDescriptor::begin_transaction`].
//!
//! [`ConnectionDescriptor::begin_transaction`]: super::traits::ConnectionDescriptor::begin_transaction

use tracing::{debug, warn};
use uuid::Uuid;

use super::traits::NativeConnection;

/// Engine statements controlling a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionStatements {
    pub begin: &'static str,
    pub commit: &'static str,
    pub rollback: &'static str,
}

impl TransactionStatements {
    /// SQL:1999 spelling.
    pub const STANDARD: Self = Self {
        begin: "START TRANSACTION",
        commit: "COMMIT",
        rollback: "ROLLBACK",
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    Active,
    Committed,
    RolledBack,
}

/// An open transaction bound to its own native connection.
///
/// The handle is owned by the flow that began it. [`commit`](Self::commit) and
/// [`rollback`](Self::rollback) consume it, so a finished transaction cannot be
/// reused. Dropping an active handle logs a warning; the execution layer is
/// expected to roll back the underlying connection in that case.
#[derive(Debug)]
pub struct Transaction {
    id: Uuid,
    connection_id: String,
    connection: NativeConnection,
    statements: TransactionStatements,
    state: TransactionState,
}

impl Transaction {
    pub(crate) fn begin(
        connection_id: String,
        connection: NativeConnection,
        statements: TransactionStatements,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!("Beginning transaction {} on {}", id, connection_id);
        Self {
            id,
            connection_id,
            connection,
            statements,
            state: TransactionState::Active,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the connection target.
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// The native connection this transaction runs on.
    pub fn connection(&self) -> &NativeConnection {
        &self.connection
    }

    /// Statement the execution layer runs first on the connection.
    pub fn begin_sql(&self) -> &'static str {
        self.statements.begin
    }

    /// Finish the transaction successfully, returning the statement to execute.
    pub fn commit(mut self) -> &'static str {
        self.state = TransactionState::Committed;
        debug!("Committing transaction {} on {}", self.id, self.connection_id);
        self.statements.commit
    }

    /// Abandon the transaction, returning the statement to execute.
    pub fn rollback(mut self) -> &'static str {
        self.state = TransactionState::RolledBack;
        debug!("Rolling back transaction {} on {}", self.id, self.connection_id);
        self.statements.rollback
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            warn!(
                "Transaction {} on {} dropped without commit or rollback",
                self.id, self.connection_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(statements: TransactionStatements) -> Transaction {
        Transaction::begin(
            "odbc://test".to_string(),
            NativeConnection::Odbc("DSN=test".to_string()),
            statements,
        )
    }

    #[test]
    fn test_commit_and_rollback_statements() {
        let tx = open(TransactionStatements::STANDARD);
        assert_eq!(tx.begin_sql(), "START TRANSACTION");
        assert_eq!(tx.commit(), "COMMIT");

        let tx = open(TransactionStatements::STANDARD);
        assert_eq!(tx.rollback(), "ROLLBACK");
    }

    #[test]
    fn test_each_transaction_has_its_own_id() {
        let a = open(TransactionStatements::STANDARD);
        let b = open(TransactionStatements::STANDARD);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.connection_id(), "odbc://test");
        a.rollback();
        b.rollback();
    }
}
