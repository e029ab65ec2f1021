//! The connection descriptor capability trait.
//!
//! A [`ConnectionDescriptor`] answers every dialect question the SQL layer has
//! (aliasing syntax, sequence/modulus/bitwise support, index DDL, outer-join
//! keyword, case folding) and constructs native connections for one logical
//! database target.
//!
//! # Design Patterns
//!
//! - **Strategy**: each engine provides an interchangeable descriptor
//! - **Template Method**: provided trait methods encode the common SQL
//!   behavior; engines override only what differs
//!
//! Operations an engine cannot express return
//! [`CriteriaError::UnsupportedCapability`] instead of panicking, so callers
//! can fall back or report the gap.

use std::fmt;

use crate::error::{CriteriaError, Result};

use super::transaction::{Transaction, TransactionStatements};
use super::value::Value;

/// A native connection configuration produced by a descriptor.
///
/// Constructing one never touches the network. The execution layer owns the
/// value from here on: it opens the connection and is responsible for closing it.
#[derive(Debug, Clone)]
pub enum NativeConnection {
    /// PostgreSQL connection parameters.
    Postgres(tokio_postgres::Config),
    /// SQL Server connection parameters.
    Mssql(tiberius::Config),
    /// MySQL/MariaDB connection options.
    #[cfg(feature = "mysql")]
    Mysql(sqlx::mysql::MySqlConnectOptions),
    /// ODBC connection string.
    Odbc(String),
}

impl NativeConnection {
    /// Engine identifier of the connection (e.g., "postgres", "mssql").
    pub fn kind(&self) -> &'static str {
        match self {
            NativeConnection::Postgres(_) => "postgres",
            NativeConnection::Mssql(_) => "mssql",
            #[cfg(feature = "mysql")]
            NativeConnection::Mysql(_) => "mysql",
            NativeConnection::Odbc(_) => "odbc",
        }
    }
}

/// SQL text with its positional parameters, ready for a native command.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCommand {
    /// SQL rewritten to the engine's native placeholder syntax.
    pub sql: String,
    /// Values in placeholder order.
    pub params: Vec<Value>,
}

/// Dialect capabilities and connection factory for one database target.
///
/// Implementations must be safe to share across threads: capability queries
/// read fixed configuration only, and [`create_new_connection`] returns an
/// unshared resource on every call.
///
/// [`create_new_connection`]: ConnectionDescriptor::create_new_connection
pub trait ConnectionDescriptor: Send + Sync + fmt::Debug {
    /// Get the engine identifier (e.g., "postgres", "mssql").
    fn name(&self) -> &str;

    /// Identifier of the connection target used in error messages.
    ///
    /// Never includes credentials.
    fn connection_id(&self) -> String;

    // ===== Identifiers =====

    /// Quote a table or column name with the engine's identifier quotes.
    ///
    /// - PostgreSQL/ODBC: `"identifier"`
    /// - MSSQL: `[identifier]`
    /// - MySQL: `` `identifier` ``
    fn quote_ident(&self, name: &str) -> Result<String>;

    /// Quote a possibly schema-qualified table name, one part per `.`.
    fn quote_table(&self, table: &str) -> Result<String> {
        let parts = table
            .split('.')
            .map(|part| self.quote_ident(part))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join("."))
    }

    // ===== Engine-specific clauses =====

    /// SQL fragment computing `column` modulo a bound divisor, e.g. `(col % ?)`.
    fn modulus_clause(&self, column: &str) -> Result<String> {
        let _ = column;
        Err(CriteriaError::unsupported("Modulus", self.connection_id()))
    }

    /// Query returning the next value of a sequence.
    fn sequence_value_query(&self, sequence: &str) -> Result<String> {
        let _ = sequence;
        Err(CriteriaError::unsupported("Sequence", self.connection_id()))
    }

    /// SQL fragment computing `column` bitwise-AND a bound mask, e.g. `(col & ?)`.
    fn bitwise_and_clause(&self, column: &str) -> Result<String> {
        let _ = column;
        Err(CriteriaError::unsupported("BitwiseAnd", self.connection_id()))
    }

    /// SQL fragment computing the distance from `column` to a bound WKT geometry.
    fn spatial_distance_clause(&self, column: &str, srid: Option<i32>) -> Result<String> {
        let _ = (column, srid);
        Err(CriteriaError::unsupported("SpatialDistance", self.connection_id()))
    }

    /// Boolean SQL condition testing `column` against a bound WKT geometry for intersection.
    fn spatial_intersects_clause(&self, column: &str, srid: Option<i32>) -> Result<String> {
        let _ = (column, srid);
        Err(CriteriaError::unsupported("SpatialIntersects", self.connection_id()))
    }

    /// Query returning the most recently generated id of an auto-increment column.
    fn last_auto_generated_id_query(&self, table: &str, column: &str) -> String {
        format!("SELECT MAX({}) FROM {}", column, table)
    }

    /// DDL statement creating an index.
    fn create_index_command(
        &self,
        index_name: &str,
        unique: bool,
        table: &str,
        columns: &[&str],
    ) -> String {
        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str(&format!(
            "INDEX {} ON {} ({}) ",
            index_name,
            table,
            columns.join(",")
        ));
        sql
    }

    /// Whether `TRUNCATE TABLE` is available.
    fn supports_truncate(&self) -> bool {
        true
    }

    // ===== Connections and parameters =====

    /// Whether connections to this target should be pooled.
    fn use_pooling(&self) -> bool;

    /// Construct a fresh native connection configuration.
    fn create_new_connection(&self) -> Result<NativeConnection>;

    /// Rewrite the uniform `?` placeholders of `sql` into native syntax and
    /// pair them with `params` in left-to-right order.
    fn bind_parameters(&self, sql: &str, params: &[Value]) -> Result<BoundCommand>;

    // ===== Aliasing =====

    /// Whether every selected column needs an explicit alias when its table is aliased.
    fn needs_explicit_column_aliases(&self) -> bool;

    /// Whether `AS` must precede a column alias.
    fn needs_as_for_column_aliases(&self) -> bool;

    /// Token written before a column alias.
    fn column_alias_prefix(&self) -> &str;

    /// Token written after a column alias.
    fn column_alias_suffix(&self) -> &str;

    /// Whether the alias tokens show up in result set column names.
    fn column_alias_wrappers_in_results(&self) -> bool {
        false
    }

    /// Token written before a table alias.
    fn table_alias_prefix(&self) -> &str;

    /// Token written after a table alias.
    fn table_alias_suffix(&self) -> &str;

    // ===== Keywords =====

    fn full_outer_join_keyword(&self) -> &str {
        "FULL OUTER JOIN"
    }

    fn lower_case_function(&self) -> &str {
        "LOWER"
    }

    // ===== Transactions =====

    /// Statements that start, commit and roll back a transaction.
    fn transaction_statements(&self) -> TransactionStatements {
        TransactionStatements::STANDARD
    }

    /// Begin a transaction on a fresh native connection.
    ///
    /// The caller owns the returned handle and must commit or roll it back.
    fn begin_transaction(&self) -> Result<Transaction> {
        Ok(Transaction::begin(
            self.connection_id(),
            self.create_new_connection()?,
            self.transaction_statements(),
        ))
    }
}
