//! SQL rendering of criteria trees.
//!
//! [`QueryBuilder`] walks a [`DaoCriteria`](crate::expression::DaoCriteria) or
//! [`DaoJoinCriteria`](crate::expression::DaoJoinCriteria), resolves
//! properties through the [`MappingRegistry`](crate::core::MappingRegistry) and
//! asks the active [`ConnectionDescriptor`](crate::core::ConnectionDescriptor)
//! for every engine-specific fragment. The output always uses `?` placeholders;
//! [`QueryBuilder::bind`] turns it into the engine's native form.

mod builder;

pub use builder::QueryBuilder;

use crate::core::Value;

/// SQL text with `?` placeholders and the values that fill them, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlClause {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlClause {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append SQL text.
    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a `?` placeholder bound to `value`.
    pub fn push_param(&mut self, value: impl Into<Value>) {
        self.sql.push('?');
        self.params.push(value.into());
    }

    /// Append another clause, text and parameters.
    pub fn append(&mut self, other: SqlClause) {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params);
    }

    /// Join clauses with `separator`, keeping parameter order.
    pub fn join(parts: Vec<SqlClause>, separator: &str) -> SqlClause {
        let mut joined = SqlClause::default();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                joined.push_sql(separator);
            }
            joined.append(part);
        }
        joined
    }

    /// Wrap the clause in `NOT (...)`.
    #[must_use]
    pub fn negated(self) -> SqlClause {
        SqlClause {
            sql: format!("NOT ({})", self.sql),
            params: self.params,
        }
    }
}
