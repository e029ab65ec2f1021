//! # dao-criteria
//!
//! Data-source-agnostic query criteria with per-engine SQL connection descriptors.
//!
//! Application code builds typed, composable predicates against mapped object
//! types without knowing which engine will run them:
//!
//! - **Expressions** with exact, flag-based inversion ([`Invertible`])
//! - **Join predicates** that can swap sides without changing meaning ([`Flippable`])
//! - **Multi-joins** against any registered mapping, told apart by alias
//! - **Spatial predicates** against an opaque geometry
//! - **Connection descriptors** answering every dialect question for
//!   PostgreSQL, SQL Server, MySQL and plain ODBC
//! - **In-memory evaluation** of the same criteria for non-SQL stores
//!
//! Nothing here opens a socket: descriptors build native connection
//! configurations and the SQL layer produces text plus bound values.
//!
//! ## Example
//!
//! ```rust
//! use dao_criteria::{
//!     ClassMapping, DaoCriteria, Expression, Invertible, MappingRegistry, OdbcDescriptor,
//!     QueryBuilder,
//! };
//!
//! let mut registry = MappingRegistry::new();
//! let people = registry.register(
//!     ClassMapping::new("Person", "people")?
//!         .with_column("name", "full_name")?
//!         .with_column("age", "age")?,
//! );
//!
//! let criteria = DaoCriteria::new()
//!     .add(Expression::greater_or_equal("age", 18))
//!     .add(Expression::like("name", "A%").invert());
//!
//! let descriptor = OdbcDescriptor::new("DSN=people");
//! let clause = QueryBuilder::new(&descriptor, &registry).select(people, &criteria)?;
//! assert_eq!(
//!     clause.sql,
//!     r#"SELECT "full_name", "age" FROM "people" WHERE "age" >= ? AND "full_name" NOT LIKE ?"#
//! );
//! # Ok::<(), dao_criteria::CriteriaError>(())
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod expression;
pub mod sql;

// Re-exports for convenient access
pub use crate::config::DescriptorConfig;
pub use crate::core::{
    BoundCommand, ClassMapping, ConnectionDescriptor, Geometry, MappingId, MappingRegistry,
    NativeConnection, Transaction, TransactionStatements, Value,
};
pub use drivers::{descriptor_from_config, MssqlDescriptor, OdbcDescriptor, PostgresDescriptor};
#[cfg(feature = "mysql")]
pub use drivers::MysqlDescriptor;
pub use error::{CriteriaError, Result};
pub use expression::{
    DaoCriteria, DaoJoinCriteria, Expression, Flippable, Invertible, JoinExpression, JoinOp,
    JoinSide, JoinType, MultiJoinExpression, NestedExpression, Record, SortDirection,
    SpatialExpression,
};
pub use sql::{QueryBuilder, SqlClause};
