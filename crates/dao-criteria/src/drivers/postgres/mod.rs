//! PostgreSQL driver.
//!
//! - [`PostgresDescriptor`]: dialect capabilities and `tokio_postgres` connection config

mod descriptor;

pub use descriptor::PostgresDescriptor;
