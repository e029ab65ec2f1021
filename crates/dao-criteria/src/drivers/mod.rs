//! Connection descriptor implementations.
//!
//! This module provides the engine-specific implementations of
//! [`ConnectionDescriptor`]:
//!
//! - [`postgres`]: PostgreSQL (PostGIS for spatial predicates)
//! - [`mssql`]: Microsoft SQL Server
//! - [`mysql`]: MySQL/MariaDB (requires the `mysql` feature)
//! - [`odbc`]: standard SQL over ODBC, the capability baseline
//!
//! # Adding New Databases
//!
//! To add support for a new database:
//!
//! 1. Create a new module under `drivers/` (e.g., `drivers/oracle/`)
//! 2. Implement `ConnectionDescriptor`, overriding only what differs from
//!    standard SQL
//! 3. Accept the engine's type names in `DescriptorConfig::normalize_type`
//! 4. Add an arm to [`descriptor_from_config`]
//! 5. Gate the driver with a feature flag in `Cargo.toml` if it pulls in a client crate

pub mod mssql;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod odbc;
pub mod postgres;

use std::sync::Arc;

use tracing::info;

pub use mssql::MssqlDescriptor;
#[cfg(feature = "mysql")]
pub use mysql::MysqlDescriptor;
pub use odbc::OdbcDescriptor;
pub use postgres::PostgresDescriptor;

use crate::config::DescriptorConfig;
use crate::core::ConnectionDescriptor;
use crate::error::Result;

/// Create the descriptor matching the configured engine type.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the type is not
/// recognized.
pub fn descriptor_from_config(config: &DescriptorConfig) -> Result<Arc<dyn ConnectionDescriptor>> {
    let engine = DescriptorConfig::normalize_type(&config.r#type)?;
    let descriptor: Arc<dyn ConnectionDescriptor> = match engine {
        "postgres" => Arc::new(PostgresDescriptor::from_config(config)?),
        "mssql" => Arc::new(MssqlDescriptor::from_config(config)?),
        #[cfg(feature = "mysql")]
        "mysql" => Arc::new(MysqlDescriptor::from_config(config)?),
        _ => Arc::new(OdbcDescriptor::from_config(config)?),
    };

    info!(
        "Using {} descriptor for {}",
        descriptor.name(),
        descriptor.connection_id()
    );
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(yaml: &str) -> Result<Arc<dyn ConnectionDescriptor>> {
        descriptor_from_config(&serde_yaml::from_str::<DescriptorConfig>(yaml).unwrap())
    }

    #[test]
    fn test_descriptor_from_config() {
        let pg = load("type: pg\nhost: h\ndatabase: d\nuser: u\n").unwrap();
        assert_eq!(pg.name(), "postgres");

        let mssql = load("type: SQLServer\nhost: h\ndatabase: d\nuser: u\n").unwrap();
        assert_eq!(mssql.name(), "mssql");

        let odbc = load("type: odbc\nconnection_string: DSN=x\n").unwrap();
        assert_eq!(odbc.name(), "odbc");

        // Unknown should error
        assert!(load("type: oracle\nhost: h\ndatabase: d\nuser: u\n").is_err());
        // Invalid config should error
        assert!(load("type: postgres\nhost: h\n").is_err());
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_from_config() {
        let mysql = load("type: mysql\nhost: h\ndatabase: d\nuser: u\n").unwrap();
        assert_eq!(mysql.name(), "mysql");
    }

    #[test]
    fn test_descriptors_are_shareable() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ConnectionDescriptor>();

        let pg = load("type: postgres\nhost: h\ndatabase: d\nuser: u\n").unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pg = Arc::clone(&pg);
                std::thread::spawn(move || pg.create_new_connection().map(|c| c.kind()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "postgres");
        }
    }
}
