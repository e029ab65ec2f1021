//! MSSQL connection descriptor (Strategy pattern).
//!
//! Provides SQL Server-specific SQL fragments, `@Pn` parameter placeholders and
//! `tiberius` connection configuration.

use tiberius::{AuthMethod, Config, EncryptionLevel};
use tracing::debug;

use crate::config::DescriptorConfig;
use crate::core::binding::bind_positional;
use crate::core::identifier::{quote_mssql, validate_identifier};
use crate::core::{BoundCommand, ConnectionDescriptor, NativeConnection, TransactionStatements, Value};
use crate::error::{CriteriaError, Result};

/// Microsoft SQL Server descriptor.
#[derive(Debug, Clone)]
pub struct MssqlDescriptor {
    config: DescriptorConfig,
}

impl MssqlDescriptor {
    /// Create a descriptor from a validated `mssql` configuration.
    pub fn from_config(config: &DescriptorConfig) -> Result<Self> {
        config.validate()?;
        if DescriptorConfig::normalize_type(&config.r#type)? != "mssql" {
            return Err(CriteriaError::Config(format!(
                "MssqlDescriptor needs type 'mssql', got '{}'",
                config.r#type
            )));
        }
        Ok(Self {
            config: config.clone(),
        })
    }

    /// SQL Server geometry constructors require an SRID; 0 means "unspecified".
    fn geometry_from_text(srid: Option<i32>) -> String {
        format!("geometry::STGeomFromText(?, {})", srid.unwrap_or(0))
    }
}

impl ConnectionDescriptor for MssqlDescriptor {
    fn name(&self) -> &str {
        "mssql"
    }

    fn connection_id(&self) -> String {
        self.config.connection_id()
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_mssql(name)
    }

    fn modulus_clause(&self, column: &str) -> Result<String> {
        Ok(format!("({} % ?)", column))
    }

    fn sequence_value_query(&self, sequence: &str) -> Result<String> {
        validate_identifier(sequence)?;
        Ok(format!("SELECT NEXT VALUE FOR {}", sequence))
    }

    fn bitwise_and_clause(&self, column: &str) -> Result<String> {
        Ok(format!("({} & ?)", column))
    }

    fn spatial_distance_clause(&self, column: &str, srid: Option<i32>) -> Result<String> {
        Ok(format!(
            "{}.STDistance({})",
            column,
            Self::geometry_from_text(srid)
        ))
    }

    fn spatial_intersects_clause(&self, column: &str, srid: Option<i32>) -> Result<String> {
        Ok(format!(
            "{}.STIntersects({}) = 1",
            column,
            Self::geometry_from_text(srid)
        ))
    }

    fn last_auto_generated_id_query(&self, table: &str, _column: &str) -> String {
        format!("SELECT IDENT_CURRENT('{}')", table.replace('\'', "''"))
    }

    fn use_pooling(&self) -> bool {
        self.config.pooling
    }

    fn create_new_connection(&self) -> Result<NativeConnection> {
        let mut config = Config::new();
        config.host(&self.config.host);
        config.port(self.config.port_or_default());
        config.database(&self.config.database);
        config.authentication(AuthMethod::sql_server(
            &self.config.user,
            &self.config.password,
        ));

        if self.config.encrypt_enabled() {
            if self.config.trust_server_cert {
                config.trust_cert();
            }
            config.encryption(EncryptionLevel::Required);
        } else {
            config.encryption(EncryptionLevel::NotSupported);
        }

        debug!("Created MSSQL connection config for {}", self.connection_id());
        Ok(NativeConnection::Mssql(config))
    }

    fn bind_parameters(&self, sql: &str, params: &[Value]) -> Result<BoundCommand> {
        bind_positional(sql, params, |n| format!("@P{}", n))
    }

    fn needs_explicit_column_aliases(&self) -> bool {
        true
    }

    fn needs_as_for_column_aliases(&self) -> bool {
        true
    }

    fn column_alias_prefix(&self) -> &str {
        "["
    }

    fn column_alias_suffix(&self) -> &str {
        "]"
    }

    fn table_alias_prefix(&self) -> &str {
        "["
    }

    fn table_alias_suffix(&self) -> &str {
        "]"
    }

    fn transaction_statements(&self) -> TransactionStatements {
        TransactionStatements {
            begin: "BEGIN TRANSACTION",
            commit: "COMMIT TRANSACTION",
            rollback: "ROLLBACK TRANSACTION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> MssqlDescriptor {
        let config = DescriptorConfig::from_yaml(
            "type: sql_server\nhost: sql.local\nport: 14330\ndatabase: sales\nuser: sa\npassword: secret\npooling: false\n",
        )
        .unwrap();
        MssqlDescriptor::from_config(&config).unwrap()
    }

    #[test]
    fn test_engine_clauses() {
        let d = descriptor();
        assert_eq!(d.name(), "mssql");
        assert!(!d.use_pooling());
        assert_eq!(d.modulus_clause("n").unwrap(), "(n % ?)");
        assert_eq!(
            d.sequence_value_query("dbo.order_seq").unwrap(),
            "SELECT NEXT VALUE FOR dbo.order_seq"
        );
        assert_eq!(
            d.spatial_distance_clause("shape", None).unwrap(),
            "shape.STDistance(geometry::STGeomFromText(?, 0))"
        );
        assert_eq!(
            d.spatial_intersects_clause("shape", Some(4326)).unwrap(),
            "shape.STIntersects(geometry::STGeomFromText(?, 4326)) = 1"
        );
        assert_eq!(
            d.last_auto_generated_id_query("orders", "id"),
            "SELECT IDENT_CURRENT('orders')"
        );
        assert_eq!(
            d.create_index_command("ix_orders", false, "orders", &["placed_at"]),
            "CREATE INDEX ix_orders ON orders (placed_at) "
        );
    }

    #[test]
    fn test_quote_ident() {
        let d = descriptor();
        assert_eq!(d.quote_table("dbo.my `table`").unwrap(), "[dbo].[my `table`]");
        assert!(d.quote_ident("").is_err());
    }

    #[test]
    fn test_bind_parameters() {
        let d = descriptor();
        let cmd = d
            .bind_parameters("UPDATE [t?] SET a = ? WHERE b = ?", &[Value::Int(1), Value::Int(2)])
            .unwrap();
        assert_eq!(cmd.sql, "UPDATE [t?] SET a = @P1 WHERE b = @P2");
        assert!(matches!(
            d.bind_parameters("a = ?", &[]),
            Err(CriteriaError::ParameterMismatch {
                placeholders: 1,
                values: 0
            })
        ));
    }

    #[test]
    fn test_create_new_connection() {
        let d = descriptor();
        match d.create_new_connection().unwrap() {
            NativeConnection::Mssql(config) => assert_eq!(config.get_addr(), "sql.local:14330"),
            other => panic!("expected a SQL Server config, got {}", other.kind()),
        }
    }

    #[test]
    fn test_transaction_statements() {
        let tx = descriptor().begin_transaction().unwrap();
        assert_eq!(tx.begin_sql(), "BEGIN TRANSACTION");
        assert_eq!(tx.commit(), "COMMIT TRANSACTION");
    }
}
