//! PostgreSQL connection descriptor (Strategy pattern).
//!
//! Provides PostgreSQL-specific SQL fragments, `$n` parameter placeholders and
//! `tokio_postgres` connection configuration.

use tokio_postgres::config::SslMode;
use tokio_postgres::Config as PgConfig;
use tracing::debug;

use crate::config::DescriptorConfig;
use crate::core::binding::bind_positional;
use crate::core::identifier::{quote_literal, quote_pg, validate_identifier};
use crate::core::{BoundCommand, ConnectionDescriptor, NativeConnection, TransactionStatements, Value};
use crate::error::{CriteriaError, Result};

/// PostgreSQL descriptor. PostGIS is assumed for spatial predicates.
#[derive(Debug, Clone)]
pub struct PostgresDescriptor {
    config: DescriptorConfig,
}

impl PostgresDescriptor {
    /// Create a descriptor from a validated `postgres` configuration.
    pub fn from_config(config: &DescriptorConfig) -> Result<Self> {
        config.validate()?;
        if DescriptorConfig::normalize_type(&config.r#type)? != "postgres" {
            return Err(CriteriaError::Config(format!(
                "PostgresDescriptor needs type 'postgres', got '{}'",
                config.r#type
            )));
        }
        Ok(Self {
            config: config.clone(),
        })
    }

    fn geometry_from_text(srid: Option<i32>) -> String {
        match srid {
            Some(srid) => format!("ST_GeomFromText(?, {})", srid),
            None => "ST_GeomFromText(?)".to_string(),
        }
    }
}

impl ConnectionDescriptor for PostgresDescriptor {
    fn name(&self) -> &str {
        "postgres"
    }

    fn connection_id(&self) -> String {
        self.config.connection_id()
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_pg(name)
    }

    fn modulus_clause(&self, column: &str) -> Result<String> {
        Ok(format!("({} % ?)", column))
    }

    fn sequence_value_query(&self, sequence: &str) -> Result<String> {
        // nextval takes the sequence name as a regclass literal
        Ok(format!("SELECT nextval({})", quote_literal(sequence)?))
    }

    fn bitwise_and_clause(&self, column: &str) -> Result<String> {
        Ok(format!("({} & ?)", column))
    }

    fn spatial_distance_clause(&self, column: &str, srid: Option<i32>) -> Result<String> {
        Ok(format!(
            "ST_Distance({}, {})",
            column,
            Self::geometry_from_text(srid)
        ))
    }

    fn spatial_intersects_clause(&self, column: &str, srid: Option<i32>) -> Result<String> {
        Ok(format!(
            "ST_Intersects({}, {})",
            column,
            Self::geometry_from_text(srid)
        ))
    }

    fn last_auto_generated_id_query(&self, table: &str, column: &str) -> String {
        format!(
            "SELECT currval(pg_get_serial_sequence('{}', '{}'))",
            table.replace('\'', "''"),
            column.replace('\'', "''")
        )
    }

    fn use_pooling(&self) -> bool {
        self.config.pooling
    }

    fn create_new_connection(&self) -> Result<NativeConnection> {
        validate_identifier(&self.config.database)?;

        let mut pg_config = PgConfig::new();
        pg_config.host(&self.config.host);
        pg_config.port(self.config.port_or_default());
        pg_config.dbname(&self.config.database);
        pg_config.user(&self.config.user);
        pg_config.password(&self.config.password);
        pg_config.ssl_mode(if self.config.encrypt_enabled() {
            SslMode::Require
        } else {
            SslMode::Disable
        });

        debug!("Created PostgreSQL connection config for {}", self.connection_id());
        Ok(NativeConnection::Postgres(pg_config))
    }

    fn bind_parameters(&self, sql: &str, params: &[Value]) -> Result<BoundCommand> {
        bind_positional(sql, params, |n| format!("${}", n))
    }

    fn needs_explicit_column_aliases(&self) -> bool {
        true
    }

    fn needs_as_for_column_aliases(&self) -> bool {
        true
    }

    fn column_alias_prefix(&self) -> &str {
        "\""
    }

    fn column_alias_suffix(&self) -> &str {
        "\""
    }

    fn table_alias_prefix(&self) -> &str {
        ""
    }

    fn table_alias_suffix(&self) -> &str {
        ""
    }

    fn transaction_statements(&self) -> TransactionStatements {
        TransactionStatements {
            begin: "BEGIN",
            commit: "COMMIT",
            rollback: "ROLLBACK",
        }
    }
}
