//! Generic ODBC connection descriptor.
//!
//! Speaks plain standard SQL: every optional capability keeps the trait
//! default, so engine-specific clauses report `UnsupportedCapability`.

use tracing::debug;

use crate::config::{odbc_dsn, DescriptorConfig};
use crate::core::binding::bind_positional;
use crate::core::identifier::quote_pg;
use crate::core::{BoundCommand, ConnectionDescriptor, NativeConnection, Value};
use crate::error::{CriteriaError, Result};

/// Standard-SQL descriptor over an ODBC connection string.
#[derive(Clone)]
pub struct OdbcDescriptor {
    connection_string: String,
    pooling: bool,
}

impl OdbcDescriptor {
    /// Create a pooled descriptor for `connection_string`.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            pooling: true,
        }
    }

    #[must_use]
    pub fn with_pooling(mut self, pooling: bool) -> Self {
        self.pooling = pooling;
        self
    }

    /// Create a descriptor from a validated `odbc` configuration.
    pub fn from_config(config: &DescriptorConfig) -> Result<Self> {
        config.validate()?;
        if DescriptorConfig::normalize_type(&config.r#type)? != "odbc" {
            return Err(CriteriaError::Config(format!(
                "OdbcDescriptor needs type 'odbc', got '{}'",
                config.r#type
            )));
        }
        let connection_string = config
            .connection_string
            .clone()
            .ok_or_else(|| CriteriaError::Config("connection_string is required for odbc".into()))?;
        Ok(Self::new(connection_string).with_pooling(config.pooling))
    }
}

// The connection string may carry credentials
impl std::fmt::Debug for OdbcDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdbcDescriptor")
            .field("connection", &self.connection_id())
            .field("pooling", &self.pooling)
            .finish()
    }
}

impl ConnectionDescriptor for OdbcDescriptor {
    fn name(&self) -> &str {
        "odbc"
    }

    fn connection_id(&self) -> String {
        format!(
            "odbc://{}",
            odbc_dsn(&self.connection_string).unwrap_or("-")
        )
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_pg(name)
    }

    fn use_pooling(&self) -> bool {
        self.pooling
    }

    fn create_new_connection(&self) -> Result<NativeConnection> {
        debug!("Created ODBC connection string for {}", self.connection_id());
        Ok(NativeConnection::Odbc(self.connection_string.clone()))
    }

    fn bind_parameters(&self, sql: &str, params: &[Value]) -> Result<BoundCommand> {
        bind_positional(sql, params, |_| "?".to_string())
    }

    fn needs_explicit_column_aliases(&self) -> bool {
        false
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
}
