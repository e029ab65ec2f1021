//! MySQL/MariaDB connection descriptor (Strategy pattern).
//!
//! MySQL keeps the `?` placeholder, has no sequences and spells modulus as a
//! function.

use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use tracing::debug;

use crate::config::DescriptorConfig;
use crate::core::binding::bind_positional;
use crate::core::identifier::quote_mysql;
use crate::core::{BoundCommand, ConnectionDescriptor, NativeConnection, Value};
use crate::error::{CriteriaError, Result};

/// MySQL/MariaDB descriptor.
#[derive(Debug, Clone)]
pub struct MysqlDescriptor {
    config: DescriptorConfig,
}

impl MysqlDescriptor {
    /// Create a descriptor from a validated `mysql` configuration.
    pub fn from_config(config: &DescriptorConfig) -> Result<Self> {
        config.validate()?;
        if DescriptorConfig::normalize_type(&config.r#type)? != "mysql" {
            return Err(CriteriaError::Config(format!(
                "MysqlDescriptor needs type 'mysql', got '{}'",
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

impl ConnectionDescriptor for MysqlDescriptor {
    fn name(&self) -> &str {
        "mysql"
    }

    fn connection_id(&self) -> String {
        self.config.connection_id()
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_mysql(name)
    }

    fn modulus_clause(&self, column: &str) -> Result<String> {
        Ok(format!("MOD({}, ?)", column))
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

    fn last_auto_generated_id_query(&self, _table: &str, _column: &str) -> String {
        "SELECT LAST_INSERT_ID()".to_string()
    }

    fn use_pooling(&self) -> bool {
        self.config.pooling
    }

    fn create_new_connection(&self) -> Result<NativeConnection> {
        let ssl_mode = if self.config.encrypt_enabled() {
            MySqlSslMode::Preferred
        } else {
            MySqlSslMode::Disabled
        };

        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port_or_default())
            .database(&self.config.database)
            .username(&self.config.user)
            .password(&self.config.password)
            .ssl_mode(ssl_mode);

        debug!("Created MySQL connection options for {}", self.connection_id());
        Ok(NativeConnection::Mysql(options))
    }

    fn bind_parameters(&self, sql: &str, params: &[Value]) -> Result<BoundCommand> {
        bind_positional(sql, params, |_| "?".to_string())
    }

    fn needs_explicit_column_aliases(&self) -> bool {
        true
    }

    fn needs_as_for_column_aliases(&self) -> bool {
        true
    }

    fn column_alias_prefix(&self) -> &str {
        "`"
    }

    fn column_alias_suffix(&self) -> &str {
        "`"
    }

    fn table_alias_prefix(&self) -> &str {
        "`"
    }

    fn table_alias_suffix(&self) -> &str {
        "`"
    }
}
