//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::{CriteriaError, Result};
use std::path::Path;

impl DescriptorConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: DescriptorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Get the canonical engine type string.
    ///
    /// Normalizes the accepted aliases:
    /// - "postgres", "postgresql", "pg" → "postgres"
    /// - "mssql", "sqlserver", "sql_server" → "mssql"
    /// - "mysql", "mariadb" → "mysql" (requires `mysql` feature)
    /// - "odbc" → "odbc"
    pub fn normalize_type(db_type: &str) -> Result<&'static str> {
        match db_type.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok("postgres"),
            "mssql" | "sqlserver" | "sql_server" => Ok("mssql"),
            #[cfg(feature = "mysql")]
            "mysql" | "mariadb" => Ok("mysql"),
            "odbc" => Ok("odbc"),
            other => {
                #[cfg(feature = "mysql")]
                let supported = "postgres, mssql, mysql, odbc";
                #[cfg(not(feature = "mysql"))]
                let supported = "postgres, mssql, odbc (enable 'mysql' feature for MySQL support)";
                Err(CriteriaError::Config(format!(
                    "Unknown database type: '{}'. Supported types: {}",
                    other, supported
                )))
            }
        }
    }

    /// Configured port, or the engine's default when none is set.
    pub fn port_or_default(&self) -> u16 {
        if let Some(port) = self.port {
            return port;
        }
        match Self::normalize_type(&self.r#type) {
            Ok("mssql") => 1433,
            Ok("mysql") => 3306,
            _ => 5432,
        }
    }

    /// Credential-free identifier of the target, used in errors and logs.
    pub fn connection_id(&self) -> String {
        let engine = Self::normalize_type(&self.r#type).unwrap_or("unknown");
        if engine == "odbc" {
            let dsn = self
                .connection_string
                .as_deref()
                .and_then(odbc_dsn)
                .unwrap_or("-");
            return format!("odbc://{}", dsn);
        }
        format!(
            "{}://{}@{}:{}/{}",
            engine,
            self.user,
            self.host,
            self.port_or_default(),
            self.database
        )
    }
}

/// The `DSN=` or `Server=` value of an ODBC connection string.
pub(crate) fn odbc_dsn(connection_string: &str) -> Option<&str> {
    connection_string.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        (key.eq_ignore_ascii_case("dsn") || key.eq_ignore_ascii_case("server"))
            .then(|| value.trim())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_yaml_defaults() {
        let config = DescriptorConfig::from_yaml(
            "type: sqlserver\nhost: db1\ndatabase: sales\nuser: sa\npassword: pw\n",
        )
        .unwrap();
        assert!(config.pooling);
        assert!(config.encrypt_enabled());
        assert!(!config.trust_server_cert);
        assert_eq!(config.port_or_default(), 1433);
        assert_eq!(config.connection_id(), "mssql://sa@db1:1433/sales");
    }

    #[test]
    fn test_connection_id_omits_password() {
        let config = DescriptorConfig::from_yaml(
            "type: pg\nhost: db\nport: 6543\ndatabase: app\nuser: u\npassword: hunter2\n",
        )
        .unwrap();
        assert_eq!(config.connection_id(), "postgres://u@db:6543/app");
        assert!(!config.connection_id().contains("hunter2"));
    }

    #[test]
    fn test_odbc_connection_id() {
        let config = DescriptorConfig::from_yaml(
            "type: odbc\nconnection_string: \"DSN=warehouse;UID=u;PWD=secret\"\n",
        )
        .unwrap();
        assert_eq!(config.connection_id(), "odbc://warehouse");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "type: postgres\nhost: localhost\ndatabase: app\nuser: app\npassword: pw\npooling: false"
        )
        .unwrap();

        let config = DescriptorConfig::load(file.path()).unwrap();
        assert!(!config.pooling);
        assert_eq!(config.port_or_default(), 5432);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            DescriptorConfig::load(&missing),
            Err(CriteriaError::Io(_))
        ));

        assert!(matches!(
            DescriptorConfig::from_yaml("host: [unterminated"),
            Err(CriteriaError::Yaml(_))
        ));
        assert!(matches!(
            DescriptorConfig::from_yaml("type: postgres\nhost: db\n"),
            Err(CriteriaError::Config(_))
        ));
    }

    #[test]
    fn test_normalize_type() {
        assert_eq!(DescriptorConfig::normalize_type("PostgreSQL").unwrap(), "postgres");
        assert_eq!(DescriptorConfig::normalize_type("sql_server").unwrap(), "mssql");
        assert_eq!(DescriptorConfig::normalize_type("ODBC").unwrap(), "odbc");
        assert!(DescriptorConfig::normalize_type("oracle").is_err());
    }
}
