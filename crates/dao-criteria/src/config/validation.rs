//! Configuration validation.

use super::DescriptorConfig;
use crate::error::{CriteriaError, Result};

/// Validate a descriptor configuration.
pub fn validate(config: &DescriptorConfig) -> Result<()> {
    let engine = DescriptorConfig::normalize_type(&config.r#type)?;

    if engine == "odbc" {
        match &config.connection_string {
            Some(s) if !s.trim().is_empty() => return Ok(()),
            _ => {
                return Err(CriteriaError::Config(
                    "connection_string is required for odbc".into(),
                ))
            }
        }
    }

    if config.host.is_empty() {
        return Err(CriteriaError::Config("host is required".into()));
    }
    if config.database.is_empty() {
        return Err(CriteriaError::Config("database is required".into()));
    }
    if config.user.is_empty() {
        return Err(CriteriaError::Config("user is required".into()));
    }
    if let Some(0) = config.port {
        return Err(CriteriaError::Config("port must be between 1 and 65535".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DescriptorConfig {
        DescriptorConfig {
            r#type: "postgres".to_string(),
            host: "localhost".to_string(),
            port: Some(5432),
            database: "app".to_string(),
            user: "app".to_string(),
            password: "password".to_string(),
            pooling: true,
            encrypt: "false".to_string(),
            trust_server_cert: false,
            connection_string: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_host() {
        let mut config = valid_config();
        config.host = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_port() {
        let mut config = valid_config();
        config.port = Some(0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unknown_type() {
        let mut config = valid_config();
        config.r#type = "oracle".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown database type: 'oracle'"));
    }

    #[test]
    fn test_odbc_needs_connection_string_only() {
        let mut config = valid_config();
        config.r#type = "odbc".to_string();
        assert!(validate(&config).is_err());

        config.host.clear();
        config.connection_string = Some("DSN=warehouse".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = valid_config();
        config.password = "super_secret_password_123".to_string();
        let debug_output = format!("{:?}", config);
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("super_secret_password_123"),
            "Debug output should not contain actual password value"
        );
    }
}
