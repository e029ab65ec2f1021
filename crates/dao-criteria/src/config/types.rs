//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection target for one descriptor.
///
/// Which fields are required depends on `type`: network engines need
/// `host`, `database` and `user`; ODBC needs `connection_string`.
#[derive(Clone, Serialize, Deserialize)]
pub struct DescriptorConfig {
    /// Engine type ("postgres", "mssql", "mysql", "odbc" or an alias).
    pub r#type: String,

    /// Database host.
    #[serde(default)]
    pub host: String,

    /// Database port (default depends on the engine).
    #[serde(default)]
    pub port: Option<u16>,

    /// Database name.
    #[serde(default)]
    pub database: String,

    /// Username.
    #[serde(default)]
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Whether connections should be pooled (default: true).
    #[serde(default = "default_true")]
    pub pooling: bool,

    /// Encrypt connection (default: "true"). Accepts true/false/yes/no/1/0/disable.
    #[serde(default = "default_true_string")]
    pub encrypt: String,

    /// Trust server certificate (default: false).
    #[serde(default)]
    pub trust_server_cert: bool,

    /// Full ODBC connection string.
    #[serde(default)]
    pub connection_string: Option<String>,
}

impl DescriptorConfig {
    /// Whether `encrypt` asks for an encrypted connection. Unrecognised values do.
    pub fn encrypt_enabled(&self) -> bool {
        !matches!(
            self.encrypt.to_lowercase().as_str(),
            "false" | "no" | "0" | "disable"
        )
    }
}

// Custom Debug implementation to redact the password
impl fmt::Debug for DescriptorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorConfig")
            .field("type", &self.r#type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("pooling", &self.pooling)
            .field("encrypt", &self.encrypt)
            .field("trust_server_cert", &self.trust_server_cert)
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

fn default_true() -> bool {
    true
}

fn default_true_string() -> String {
    "true".to_string()
}
