//! Error types for the criteria engine and connection descriptors.

use thiserror::Error;

/// Main error type for criteria rendering and descriptor operations.
#[derive(Error, Debug)]
pub enum CriteriaError {
    /// Configuration error (invalid YAML, missing fields, unknown engine, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A dialect capability was requested from a descriptor that lacks it.
    #[error("Unsupported operation '{operation}' on connection {connection}")]
    UnsupportedCapability {
        operation: &'static str,
        connection: String,
    },

    /// An expression is missing a field required to render it.
    #[error("Invalid {expression}: missing or empty {field}")]
    InvalidConstruction {
        expression: String,
        field: &'static str,
    },

    /// Two multi-joins reference the same mapping without distinguishing aliases.
    #[error("Ambiguous multi-join against mapping '{mapping}' (alias: {alias:?}) - give each join a distinct alias")]
    AmbiguousMultiJoin {
        mapping: String,
        alias: Option<String>,
    },

    /// A property name has no column in the class mapping.
    #[error("Mapping '{mapping}' has no column for property '{property}'")]
    UnknownProperty { mapping: String, property: String },

    /// A mapping id does not belong to the registry it was resolved against.
    #[error("Unknown class mapping id {0}")]
    UnknownMapping(usize),

    /// Placeholder count in the SQL text does not match the bound values.
    #[error("Parameter mismatch: SQL has {placeholders} placeholder(s) but {values} value(s) were supplied")]
    ParameterMismatch { placeholders: usize, values: usize },

    /// Identifier failed validation.
    #[error("Invalid identifier: {0}")]
    Identifier(String),

    /// IO error (config file loading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CriteriaError {
    /// Create an UnsupportedCapability error naming the operation and the connection.
    pub fn unsupported(operation: &'static str, connection: impl Into<String>) -> Self {
        CriteriaError::UnsupportedCapability {
            operation,
            connection: connection.into(),
        }
    }

    /// Create an InvalidConstruction error naming the expression and the offending field.
    pub fn invalid(expression: impl Into<String>, field: &'static str) -> Self {
        CriteriaError::InvalidConstruction {
            expression: expression.into(),
            field,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for criteria operations.
pub type Result<T> = std::result::Result<T, CriteriaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_operation_and_connection() {
        let err = CriteriaError::unsupported("Modulus", "odbc://reports");
        let msg = err.to_string();
        assert!(msg.contains("Modulus"));
        assert!(msg.contains("odbc://reports"));
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "descriptor.yaml");
        let err = CriteriaError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error"));
        assert!(detailed.contains("descriptor.yaml"));
    }
}
