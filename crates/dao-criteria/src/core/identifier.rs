//! Identifier and alias validation for SQL text assembled from mapping metadata.
//!
//! Table names, column names and aliases cannot be bound as parameters, so the
//! SQL layer splices them into the statement text. Everything that reaches the
//! text this way goes through one of the checks here first, and table and
//! column names are then quoted with the engine's identifier quotes.

use crate::error::{CriteriaError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - SQL Server: 128 characters
/// - MySQL: 64 characters
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers containing statement separators or comment markers
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `CriteriaError::Identifier` for invalid identifiers with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CriteriaError::Identifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(CriteriaError::Identifier(format!(
            "identifier contains null byte: {:?}",
            name
        )));
    }

    if name.contains(';') || name.contains("--") || name.contains("/*") {
        return Err(CriteriaError::Identifier(format!(
            "identifier contains statement separator or comment marker: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CriteriaError::Identifier(format!(
            "identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Validate a table or column alias.
///
/// Aliases are wrapped in the descriptor's alias tokens verbatim, so they are
/// restricted to ASCII letters, digits and underscores, starting with a letter
/// or underscore.
pub fn validate_alias(alias: &str) -> Result<()> {
    validate_identifier(alias)?;

    let mut chars = alias.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CriteriaError::Identifier(format!(
            "alias must be alphanumeric/underscore and start with a letter: {:?}",
            alias
        )));
    }

    Ok(())
}

/// Quote a PostgreSQL (or standard SQL) identifier using double quotes.
///
/// Escapes double quotes by doubling them and wraps in double quotes.
/// Validates the identifier before quoting.
pub fn quote_pg(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote a MySQL identifier using backticks.
///
/// Escapes backticks by doubling them and wraps in backticks.
/// Validates the identifier before quoting.
pub fn quote_mysql(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Quote a SQL Server identifier using brackets.
///
/// Escapes closing brackets by doubling them and wraps in brackets.
/// Validates the identifier before quoting.
pub fn quote_mssql(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("[{}]", name.replace(']', "]]")))
}

/// Quote a value as a single-quoted SQL string literal.
///
/// Used where engines demand a literal instead of an identifier, such as
/// PostgreSQL's `nextval('sequence')`.
pub fn quote_literal(value: &str) -> Result<String> {
    validate_identifier(value)?;
    Ok(format!("'{}'", value.replace('\'', "''")))
}
