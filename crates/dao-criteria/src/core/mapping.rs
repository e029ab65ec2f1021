//! Class mapping metadata: property-name to column resolution.
//!
//! Expressions never hold a mapping directly. A multi-join names its "other"
//! source through a [`MappingId`], which the SQL layer resolves against the
//! [`MappingRegistry`] that owns the metadata.

use std::fmt;

use crate::error::{CriteriaError, Result};

use super::identifier::validate_identifier;

/// Non-owning handle to a [`ClassMapping`] stored in a [`MappingRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingId(usize);

impl MappingId {
    /// Raw registry index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MappingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a data object type maps onto a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    /// Name of the mapped object type (e.g. "Person").
    pub name: String,
    /// Table (optionally schema-qualified) backing the type.
    pub table: String,
    /// Property to column pairs, in select-list order.
    columns: Vec<(String, String)>,
}

impl ClassMapping {
    /// Create a mapping with no columns yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name fails identifier validation.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_identifier(&table)?;
        Ok(Self {
            name: name.into(),
            table,
            columns: Vec::new(),
        })
    }

    /// Add a property/column pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the column name fails identifier validation or the
    /// property is already mapped.
    pub fn with_column(
        mut self,
        property: impl Into<String>,
        column: impl Into<String>,
    ) -> Result<Self> {
        let property = property.into();
        let column = column.into();
        validate_identifier(&column)?;
        if self.columns.iter().any(|(p, _)| *p == property) {
            return Err(CriteriaError::Config(format!(
                "mapping '{}' already maps property '{}'",
                self.name, property
            )));
        }
        self.columns.push((property, column));
        Ok(self)
    }

    /// Resolve a property to its column.
    pub fn column_for(&self, property: &str) -> Result<&str> {
        self.columns
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, c)| c.as_str())
            .ok_or_else(|| CriteriaError::UnknownProperty {
                mapping: self.name.clone(),
                property: property.to_string(),
            })
    }

    /// All mapped columns, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }
}

/// Owner of every [`ClassMapping`] a query may reference.
#[derive(Debug, Default, Clone)]
pub struct MappingRegistry {
    mappings: Vec<ClassMapping>,
}

impl MappingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping and return its handle.
    pub fn register(&mut self, mapping: ClassMapping) -> MappingId {
        self.mappings.push(mapping);
        MappingId(self.mappings.len() - 1)
    }

    /// Look up a mapping.
    pub fn get(&self, id: MappingId) -> Option<&ClassMapping> {
        self.mappings.get(id.0)
    }

    /// Look up a mapping, failing if the id is foreign to this registry.
    pub fn require(&self, id: MappingId) -> Result<&ClassMapping> {
        self.get(id).ok_or(CriteriaError::UnknownMapping(id.0))
    }

    /// Number of registered mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether no mapping is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> ClassMapping {
        ClassMapping::new("Person", "people")
            .unwrap()
            .with_column("age", "age_years")
            .unwrap()
            .with_column("name", "full_name")
            .unwrap()
    }

    #[test]
    fn test_column_resolution() {
        let mapping = person();
        assert_eq!(mapping.column_for("age").unwrap(), "age_years");
        assert!(matches!(
            mapping.column_for("height"),
            Err(CriteriaError::UnknownProperty { .. })
        ));
        let cols: Vec<_> = mapping.columns().map(|(_, c)| c).collect();
        assert_eq!(cols, vec!["age_years", "full_name"]);
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let result = person().with_column("age", "other");
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_handles() {
        let mut registry = MappingRegistry::new();
        let a = registry.register(person());
        let b = registry.register(ClassMapping::new("Limit", "limits").unwrap());
        assert_ne!(a, b);
        assert_eq!(registry.require(b).unwrap().table, "limits");
        assert_eq!(registry.len(), 2);

        let other = MappingRegistry::new();
        assert!(matches!(other.require(a), Err(CriteriaError::UnknownMapping(0))));
    }
}
