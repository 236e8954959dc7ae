//! Entity definitions.

use super::field::FieldDef;

/// An entity definition (one table).
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDef {
    /// Entity name, as used in snippets ("Book").
    pub name: String,
    /// Backing table name ("book").
    pub table: String,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check whether a column exists on this entity.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Names of all columns, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarType;

    #[test]
    fn test_entity_builder() {
        let entity = EntityDef::new("Author", "author")
            .with_field(FieldDef::serial("id"))
            .with_field(FieldDef::new("email", ScalarType::Email).with_unique());

        assert_eq!(entity.table, "author");
        assert!(entity.has_field("email"));
        assert!(!entity.has_field("isbn"));
        assert_eq!(entity.field_names().collect::<Vec<_>>(), vec!["id", "email"]);
    }
}
