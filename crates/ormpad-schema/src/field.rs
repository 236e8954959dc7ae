//! Field definitions for entities.

use super::types::ScalarType;

/// A field definition within an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Scalar type.
    pub scalar: ScalarType,
    /// Whether the field is required (NOT NULL).
    pub required: bool,
    /// Whether the field has a unique constraint.
    pub unique: bool,
    /// Inclusive value range enforced with a CHECK constraint.
    pub check_range: Option<(i64, i64)>,
    /// Default value applied when a create omits the field.
    pub default: Option<DefaultValue>,
}

/// Default value for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    Str(String),
    /// Current timestamp, evaluated at insert time.
    CurrentTimestamp,
}

impl FieldDef {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar,
            required: true,
            unique: false,
            check_range: None,
            default: None,
        }
    }

    /// Create an optional field (nullable).
    pub fn optional(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            required: false,
            ..Self::new(name, scalar)
        }
    }

    /// Create the auto-incrementing primary key field.
    pub fn serial(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Serial)
    }

    /// Mark the field unique.
    pub fn with_unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Constrain the field to an inclusive range.
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.check_range = Some((min, max));
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Check if this field has a default value.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let field = FieldDef::new("email", ScalarType::Email).with_unique();
        assert_eq!(field.name, "email");
        assert!(field.required);
        assert!(field.unique);
        assert!(!field.has_default());
    }

    #[test]
    fn test_optional_field() {
        let field = FieldDef::optional("birth_date", ScalarType::Date);
        assert!(!field.required);
    }

    #[test]
    fn test_range_field() {
        let field = FieldDef::new("score", ScalarType::Int).with_range(1, 5);
        assert_eq!(field.check_range, Some((1, 5)));
    }
}
