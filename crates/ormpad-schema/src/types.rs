//! Scalar type definitions for the catalog.

/// Scalar column types supported by the playground schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// Auto-incrementing integer primary key.
    Serial,
    /// Signed integer.
    Int,
    /// Boolean value.
    Bool,
    /// Fixed-precision decimal.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after the decimal point.
        scale: u8,
    },
    /// Length-limited string.
    Char {
        /// Maximum number of characters.
        max_length: u32,
    },
    /// Unbounded text.
    Text,
    /// Validated e-mail address; stored as text, but a distinct type.
    Email,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
}

impl ScalarType {
    /// The SQLite column type this scalar is stored as.
    pub fn storage_type(&self) -> &'static str {
        match self {
            ScalarType::Serial | ScalarType::Int => "INTEGER",
            ScalarType::Bool => "BOOLEAN",
            ScalarType::Decimal { .. } => "DECIMAL",
            ScalarType::Char { .. } => "VARCHAR",
            ScalarType::Text | ScalarType::Email => "TEXT",
            ScalarType::Date => "DATE",
            ScalarType::DateTime => "DATETIME",
        }
    }

    /// User-facing label for the schema listing.
    ///
    /// Class-specific labels win (an Email field is labeled distinctly
    /// from a plain Text field even though both are stored as TEXT),
    /// then the storage-type label, then the raw storage type name.
    pub fn display_label(&self) -> String {
        match self.class_label().or_else(|| storage_label(self.storage_type())) {
            Some(label) => label.to_string(),
            None => self.storage_type().to_string(),
        }
    }

    /// Label keyed by the exact field class, if one exists.
    fn class_label(&self) -> Option<&'static str> {
        match self {
            ScalarType::Email => Some("Email"),
            ScalarType::Serial => Some("ID"),
            _ => None,
        }
    }

    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Serial | ScalarType::Int | ScalarType::Decimal { .. }
        )
    }
}

/// Label keyed by the underlying storage type.
fn storage_label(storage: &str) -> Option<&'static str> {
    match storage {
        "VARCHAR" => Some("Character"),
        "INTEGER" => Some("Integer"),
        "BOOLEAN" => Some("Boolean"),
        "DECIMAL" => Some("Decimal"),
        "TEXT" => Some("Text"),
        "DATE" => Some("Date"),
        "DATETIME" => Some("DateTime"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_label_is_distinct_from_text() {
        assert_eq!(ScalarType::Email.display_label(), "Email");
        assert_eq!(ScalarType::Text.display_label(), "Text");
        assert_eq!(ScalarType::Email.storage_type(), ScalarType::Text.storage_type());
    }

    #[test]
    fn test_storage_fallback_labels() {
        assert_eq!(ScalarType::Char { max_length: 100 }.display_label(), "Character");
        assert_eq!(
            ScalarType::Decimal {
                precision: 6,
                scale: 2
            }
            .display_label(),
            "Decimal"
        );
        assert_eq!(ScalarType::Serial.display_label(), "ID");
    }

    #[test]
    fn test_numeric_check() {
        assert!(ScalarType::Int.is_numeric());
        assert!(ScalarType::Decimal {
            precision: 6,
            scale: 2
        }
        .is_numeric());
        assert!(!ScalarType::Email.is_numeric());
    }
}
