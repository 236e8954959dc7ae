//! Schema introspection for the playground sidebar.
//!
//! Walks the declarative catalog and produces an ordered, classified
//! description of every field: scalar labels with size and nullability
//! markers, relation kinds, and reverse accessors.

use serde::Serialize;

use crate::entity::EntityDef;
use crate::field::FieldDef;
use crate::registry::{AppSchema, SchemaRegistry};
use crate::relation::{RelationDef, RelationKind};
use crate::types::ScalarType;

/// One field in the schema listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    /// Display name; for reverse relations this is the accessor name.
    pub name: String,
    /// User-facing type label, e.g. `"Character (100)"` or
    /// `"Foreign Key"`.
    pub data_type: String,
    /// Name of the related entity, for relation fields.
    pub related_model: Option<String>,
    /// Declared reverse accessor, for relation fields.
    pub related_name: Option<String>,
    /// Whether this field is a relation.
    pub is_relation: bool,
    /// Whether the relation is seen from the reverse side.
    pub is_reverse: bool,
}

/// One entity in the schema listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityInfo {
    /// Entity name.
    pub name: String,
    /// Sorted field descriptions.
    pub fields: Vec<FieldInfo>,
}

/// Describe every entity registered under `app`.
///
/// Returns an empty listing when the app is not registered; a
/// misconfigured registry must never fail the page render.
pub fn describe_schema(registry: &SchemaRegistry, app: &str) -> Vec<EntityInfo> {
    let Some(schema) = registry.get(app) else {
        tracing::warn!(app, "schema app not registered, returning empty listing");
        return Vec::new();
    };

    schema
        .entities
        .iter()
        .map(|entity| describe_entity(schema, entity))
        .collect()
}

/// Describe a single entity: scalar columns (foreign-key columns folded
/// into their relation entry), forward relations, reverse relations.
pub fn describe_entity(schema: &AppSchema, entity: &EntityDef) -> EntityInfo {
    let forward: Vec<&RelationDef> = schema.relations_from(&entity.name).collect();
    let mut fields = Vec::new();

    for field in &entity.fields {
        if forward.iter().any(|r| r.from_field == field.name) {
            continue;
        }
        fields.push(FieldInfo {
            name: field.name.clone(),
            data_type: scalar_label(field),
            related_model: None,
            related_name: None,
            is_relation: false,
            is_reverse: false,
        });
    }

    for rel in &forward {
        fields.push(FieldInfo {
            name: rel.name.clone(),
            data_type: relation_label(rel.kind, false).to_string(),
            related_model: Some(rel.to_entity.clone()),
            related_name: Some(rel.accessor.clone()),
            is_relation: true,
            is_reverse: false,
        });
    }

    for rel in schema.relations_to(&entity.name) {
        fields.push(FieldInfo {
            name: rel.accessor.clone(),
            data_type: relation_label(rel.kind, true).to_string(),
            related_model: Some(rel.from_entity.clone()),
            related_name: Some(rel.accessor.clone()),
            is_relation: true,
            is_reverse: true,
        });
    }

    // Regular columns first, then forward relations, then reverse
    // relations; alphabetical within each group.
    fields.sort_by(|a, b| {
        (a.is_relation, a.is_reverse, &a.name).cmp(&(b.is_relation, b.is_reverse, &b.name))
    });

    EntityInfo {
        name: entity.name.clone(),
        fields,
    }
}

/// Classify a relation, first matching predicate wins: many-to-many,
/// one-to-many (the reverse side of a foreign key), one-to-one,
/// many-to-one.
fn relation_label(kind: RelationKind, reverse: bool) -> &'static str {
    if kind == RelationKind::ManyToMany {
        "ManyToMany"
    } else if kind == RelationKind::ManyToOne && reverse {
        "Reverse ManyToOne"
    } else if kind == RelationKind::OneToOne {
        "OneToOne"
    } else {
        "Foreign Key"
    }
}

/// Render the label for a scalar field, with size metadata and a
/// nullability marker.
fn scalar_label(field: &FieldDef) -> String {
    let mut label = field.scalar.display_label();

    match field.scalar {
        ScalarType::Char { max_length } => {
            label.push_str(&format!(" ({})", max_length));
        }
        ScalarType::Decimal { precision, scale } => {
            label.push_str(&format!(" ({}, {})", precision, scale));
        }
        _ => {}
    }

    if !field.required {
        label.push_str(" (null)");
    }

    label
}
