//! Declarative schema catalog for the ormpad playground.
//!
//! Entities, fields, and relations are declared explicitly at startup
//! and registered per application; the introspector renders them into
//! the sorted field listing shown next to the editor.

pub mod bookstore;
pub mod entity;
pub mod field;
pub mod introspect;
pub mod registry;
pub mod relation;
pub mod types;

pub use bookstore::bookstore;
pub use entity::EntityDef;
pub use field::{DefaultValue, FieldDef};
pub use introspect::{describe_entity, describe_schema, EntityInfo, FieldInfo};
pub use registry::{AppSchema, SchemaRegistry};
pub use relation::{DeleteBehavior, RelationDef, RelationKind};
pub use types::ScalarType;
