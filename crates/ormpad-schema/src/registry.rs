//! Application schema registry.
//!
//! The registry is built once at startup from explicit declarations;
//! nothing is derived by runtime type inspection.

use super::entity::EntityDef;
use super::relation::RelationDef;

/// The schema of one application: its entities and relations.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSchema {
    /// Application label ("bookstore").
    pub app: String,
    /// Entity definitions, in registration order.
    pub entities: Vec<EntityDef>,
    /// Relations, declared on the foreign-key side.
    pub relations: Vec<RelationDef>,
}

impl AppSchema {
    /// Create an empty application schema.
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            entities: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Register an entity.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Register a relation.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Relations declared on this entity (it carries the foreign key).
    pub fn relations_from<'a, 'b>(
        &'a self,
        entity: &'b str,
    ) -> impl Iterator<Item = &'a RelationDef> + use<'a, 'b> {
        self.relations.iter().filter(move |r| r.from_entity == entity)
    }

    /// Relations pointing at this entity (the reverse side).
    pub fn relations_to<'a, 'b>(
        &'a self,
        entity: &'b str,
    ) -> impl Iterator<Item = &'a RelationDef> + use<'a, 'b> {
        self.relations.iter().filter(move |r| r.to_entity == entity)
    }

    /// Resolve a relation as referenced from `entity`, by forward name
    /// or reverse accessor. Returns the relation and whether it was
    /// reached from the reverse side.
    pub fn find_relation(&self, entity: &str, name: &str) -> Option<(&RelationDef, bool)> {
        if let Some(rel) = self
            .relations
            .iter()
            .find(|r| r.from_entity == entity && r.name == name)
        {
            return Some((rel, false));
        }
        self.relations
            .iter()
            .find(|r| r.to_entity == entity && r.accessor == name)
            .map(|r| (r, true))
    }
}

/// Registry of application schemas, keyed by app label.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    apps: Vec<AppSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an application schema.
    pub fn with_app(mut self, app: AppSchema) -> Self {
        self.apps.push(app);
        self
    }

    /// Look up an application schema by label.
    pub fn get(&self, app: &str) -> Option<&AppSchema> {
        self.apps.iter().find(|a| a.app == app)
    }
}
