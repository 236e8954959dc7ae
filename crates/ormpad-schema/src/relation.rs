//! Relation definitions between entities.

/// How two entities reference each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Foreign key on the declaring side (many records point at one).
    ManyToOne,
    /// Unique foreign key (one record points at one).
    OneToOne,
    /// Requires a join entity; not used by the bookstore schema but
    /// classified by the introspector for completeness.
    ManyToMany,
}

/// Behavior when the referenced record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBehavior {
    /// Delete dependent records.
    Cascade,
    /// Refuse the delete while dependents exist.
    Restrict,
    /// Null out the foreign key.
    SetNull,
}

/// A relation declared on the foreign-key side.
///
/// The reverse side is inferred: the target entity exposes the relation
/// under `accessor` (e.g. `Author.books` for the `Book.author` key).
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDef {
    /// Forward name, as queried from the declaring entity ("author").
    pub name: String,
    /// Entity carrying the foreign key ("Book").
    pub from_entity: String,
    /// Foreign-key column on the declaring entity ("author_id").
    pub from_field: String,
    /// Target entity ("Author").
    pub to_entity: String,
    /// Referenced column on the target entity (usually "id").
    pub to_field: String,
    /// Reverse accessor exposed on the target entity ("books").
    pub accessor: String,
    /// Relation cardinality.
    pub kind: RelationKind,
    /// Delete behavior.
    pub on_delete: DeleteBehavior,
}

impl RelationDef {
    /// Declare a many-to-one (foreign key) relation.
    pub fn many_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        accessor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            from_field: from_field.into(),
            to_entity: to_entity.into(),
            to_field: "id".to_string(),
            accessor: accessor.into(),
            kind: RelationKind::ManyToOne,
            on_delete: DeleteBehavior::Restrict,
        }
    }

    /// Declare a one-to-one relation.
    pub fn one_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        accessor: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationKind::OneToOne,
            ..Self::many_to_one(name, from_entity, from_field, to_entity, accessor)
        }
    }

    /// Set the delete behavior.
    pub fn with_on_delete(mut self, on_delete: DeleteBehavior) -> Self {
        self.on_delete = on_delete;
        self
    }
}
