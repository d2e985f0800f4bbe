use thiserror::Error;

/// Content tree rejected at construction. These are never auto-repaired;
/// the upstream extraction step owns the fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("topic label is empty")]
    EmptyTopic,
    #[error("node `{0}` has an empty label")]
    EmptyLabel(String),
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
    #[error("node id `{0}` collides with a reserved id")]
    ReservedId(String),
    #[error("node `{id}` references missing parent `{parent}`")]
    DanglingParent { id: String, parent: String },
    #[error("parent cycle detected through node `{0}`")]
    Cycle(String),
    #[error("duplicate sibling order {order} under `{parent}`")]
    DuplicateOrder { parent: String, order: u32 },
    #[error("relation references unknown node `{0}`")]
    DanglingRelation(String),
    #[error("{0}")]
    Structure(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The category tag is outside the closed set. No fallback category is
    /// ever substituted; the caller must surface the ambiguity.
    #[error("unsupported diagram category `{0}`")]
    UnsupportedCategory(String),
}
