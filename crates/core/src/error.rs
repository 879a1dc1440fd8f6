use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed request input (blank names, unknown enum values, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The workflow validation rules ran and reported violations.
    #[error("Workflow validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    /// An action was attempted from a status that does not permit it.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
