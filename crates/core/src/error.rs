use crate::types::DbId;

/// Domain error taxonomy.
///
/// `Validation` and `NotFound` surface verbatim to the admin form that
/// triggered the mutation. `Configuration` is raised by the content
/// resolver when a locale's homepage cannot be assembled and is meant
/// to fail a deploy, not a request.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
