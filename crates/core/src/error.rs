use crate::types::VersionNumber;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Version conflict: expected version {expected}, found {actual}")]
    VersionConflict {
        expected: VersionNumber,
        actual: VersionNumber,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a `NotFound` keyed by a numeric id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: format!("with id {id}"),
        }
    }

    /// Shorthand for a `NotFound` keyed by a page path.
    pub fn path_not_found(entity: &'static str, path: &str) -> Self {
        Self::NotFound {
            entity,
            key: format!("at path '{path}'"),
        }
    }
}
