use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Protected record: {0}")]
    Protected(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("No id left above the largest stored id")]
    IdExhausted,
}

impl CoreError {
    /// Not-found error for an entity addressed by its numeric id.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Not-found error for an entity addressed by a string key or username.
    pub fn not_found_key(entity: &'static str, key: &str) -> Self {
        Self::NotFound {
            entity,
            id: key.to_string(),
        }
    }
}
