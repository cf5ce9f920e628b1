use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    /// The actor is not the owner of the resource it tries to act on.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub(crate) fn post_not_found(id: i64) -> Self {
        Self::NotFound(format!("post id: {id}"))
    }

    pub(crate) fn user_not_found(key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("user {key}"))
    }
}
