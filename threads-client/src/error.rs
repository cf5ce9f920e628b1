use thiserror::Error;

/// Errors returned by `threads-client`.
#[derive(Debug, Error)]
pub enum ThreadsClientError {
    /// Transport failure or an undecodable response (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or rejected token, or the caller is not the owner.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested post or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Username or email already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Validation failure or any other non-success answer.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result of `threads-client` operations.
pub type ThreadsClientResult<T> = Result<T, ThreadsClientError>;

impl ThreadsClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized(message)
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            reqwest::StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }

    /// A protected call was attempted before `signup`/`login`.
    pub(crate) fn no_session() -> Self {
        Self::Unauthorized("not logged in".to_string())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::ThreadsClientError;

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(
            ThreadsClientError::from_http_status(StatusCode::UNAUTHORIZED, None),
            ThreadsClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ThreadsClientError::from_http_status(StatusCode::NOT_FOUND, None),
            ThreadsClientError::NotFound(_)
        ));
        assert!(matches!(
            ThreadsClientError::from_http_status(StatusCode::CONFLICT, None),
            ThreadsClientError::Conflict(_)
        ));

        let err = ThreadsClientError::from_http_status(
            StatusCode::BAD_REQUEST,
            Some("text field is required".to_string()),
        );
        assert_eq!(err.to_string(), "invalid request: text field is required");
    }
}
