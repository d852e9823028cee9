//! Error shared by every external collaborator port.

/// Failure reported by a collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// The collaborator could not be reached or refused the call.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The referenced item does not exist downstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// The collaborator answered with something we cannot use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl CollaboratorError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        CollaboratorError::Unavailable(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CollaboratorError::NotFound(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        CollaboratorError::InvalidResponse(message.into())
    }

    /// Whether repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollaboratorError::Unavailable(_) | CollaboratorError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_are_retryable() {
        assert!(CollaboratorError::unavailable("503").is_retryable());
        assert!(CollaboratorError::Timeout { timeout_secs: 60 }.is_retryable());
        assert!(!CollaboratorError::not_found("215").is_retryable());
        assert!(!CollaboratorError::invalid_response("bad json").is_retryable());
    }

    #[test]
    fn display_includes_detail() {
        assert_eq!(
            CollaboratorError::not_found("management id 215").to_string(),
            "not found: management id 215"
        );
    }
}
