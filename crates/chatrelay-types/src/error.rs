use thiserror::Error;

/// Errors from session and user store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("duplicate key: '{0}'")]
    DuplicateKey(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors raised while resolving a caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Auth failed: No authorization header")]
    MissingHeader,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Authentication required")]
    MissingSubject,
}

/// Errors from the agent backend while opening or consuming a stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// The backend signalled rate limiting.
    #[error("throttlingException: {0}")]
    Throttled(String),

    #[error("agent backend error: {0}")]
    Backend(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("fragment decode error: {0}")]
    Decode(String),

    #[error("agent backend is not configured")]
    NotConfigured,
}

/// Failure of one relay run.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The backend failed before the stream was exhausted.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The terminal write could not be persisted.
    #[error("terminal write failed: {0}")]
    Store(#[from] StoreError),
}

/// Errors from login and user management.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token issuance failed: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
        let dup = StoreError::DuplicateKey("abc".to_string());
        assert_eq!(dup.to_string(), "duplicate key: 'abc'");
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(AuthError::Expired.to_string(), "Token expired");
        assert_eq!(AuthError::Invalid.to_string(), "Invalid token");
        assert_eq!(AuthError::MissingSubject.to_string(), "Authentication required");
    }

    #[test]
    fn test_throttled_display_carries_signal() {
        let err = AgentError::Throttled("Rate exceeded".to_string());
        assert!(err.to_string().starts_with("throttlingException"));
    }

    #[test]
    fn test_relay_error_from_agent_is_transparent() {
        let err: RelayError = AgentError::Backend("boom".to_string()).into();
        assert_eq!(err.to_string(), "agent backend error: boom");
    }
}
