//! Token verification and issuance traits.

use chatrelay_types::error::AuthError;

/// Resolves a bearer token to the caller's user id.
///
/// Verification is CPU-only, so the trait is synchronous.
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` (with or without a `Bearer ` prefix) and return the
    /// user id it was issued for.
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Issues access tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `user_id`. The error is a human-readable reason.
    fn issue(&self, user_id: &str, email: &str) -> Result<String, String>;
}

/// Strip an optional `Bearer ` / `bearer ` scheme prefix from a header value.
pub fn strip_bearer(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Resolve an optional header value to a user id.
pub fn authenticate<V: TokenVerifier + ?Sized>(
    verifier: &V,
    header: Option<&str>,
) -> Result<String, AuthError> {
    let value = header.map(strip_bearer).filter(|t| !t.is_empty());
    match value {
        Some(token) => verifier.verify(token),
        None => Err(AuthError::MissingHeader),
    }
}
