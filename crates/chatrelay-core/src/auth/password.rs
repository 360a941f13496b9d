//! CredentialHasher trait for password storage.
//!
//! Defined in chatrelay-core so `UserService` can hash and check passwords
//! without coupling to a specific algorithm. The Argon2 adapter lives in
//! chatrelay-infra.

/// Abstraction over one-way password hashing.
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` into a self-describing string (salt included).
    fn hash_password(&self, password: &str) -> Result<String, String>;

    /// Check `password` against a string produced by `hash_password`.
    /// Malformed hashes verify as `false`.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
