//! Cryptographic adapters for chatrelay.
//!
//! - `jwt`: HS256 access tokens (issue + verify)
//! - `password`: Argon2id password hashing in PHC string format

pub mod jwt;
pub mod password;
