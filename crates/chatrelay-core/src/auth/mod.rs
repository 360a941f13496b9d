//! Caller identity and credential abstractions.
//!
//! The JWT and Argon2 adapters live in chatrelay-infra.

pub mod password;
pub mod token;
