//! Infrastructure layer for chatrelay.
//!
//! Contains implementations of the port traits defined in `chatrelay-core`:
//! SQLite session and user stores, the Bedrock Agent Runtime backend, JWT and
//! Argon2 credential adapters, and the configuration loader.

pub mod bedrock;
pub mod config;
pub mod crypto;
pub mod sqlite;
