//! Shared domain types for chatrelay.
//!
//! Session records and their partial updates, the chat/status wire payloads,
//! agent identifiers, users and token claims, configuration, and the error
//! taxonomy used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod session;
pub mod user;
