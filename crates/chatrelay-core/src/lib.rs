//! Business logic and port traits for chatrelay.
//!
//! This crate defines the "ports" (store, backend, auth traits) that the
//! infrastructure layer implements, plus the relay itself. It depends only on
//! `chatrelay-types`, never on `chatrelay-infra` or any database/IO crate.

pub mod auth;
pub mod backend;
pub mod relay;
pub mod session;
pub mod user;
