//! Session persistence abstractions.
//!
//! Defines the `SessionStore` port the infrastructure layer implements, and
//! an in-process `MemorySessionStore` adapter.

pub mod memory;
pub mod store;
