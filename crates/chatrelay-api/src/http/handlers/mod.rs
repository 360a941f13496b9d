//! HTTP request handlers for the REST API.

pub mod agents;
pub mod chat;
pub mod login;
pub mod meta;
pub mod status;
