//! AWS Bedrock Agent Runtime backend.
//!
//! Uses plain `reqwest` with Bearer token authentication and a minimal event
//! stream decoder instead of the AWS SDK.

pub mod client;
pub mod eventstream;
pub mod types;
