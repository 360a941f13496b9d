//! Agent backend abstraction and agent catalogue.

pub mod agent;
pub mod catalog;
