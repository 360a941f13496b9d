//! Observability for chatrelay: subscriber setup and shared span vocabulary.

pub mod relay_attrs;
pub mod tracing_setup;
