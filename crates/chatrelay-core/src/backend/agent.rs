//! AgentBackend trait definition.
//!
//! The backend turns one user message into a stream of raw response
//! fragments. Fragments are bytes; the relay decides how to decode them.

use std::pin::Pin;

use futures_util::Stream;

use chatrelay_types::agent::AgentTarget;
use chatrelay_types::error::AgentError;

/// Finite, ordered stream of raw fragment payloads.
///
/// May end early with an error item, after which it yields nothing more.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, AgentError>> + Send + 'static>>;

/// Trait for the AI agent service the relay forwards messages to.
///
/// Returns a boxed stream (not RPITIT) so connection setup failures can be
/// surfaced as the first stream item, keeping the relay's error path single.
///
/// Implementations live in chatrelay-infra (e.g., `BedrockAgentBackend`).
pub trait AgentBackend: Send + Sync {
    /// Human-readable backend name (e.g., "bedrock").
    fn name(&self) -> &str;

    /// Start one agent invocation for `session_id` with `input_text`.
    fn invoke(&self, target: &AgentTarget, session_id: &str, input_text: &str) -> FragmentStream;
}
