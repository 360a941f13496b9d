//! Request/response bodies for the Bedrock Agent Runtime `InvokeAgent` API.

use serde::{Deserialize, Serialize};

/// JSON body of `POST .../sessions/{sessionId}/text`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeAgentRequest {
    pub input_text: String,
    pub enable_trace: bool,
}

impl InvokeAgentRequest {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            enable_trace: false,
        }
    }
}

/// Payload of a `chunk` event: `{"bytes":"<base64>"}`.
///
/// The decoded bytes are one fragment of the agent's answer. Attribution and
/// other metadata the service may add are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentChunkPayload {
    #[serde(default)]
    pub bytes: String,
}

/// Payload of an exception frame, e.g. `{"message":"Rate exceeded"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExceptionPayload {
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}
