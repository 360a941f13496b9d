//! BedrockAgentBackend: concrete [`AgentBackend`] for the Bedrock Agent Runtime.
//!
//! Calls `InvokeAgent` with Bearer token authentication and decodes the
//! binary event stream body into answer fragments.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::backend::agent::{AgentBackend, FragmentStream};
use chatrelay_types::agent::AgentTarget;
use chatrelay_types::config::BedrockConfig;
use chatrelay_types::error::AgentError;

use super::eventstream::fragment_stream;
use super::types::InvokeAgentRequest;

/// Agents may reason for minutes before the last fragment arrives.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(900);

/// Bedrock Agent Runtime backend.
pub struct BedrockAgentBackend {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl BedrockAgentBackend {
    /// Build a backend for `config`.
    ///
    /// A missing `api_key` is not an error here: every invocation then fails
    /// with [`AgentError::NotConfigured`], which the relay reports per request.
    pub fn new(config: &BedrockConfig, api_key: Option<SecretString>) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AgentError::Backend(format!("failed to create HTTP client: {e}")))?;

        let base_url = config
            .endpoint
            .clone()
            .unwrap_or_else(|| Self::endpoint_for_region(&config.region));

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint_for_region(region: &str) -> String {
        format!("https://bedrock-agent-runtime.{region}.amazonaws.com")
    }

    /// `{base}/agents/{agentId}/agentAliases/{aliasId}/sessions/{sessionId}/text`,
    /// with every id percent-encoded as a single path segment.
    pub fn invoke_url(&self, target: &AgentTarget, session_id: &str) -> Result<reqwest::Url, AgentError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AgentError::Backend(format!("invalid endpoint '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| AgentError::Backend(format!("endpoint cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend([
                "agents",
                target.agent_id.as_str(),
                "agentAliases",
                target.alias_id.as_str(),
                "sessions",
                session_id,
                "text",
            ]);
        Ok(url)
    }
}

/// Map a non-success HTTP status onto an [`AgentError`].
fn status_error(status: reqwest::StatusCode, body: &str) -> AgentError {
    match status.as_u16() {
        429 => AgentError::Throttled(body.to_string()),
        401 | 403 => AgentError::Backend(format!("authentication failed (HTTP {status}): {body}")),
        _ => AgentError::Backend(format!("HTTP {status}: {body}")),
    }
}

impl AgentBackend for BedrockAgentBackend {
    fn name(&self) -> &str {
        "bedrock"
    }

    fn invoke(&self, target: &AgentTarget, session_id: &str, input_text: &str) -> FragmentStream {
        let client = self.client.clone();
        let url = self.invoke_url(target, session_id);
        let api_key = self.api_key.as_ref().map(|k| k.expose_secret().to_string());
        let body = InvokeAgentRequest::new(input_text);
        let agent = target.short_id().to_string();

        Box::pin(async_stream::try_stream! {
            let url = url?;
            let api_key = api_key.ok_or(AgentError::NotConfigured)?;
            tracing::debug!(agent = %agent, "invoking agent");

            let response = client
                .post(url)
                .header("Authorization", format!("Bearer {api_key}"))
                .header("Content-Type", "application/json")
                .header("Accept", "application/vnd.amazon.eventstream")
                .json(&body)
                .send()
                .await
                .map_err(|e| AgentError::Backend(format!("HTTP request failed: {e}")))?;

            let status = response.status();
            if status.is_success() {
                let mut fragments = fragment_stream(response.bytes_stream());
                while let Some(fragment) = fragments.next().await {
                    yield fragment?;
                }
            } else {
                let error_body = response.text().await.unwrap_or_default();
                tracing::warn!(status = %status, body = %error_body, "agent runtime error response");
                Err(status_error(status, &error_body))?;
            }
        })
    }
}
