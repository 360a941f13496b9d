//! Configuration types for chatrelay.
//!
//! `RelayConfig` is the top-level `config.toml` in the data directory.
//! Every field has a default so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, AgentTarget};
use crate::session::SESSION_TTL_SECS;

/// Top-level configuration for the relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Persist streamed progress every N fragments.
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,

    /// Seconds a session record lives before the store may reclaim it.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,

    /// Retry hint returned to throttled clients.
    #[serde(default = "default_retry_after_secs")]
    pub retry_after_secs: u64,

    /// How often the server deletes expired sessions.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,

    /// Lifetime of issued access tokens.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    #[serde(default)]
    pub bedrock: BedrockConfig,

    #[serde(default)]
    pub agents: AgentsConfig,
}

fn default_checkpoint_interval() -> usize {
    3
}

fn default_session_ttl_secs() -> i64 {
    SESSION_TTL_SECS
}

fn default_retry_after_secs() -> u64 {
    60
}

fn default_purge_interval_secs() -> u64 {
    300
}

fn default_token_ttl_hours() -> i64 {
    24
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: default_checkpoint_interval(),
            session_ttl_secs: default_session_ttl_secs(),
            retry_after_secs: default_retry_after_secs(),
            purge_interval_secs: default_purge_interval_secs(),
            token_ttl_hours: default_token_ttl_hours(),
            bedrock: BedrockConfig::default(),
            agents: AgentsConfig::default(),
        }
    }
}

/// Bedrock Agent Runtime connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedrockConfig {
    #[serde(default = "default_region")]
    pub region: String,
    /// Override for the runtime endpoint (tests, VPC endpoints).
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
        }
    }
}

/// Provisioned backend agents. Any of them may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub supervisor: Option<AgentTarget>,
    #[serde(default)]
    pub generic: Option<AgentTarget>,
    #[serde(default)]
    pub coding: Option<AgentTarget>,
    #[serde(default)]
    pub financial: Option<AgentTarget>,
}

impl AgentsConfig {
    pub fn target(&self, kind: AgentKind) -> Option<&AgentTarget> {
        match kind {
            AgentKind::Supervisor => self.supervisor.as_ref(),
            AgentKind::Generic => self.generic.as_ref(),
            AgentKind::Coding => self.coding.as_ref(),
            AgentKind::Financial => self.financial.as_ref(),
        }
    }

    pub fn set_target(&mut self, kind: AgentKind, target: Option<AgentTarget>) {
        let slot = match kind {
            AgentKind::Supervisor => &mut self.supervisor,
            AgentKind::Generic => &mut self.generic,
            AgentKind::Coding => &mut self.coding,
            AgentKind::Financial => &mut self.financial,
        };
        *slot = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_config_default_values() {
        let config = RelayConfig::default();
        assert_eq!(config.checkpoint_interval, 3);
        assert_eq!(config.session_ttl_secs, 86_400);
        assert_eq!(config.retry_after_secs, 60);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bedrock.region, "us-east-1");
        assert!(config.agents.supervisor.is_none());
    }

    #[test]
    fn test_relay_config_from_empty_toml() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.checkpoint_interval, 3);
        assert_eq!(config.purge_interval_secs, 300);
    }

    #[test]
    fn test_relay_config_with_agents() {
        let config: RelayConfig = toml::from_str(
            r#"
checkpoint_interval = 5

[bedrock]
region = "eu-west-1"

[agents.supervisor]
agent_id = "SUP123"
alias_id = "ALIAS1"
"#,
        )
        .unwrap();
        assert_eq!(config.checkpoint_interval, 5);
        assert_eq!(config.bedrock.region, "eu-west-1");
        let sup = config.agents.target(AgentKind::Supervisor).unwrap();
        assert_eq!(sup.agent_id, "SUP123");
        assert!(config.agents.target(AgentKind::Coding).is_none());
    }

    #[test]
    fn test_set_target() {
        let mut agents = AgentsConfig::default();
        agents.set_target(
            AgentKind::Financial,
            Some(AgentTarget {
                agent_id: "F".into(),
                alias_id: "A".into(),
            }),
        );
        assert!(agents.target(AgentKind::Financial).is_some());
        agents.set_target(AgentKind::Financial, None);
        assert!(agents.target(AgentKind::Financial).is_none());
    }
}
