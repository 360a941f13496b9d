//! Agent backend identifiers and catalogue entries.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Identifiers needed to invoke one backend agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTarget {
    pub agent_id: String,
    pub alias_id: String,
}

impl AgentTarget {
    /// Build a target only when both identifiers are present and non-blank.
    pub fn from_parts(agent_id: Option<String>, alias_id: Option<String>) -> Option<Self> {
        let agent_id = agent_id.filter(|s| !s.trim().is_empty())?;
        let alias_id = alias_id.filter(|s| !s.trim().is_empty())?;
        Some(Self { agent_id, alias_id })
    }

    /// Shortened agent id for log lines.
    pub fn short_id(&self) -> &str {
        let end = self
            .agent_id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.agent_id.len());
        &self.agent_id[..end]
    }
}

/// The agents the platform knows about.
///
/// Chat always goes through `Supervisor`, which delegates to the
/// specialists on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Generic,
    Coding,
    Financial,
    Supervisor,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Generic,
        AgentKind::Coding,
        AgentKind::Financial,
        AgentKind::Supervisor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Generic => "generic",
            AgentKind::Coding => "coding",
            AgentKind::Financial => "financial",
            AgentKind::Supervisor => "supervisor",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AgentKind::Generic => "Generic Agent",
            AgentKind::Coding => "Coding Agent",
            AgentKind::Financial => "Financial Agent",
            AgentKind::Supervisor => "Supervisor Agent",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentKind::Generic => "General conversation and questions",
            AgentKind::Coding => "Programming and software development",
            AgentKind::Financial => "Financial analysis and advice",
            AgentKind::Supervisor => "Auto-routes to the best agent",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            AgentKind::Generic => "💬",
            AgentKind::Coding => "💻",
            AgentKind::Financial => "💰",
            AgentKind::Supervisor => "🎯",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" => Ok(AgentKind::Generic),
            "coding" => Ok(AgentKind::Coding),
            "financial" => Ok(AgentKind::Financial),
            "supervisor" => Ok(AgentKind::Supervisor),
            other => Err(format!("unknown agent type: '{other}'")),
        }
    }
}

/// Catalogue entry returned by `GET /api/agents`.
///
/// Backend identifiers are omitted when the agent is not provisioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDescriptor {
    pub id: AgentKind,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_id: Option<String>,
}

impl AgentDescriptor {
    pub fn new(kind: AgentKind, target: Option<&AgentTarget>) -> Self {
        Self {
            id: kind,
            name: kind.display_name().to_string(),
            description: kind.description().to_string(),
            icon: kind.icon().to_string(),
            agent_id: target.map(|t| t.agent_id.clone()),
            alias_id: target.map(|t| t.alias_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_requires_both_parts() {
        assert!(AgentTarget::from_parts(Some("A".into()), None).is_none());
        assert!(AgentTarget::from_parts(None, Some("B".into())).is_none());
        assert!(AgentTarget::from_parts(Some(" ".into()), Some("B".into())).is_none());
        let target = AgentTarget::from_parts(Some("A".into()), Some("B".into())).unwrap();
        assert_eq!(target.agent_id, "A");
        assert_eq!(target.alias_id, "B");
    }

    #[test]
    fn test_short_id() {
        let target = AgentTarget {
            agent_id: "ABCDEFGHIJKL".into(),
            alias_id: "x".into(),
        };
        assert_eq!(target.short_id(), "ABCDEFGH");
        let short = AgentTarget {
            agent_id: "AB".into(),
            alias_id: "x".into(),
        };
        assert_eq!(short.short_id(), "AB");
    }

    #[test]
    fn test_agent_kind_roundtrip() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.to_string().parse::<AgentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_descriptor_omits_missing_ids() {
        let json = serde_json::to_value(AgentDescriptor::new(AgentKind::Coding, None)).unwrap();
        assert_eq!(json["id"], "coding");
        assert_eq!(json["name"], "Coding Agent");
        assert!(json.get("agentId").is_none());
        assert!(json.get("aliasId").is_none());
    }
}
