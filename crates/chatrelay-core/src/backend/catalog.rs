//! Catalogue of agents exposed by `GET /api/agents`.

use chatrelay_types::agent::{AgentDescriptor, AgentKind};
use chatrelay_types::config::AgentsConfig;

/// List every known agent in a stable order, attaching backend ids for the
/// ones that are provisioned.
pub fn list_agents(agents: &AgentsConfig) -> Vec<AgentDescriptor> {
    AgentKind::ALL
        .into_iter()
        .map(|kind| AgentDescriptor::new(kind, agents.target(kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::agent::AgentTarget;

    #[test]
    fn lists_all_four_agents_in_order() {
        let list = list_agents(&AgentsConfig::default());
        let ids: Vec<_> = list.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["generic", "coding", "financial", "supervisor"]);
        assert!(list.iter().all(|d| d.agent_id.is_none()));
    }

    #[test]
    fn provisioned_agent_carries_ids() {
        let mut agents = AgentsConfig::default();
        agents.supervisor = Some(AgentTarget {
            agent_id: "SUP".into(),
            alias_id: "AL".into(),
        });
        let list = list_agents(&agents);
        let sup = list.iter().find(|d| d.id == AgentKind::Supervisor).unwrap();
        assert_eq!(sup.agent_id.as_deref(), Some("SUP"));
        assert_eq!(sup.icon, "🎯");
    }
}
