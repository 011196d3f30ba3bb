use std::collections::{HashMap, HashSet};

use crate::floor::{Agent, Call, Slot};

/// Merge the roster and the current call set into one slot per agent.
///
/// Slots follow roster order. An agent with a matching call gets an active
/// slot, every other agent an idle one. Calls whose agent is not on the
/// roster are dropped. If several calls share an `agent_id`, the one that
/// appears last in `calls` wins.
pub fn merge_agents_and_calls(agents: &[Agent], calls: &[Call]) -> Vec<Slot> {
    let mut by_agent: HashMap<&str, &Call> = HashMap::with_capacity(calls.len());
    for call in calls {
        by_agent.insert(call.agent_id.as_str(), call);
    }

    agents
        .iter()
        .map(|agent| match by_agent.get(agent.id.as_str()) {
            Some(call) => Slot::active(agent, (*call).clone()),
            None => Slot::idle(agent),
        })
        .collect()
}

/// Anomalies in a roster/call pairing that the merge resolves silently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileDiagnostics {
    /// Agent ids that appear on more than one call, in first-seen order.
    pub duplicate_agent_ids: Vec<String>,
    /// Ids of calls whose agent is not on the roster.
    pub orphaned_call_ids: Vec<String>,
}

impl ReconcileDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.duplicate_agent_ids.is_empty() && self.orphaned_call_ids.is_empty()
    }
}

/// Report what [`merge_agents_and_calls`] would discard for these inputs.
pub fn diagnose(agents: &[Agent], calls: &[Call]) -> ReconcileDiagnostics {
    let roster: HashSet<&str> = agents.iter().map(|a| a.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(calls.len());
    let mut diagnostics = ReconcileDiagnostics::default();

    for call in calls {
        let agent_id = call.agent_id.as_str();
        if !seen.insert(agent_id) && !diagnostics.duplicate_agent_ids.iter().any(|d| d == agent_id)
        {
            diagnostics.duplicate_agent_ids.push(agent_id.to_string());
        }
        if !roster.contains(agent_id) {
            diagnostics.orphaned_call_ids.push(call.id.clone());
        }
    }
    diagnostics
}
