pub mod feed;
pub mod floor;
pub mod reconcile;
pub mod summary;
pub mod time;

pub use feed::{SlotEvent, apply_events, diff_slots};
pub use floor::{Agent, Call, RiskLevel, SentimentTrend, Slot, SlotStatus};
pub use reconcile::merge_agents_and_calls;
pub use summary::FloorSummary;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use chrono::{TimeZone, Utc};

    use crate::floor::{Agent, AgentListItem, AgentPresence, Call, RiskLevel, SentimentTrend};

    /// Create `n` agents with sequential ids starting at "1".
    pub fn make_agents(n: usize) -> Vec<Agent> {
        (1..=n)
            .map(|i| Agent::new(i.to_string(), format!("Agent {i}")))
            .collect()
    }

    /// Roster entries matching [`make_agents`].
    pub fn make_roster_items(n: usize) -> Vec<AgentListItem> {
        make_agents(n)
            .into_iter()
            .map(|a| AgentListItem {
                id: a.id,
                name: a.name,
                status: AgentPresence::Available,
                team: None,
            })
            .collect()
    }

    /// Create a neutral call with the given id assigned to `agent_id`.
    pub fn make_call(id: &str, agent_id: &str) -> Call {
        Call {
            id: id.to_string(),
            agent_id: agent_id.to_string(),
            agent_name: format!("Agent {agent_id}"),
            start_time: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
            duration: 0,
            queue: "General".to_string(),
            intent: "Billing".to_string(),
            sentiment_score: 0.1,
            sentiment_trend: SentimentTrend::Stable,
            risk_level: RiskLevel::Normal,
        }
    }
}
