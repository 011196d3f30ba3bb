use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Intent label that marks a customer asking for escalation.
pub const ESCALATION_INTENT: &str = "Escal.";

/// Sentiment below this is always critical.
const CRITICAL_SENTIMENT: f64 = -0.5;

/// Chance that an escalation intent is flagged critical regardless of sentiment.
const ESCALATION_CRITICAL_CHANCE: f64 = 0.5;

/// Chance that a non-negative call is still flagged for a supervisor glance.
const SPURIOUS_WARNING_CHANCE: f64 = 0.3;

/// A known agent on the floor roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Presence reported by the roster endpoint. The reconciler ignores it;
/// occupancy is derived from the call list alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPresence {
    #[default]
    Available,
    OnCall,
    Away,
}

/// Roster entry as returned by `GET /api/manager/agents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentListItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: AgentPresence,
    #[serde(default)]
    pub team: Option<String>,
}

impl From<AgentListItem> for Agent {
    fn from(item: AgentListItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
        }
    }
}

/// Direction the caller's sentiment has been moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Up,
    Down,
    #[default]
    Stable,
}

/// Coarse alert tier attached to a call upstream.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl RiskLevel {
    /// Derive a risk tier from sentiment and intent.
    ///
    /// Critical when sentiment is below -0.5, or on an escalation intent with
    /// a coin flip. Otherwise warning when sentiment is negative or on a 30%
    /// draw. Otherwise normal. Draws are only taken when the earlier checks
    /// did not already decide the tier.
    pub fn assess<R: Rng + ?Sized>(sentiment_score: f64, intent: &str, rng: &mut R) -> Self {
        if sentiment_score < CRITICAL_SENTIMENT
            || (intent == ESCALATION_INTENT && rng.random_bool(ESCALATION_CRITICAL_CHANCE))
        {
            Self::Critical
        } else if sentiment_score < 0.0 || rng.random_bool(SPURIOUS_WARNING_CHANCE) {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// A single in-progress call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: String,
    pub agent_id: String,
    pub agent_name: String,
    pub start_time: DateTime<Utc>,
    /// Seconds on the call, as of the server-side fetch.
    #[serde(default)]
    pub duration: u64,
    pub queue: String,
    pub intent: String,
    pub sentiment_score: f64,
    #[serde(default)]
    pub sentiment_trend: SentimentTrend,
    #[serde(default)]
    pub risk_level: RiskLevel,
}

impl Call {
    /// Seconds elapsed since `start_time`. Clock skew never yields a negative value.
    pub fn live_duration(&self, now: DateTime<Utc>) -> u64 {
        (now - self.start_time).num_seconds().max(0) as u64
    }

    /// Copy of the call with `duration` recomputed against `now`.
    pub fn with_live_duration(&self, now: DateTime<Utc>) -> Self {
        Self {
            duration: self.live_duration(now),
            ..self.clone()
        }
    }
}

/// Whether an agent slot currently holds a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Active,
    Idle,
}

/// Reconciled per-agent view: roster identity plus at most one active call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub agent_id: String,
    pub agent_name: String,
    pub status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<Call>,
}

impl Slot {
    pub fn idle(agent: &Agent) -> Self {
        Self {
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            status: SlotStatus::Idle,
            call: None,
        }
    }

    pub fn active(agent: &Agent, call: Call) -> Self {
        Self {
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            status: SlotStatus::Active,
            call: Some(call),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SlotStatus::Active
    }
}

/// Body of `GET /api/manager/floor`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorResponse {
    pub calls: Vec<Call>,
}

/// Body of `GET /api/manager/agents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterResponse {
    pub agents: Vec<AgentListItem>,
}

/// Body of `GET /api/manager/agents?agentId=..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDetailResponse {
    pub agent: AgentListItem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_call() -> Call {
        Call {
            id: "c1".to_string(),
            agent_id: "1".to_string(),
            agent_name: "Sarah".to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
            duration: 0,
            queue: "Billing".to_string(),
            intent: "Refund".to_string(),
            sentiment_score: -0.2,
            sentiment_trend: SentimentTrend::Down,
            risk_level: RiskLevel::Warning,
        }
    }

    #[test]
    fn call_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample_call()).unwrap();
        assert_eq!(json["agentId"], "1");
        assert_eq!(json["agentName"], "Sarah");
        assert_eq!(json["sentimentTrend"], "down");
        assert_eq!(json["riskLevel"], "warning");
        assert!(json.get("startTime").is_some());
    }

    #[test]
    fn idle_slot_omits_call() {
        let slot = Slot::idle(&Agent::new("2", "Mike"));
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["status"], "idle");
        assert!(json.get("call").is_none());
    }

    #[test]
    fn live_duration_counts_from_start() {
        let call = sample_call();
        let now = call.start_time + chrono::Duration::seconds(95);
        assert_eq!(call.live_duration(now), 95);
        assert_eq!(call.with_live_duration(now).duration, 95);
    }

    #[test]
    fn live_duration_saturates_on_skew() {
        let call = sample_call();
        let before = call.start_time - chrono::Duration::seconds(10);
        assert_eq!(call.live_duration(before), 0);
    }

    #[test]
    fn roster_item_defaults_missing_fields() {
        let item: AgentListItem = serde_json::from_str(r#"{"id":"3","name":"Priya"}"#).unwrap();
        assert_eq!(item.status, AgentPresence::Available);
        assert!(item.team.is_none());
        assert_eq!(Agent::from(item), Agent::new("3", "Priya"));
    }

    #[test]
    fn very_negative_sentiment_is_critical() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(RiskLevel::assess(-0.8, "Billing", &mut rng), RiskLevel::Critical);
        }
    }

    #[test]
    fn mildly_negative_sentiment_is_at_least_warning() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert!(RiskLevel::assess(-0.1, "Escal.", &mut rng) >= RiskLevel::Warning);
            assert_eq!(RiskLevel::assess(-0.1, "Billing", &mut rng), RiskLevel::Warning);
        }
    }

    #[test]
    fn positive_sentiment_is_never_critical_without_escalation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut saw_normal = false;
        for _ in 0..200 {
            let level = RiskLevel::assess(0.6, "Billing", &mut rng);
            assert_ne!(level, RiskLevel::Critical);
            saw_normal |= level == RiskLevel::Normal;
        }
        assert!(saw_normal);
    }

    #[test]
    fn risk_level_orders_by_severity() {
        assert!(RiskLevel::Critical > RiskLevel::Warning);
        assert!(RiskLevel::Warning > RiskLevel::Normal);
    }
}
