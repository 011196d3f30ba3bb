use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use floorwatch_core::floor::{AgentListItem, Call, ESCALATION_INTENT, RiskLevel, SentimentTrend};

use crate::config::{FloorConfig, MAX_CALL_AGE_SECS};

const QUEUES: [&str; 4] = ["Billing", "Tech Support", "Retention", "Sales"];

const INTENTS: [&str; 6] = [
    "Billing",
    "Cancel",
    "Tech Issue",
    "Upgrade",
    "Refund",
    ESCALATION_INTENT,
];

const TRENDS: [SentimentTrend; 3] = [
    SentimentTrend::Up,
    SentimentTrend::Down,
    SentimentTrend::Stable,
];

/// Synthesizes the set of in-progress calls for the mock floor endpoint.
#[derive(Debug, Clone)]
pub struct FloorGenerator {
    config: FloorConfig,
}

impl FloorGenerator {
    pub fn new(config: FloorConfig) -> Self {
        Self { config }
    }

    /// Generate calls for `roster` as seen at `now`. Every call goes to a
    /// different agent, so the output never holds two calls for one agent.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        roster: &[AgentListItem],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Call> {
        if roster.is_empty() {
            return Vec::new();
        }
        let count = rng
            .random_range(self.config.min_calls..=self.config.max_calls)
            .min(roster.len());

        rand::seq::index::sample(rng, roster.len(), count)
            .into_iter()
            .map(|i| self.make_call(&roster[i], now, rng))
            .collect()
    }

    fn make_call<R: Rng + ?Sized>(
        &self,
        agent: &AgentListItem,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Call {
        let queue = QUEUES[rng.random_range(0..QUEUES.len())];
        let intent = INTENTS[rng.random_range(0..INTENTS.len())];
        let sentiment_score = (rng.random_range(-1.0..=1.0_f64) * 100.0).round() / 100.0;
        let sentiment_trend = TRENDS[rng.random_range(0..TRENDS.len())];
        let risk_level = RiskLevel::assess(sentiment_score, intent, rng);
        let max_age = self.config.max_call_age_secs.min(MAX_CALL_AGE_SECS);
        let age_secs = rng.random_range(0..=max_age);
        let start_time = i64::try_from(age_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(now);

        Call {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            start_time,
            duration: age_secs,
            queue: queue.to_string(),
            intent: intent.to_string(),
            sentiment_score,
            sentiment_trend,
            risk_level,
        }
    }
}
