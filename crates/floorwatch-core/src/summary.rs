use serde::{Deserialize, Serialize};

use crate::floor::{RiskLevel, Slot};

/// Aggregate statistics for the floor view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorSummary {
    pub agents: usize,
    pub active: usize,
    pub idle: usize,
    pub critical: usize,
    pub warning: usize,
    /// Mean sentiment over active calls, `None` when nobody is on a call.
    pub avg_sentiment: Option<f64>,
}

impl FloorSummary {
    pub fn from_slots(slots: &[Slot]) -> Self {
        let mut summary = Self {
            agents: slots.len(),
            ..Self::default()
        };
        let mut sentiment_total = 0.0;
        for call in slots.iter().filter_map(|s| s.call.as_ref()) {
            summary.active += 1;
            sentiment_total += call.sentiment_score;
            match call.risk_level {
                RiskLevel::Critical => summary.critical += 1,
                RiskLevel::Warning => summary.warning += 1,
                RiskLevel::Normal => {},
            }
        }
        summary.idle = summary.agents - summary.active;
        if summary.active > 0 {
            summary.avg_sentiment = Some(sentiment_total / summary.active as f64);
        }
        summary
    }

    /// Share of agents on a call, 0.0 to 1.0.
    pub fn occupancy(&self) -> f64 {
        if self.agents == 0 {
            return 0.0;
        }
        self.active as f64 / self.agents as f64
    }
}
