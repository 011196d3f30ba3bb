use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::floor::{Call, Slot, SlotStatus};

/// Incremental change to the reconciled floor view.
///
/// Consumers that apply events in order with [`apply_events`] end up with the
/// same slot list the producer holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotEvent {
    /// A slot appeared at `index`, or an existing slot was replaced wholesale.
    AgentJoined { index: usize, slot: Slot },
    AgentLeft { agent_id: String },
    CallStarted { agent_id: String, call: Call },
    CallEnded { agent_id: String, call_id: String },
    /// Same call, new field values (duration, sentiment, risk).
    CallUpdated { agent_id: String, call: Call },
    /// Every slot was dropped.
    Cleared { reason: String },
}

impl SlotEvent {
    pub fn agent_id(&self) -> Option<&str> {
        match self {
            Self::AgentJoined { slot, .. } => Some(&slot.agent_id),
            Self::AgentLeft { agent_id }
            | Self::CallStarted { agent_id, .. }
            | Self::CallEnded { agent_id, .. }
            | Self::CallUpdated { agent_id, .. } => Some(agent_id),
            Self::Cleared { .. } => None,
        }
    }
}

/// Compute the events that turn `prev` into `next`.
pub fn diff_slots(prev: &[Slot], next: &[Slot]) -> Vec<SlotEvent> {
    let next_ids: HashSet<&str> = next.iter().map(|s| s.agent_id.as_str()).collect();
    let prev_by_id: HashMap<&str, &Slot> =
        prev.iter().map(|s| (s.agent_id.as_str(), s)).collect();

    // Insertion by index only reproduces `next` when surviving agents keep
    // their relative order. Fall back to a full rebuild otherwise.
    let surviving_prev = prev
        .iter()
        .map(|s| s.agent_id.as_str())
        .filter(|id| next_ids.contains(id));
    let surviving_next = next
        .iter()
        .map(|s| s.agent_id.as_str())
        .filter(|id| prev_by_id.contains_key(id));
    if !surviving_prev.eq(surviving_next) {
        let mut events = Vec::with_capacity(next.len() + 1);
        events.push(SlotEvent::Cleared {
            reason: "roster reordered".to_string(),
        });
        events.extend(next.iter().enumerate().map(|(index, slot)| SlotEvent::AgentJoined {
            index,
            slot: slot.clone(),
        }));
        return events;
    }

    let mut events = Vec::new();
    for slot in prev {
        if !next_ids.contains(slot.agent_id.as_str()) {
            events.push(SlotEvent::AgentLeft {
                agent_id: slot.agent_id.clone(),
            });
        }
    }

    for (index, slot) in next.iter().enumerate() {
        let Some(before) = prev_by_id.get(slot.agent_id.as_str()) else {
            events.push(SlotEvent::AgentJoined {
                index,
                slot: slot.clone(),
            });
            continue;
        };
        if before.agent_name != slot.agent_name {
            events.push(SlotEvent::AgentJoined {
                index,
                slot: slot.clone(),
            });
            continue;
        }
        let agent_id = &slot.agent_id;
        match (&before.call, &slot.call) {
            (None, None) => {},
            (None, Some(call)) => events.push(SlotEvent::CallStarted {
                agent_id: agent_id.clone(),
                call: call.clone(),
            }),
            (Some(old), None) => events.push(SlotEvent::CallEnded {
                agent_id: agent_id.clone(),
                call_id: old.id.clone(),
            }),
            (Some(old), Some(call)) if old.id != call.id => {
                events.push(SlotEvent::CallEnded {
                    agent_id: agent_id.clone(),
                    call_id: old.id.clone(),
                });
                events.push(SlotEvent::CallStarted {
                    agent_id: agent_id.clone(),
                    call: call.clone(),
                });
            },
            (Some(old), Some(call)) if old != call => events.push(SlotEvent::CallUpdated {
                agent_id: agent_id.clone(),
                call: call.clone(),
            }),
            (Some(_), Some(_)) => {},
        }
    }
    events
}

/// Apply events in order to a slot list.
///
/// Events that name an unknown agent are ignored, as is a `CallEnded` whose
/// call id no longer matches the slot's call.
pub fn apply_events(slots: &mut Vec<Slot>, events: &[SlotEvent]) {
    for event in events {
        match event {
            SlotEvent::Cleared { .. } => slots.clear(),
            SlotEvent::AgentLeft { agent_id } => slots.retain(|s| &s.agent_id != agent_id),
            SlotEvent::AgentJoined { index, slot } => {
                if let Some(existing) = slots.iter_mut().find(|s| s.agent_id == slot.agent_id) {
                    *existing = slot.clone();
                } else {
                    let at = (*index).min(slots.len());
                    slots.insert(at, slot.clone());
                }
            },
            SlotEvent::CallStarted { agent_id, call } | SlotEvent::CallUpdated { agent_id, call } => {
                if let Some(slot) = slots.iter_mut().find(|s| &s.agent_id == agent_id) {
                    slot.status = SlotStatus::Active;
                    slot.call = Some(call.clone());
                }
            },
            SlotEvent::CallEnded { agent_id, call_id } => {
                if let Some(slot) = slots.iter_mut().find(|s| &s.agent_id == agent_id)
                    && slot.call.as_ref().is_some_and(|c| &c.id == call_id)
                {
                    slot.status = SlotStatus::Idle;
                    slot.call = None;
                }
            },
        }
    }
}
