use floorwatch_core::floor::{AgentListItem, AgentPresence};

/// The fixed floor roster: (id, name, team).
const ROSTER: [(&str, &str, &str); 8] = [
    ("1", "Sarah Chen", "Billing"),
    ("2", "Mike Johnson", "Billing"),
    ("3", "Priya Patel", "Tech Support"),
    ("4", "James Wilson", "Tech Support"),
    ("5", "Emma Davis", "Retention"),
    ("6", "Carlos Rodriguez", "Retention"),
    ("7", "Aisha Okafor", "Sales"),
    ("8", "Tom Nguyen", "Sales"),
];

/// Build the roster served by `/api/manager/agents`.
pub fn default_roster() -> Vec<AgentListItem> {
    ROSTER
        .iter()
        .map(|(id, name, team)| AgentListItem {
            id: (*id).to_string(),
            name: (*name).to_string(),
            status: AgentPresence::Available,
            team: Some((*team).to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_has_eight_stable_ids() {
        let roster = default_roster();
        let ids: Vec<&str> = roster.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8"]);
    }
}
