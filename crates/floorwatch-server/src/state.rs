use std::sync::Arc;

use floorwatch_core::floor::AgentListItem;

use crate::config::ServerConfig;
use crate::generator::FloorGenerator;
use crate::roster::default_roster;

#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<Vec<AgentListItem>>,
    pub generator: Arc<FloorGenerator>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_roster(config, default_roster())
    }

    /// State serving a custom roster instead of the built-in one.
    pub fn with_roster(config: ServerConfig, roster: Vec<AgentListItem>) -> Self {
        Self {
            roster: Arc::new(roster),
            generator: Arc::new(FloorGenerator::new(config.floor.clone())),
            config: Arc::new(config),
        }
    }
}
