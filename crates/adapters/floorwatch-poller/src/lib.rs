pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod poller;

pub use client::{FloorClient, FloorSource};
pub use config::FloorPollerConfig;
pub use error::{Endpoint, FetchError};
pub use feed::{SlotEventStream, SlotFeed};
pub use poller::{CycleOutcome, FloorPoller, FloorState, PollPhase};
