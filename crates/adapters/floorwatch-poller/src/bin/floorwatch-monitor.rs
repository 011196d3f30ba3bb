use chrono::Utc;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use floorwatch_core::feed::SlotEvent;
use floorwatch_core::time::format_timestamp;
use floorwatch_poller::{
    FloorClient, FloorPoller, FloorPollerConfig, FloorState, PollPhase, SlotFeed,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = FloorPollerConfig::load();
    config.validate();

    let client = match FloorClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        },
    };

    tracing::info!(
        base_url = client.base_url(),
        interval_ms = config.poll_interval_ms,
        auto_refresh = config.auto_refresh,
        "floorwatch monitor starting"
    );

    let poller = FloorPoller::new(client, &config);
    let mut events = poller.slot_events();
    let mut states = poller.subscribe();
    poller.mount();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(event) = events.next() => log_event(&event),
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                log_state(&state);
            },
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            },
        }
    }

    poller.teardown();
}

fn log_event(event: &SlotEvent) {
    match event {
        SlotEvent::CallStarted { call, .. } => {
            let call = call.with_live_duration(Utc::now());
            tracing::info!(
                agent = %call.agent_name,
                queue = %call.queue,
                intent = %call.intent,
                risk = ?call.risk_level,
                duration_secs = call.duration,
                "Call started"
            );
        },
        SlotEvent::CallEnded { agent_id, call_id, .. } => {
            tracing::info!(agent_id = %agent_id, call_id = %call_id, "Call ended");
        },
        SlotEvent::Cleared { reason } => tracing::warn!(reason = %reason, "Floor cleared"),
        other => tracing::debug!(event = ?other, "Slot changed"),
    }
}

fn log_state(state: &FloorState) {
    match state.phase {
        PollPhase::Ready => {
            let summary = state.summary();
            let longest_call_secs = state
                .live_calls(Utc::now())
                .iter()
                .map(|c| c.duration)
                .max()
                .unwrap_or(0);
            tracing::info!(
                agents = summary.agents,
                active = summary.active,
                idle = summary.idle,
                critical = summary.critical,
                warning = summary.warning,
                occupancy = summary.occupancy(),
                longest_call_secs,
                at = %state.updated_at.map(format_timestamp).unwrap_or_default(),
                "Floor updated"
            );
        },
        PollPhase::Errored => {
            if let Some(error) = &state.error {
                tracing::warn!(error = %error, "Floor unavailable");
            }
        },
        PollPhase::Idle | PollPhase::Loading => {},
    }
}
