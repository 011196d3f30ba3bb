use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use floorwatch_core::feed::{SlotEvent, diff_slots};
use floorwatch_core::floor::{Call, Slot};
use floorwatch_core::reconcile::{diagnose, merge_agents_and_calls};
use floorwatch_core::summary::FloorSummary;

use crate::client::FloorSource;
use crate::config::FloorPollerConfig;
use crate::error::FetchError;

/// Where the poller is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollPhase {
    /// No cycle has started yet.
    #[default]
    Idle,
    /// A cycle is in flight. Data from the previous cycle is kept meanwhile.
    Loading,
    /// The newest cycle succeeded.
    Ready,
    /// The newest cycle failed. Calls and slots are empty.
    Errored,
}

/// Snapshot of the reconciled floor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorState {
    pub phase: PollPhase,
    pub calls: Vec<Call>,
    pub slots: Vec<Slot>,
    pub error: Option<FetchError>,
    /// Generation of the cycle that produced `calls`/`slots`/`error`. Zero before any cycle finished.
    pub generation: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FloorState {
    pub fn loading(&self) -> bool {
        self.phase == PollPhase::Loading
    }

    pub fn summary(&self) -> FloorSummary {
        FloorSummary::from_slots(&self.slots)
    }

    /// Calls with `duration` recomputed from their start time as of `now`.
    pub fn live_calls(&self, now: DateTime<Utc>) -> Vec<Call> {
        self.calls.iter().map(|c| c.with_live_duration(now)).collect()
    }
}

/// How a single fetch-and-merge cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Fresh slots were published.
    Applied,
    /// The cycle failed and the floor was cleared.
    Failed(FetchError),
    /// A newer cycle started before this one finished, so its result was dropped.
    Superseded,
}

pub(crate) struct Shared<S> {
    source: S,
    pub(crate) state: watch::Sender<FloorState>,
    /// Slot events tagged with the generation of the cycle that produced them.
    pub(crate) events: broadcast::Sender<(u64, SlotEvent)>,
    /// Generation handed to the most recently started cycle.
    generation: AtomicU64,
}

impl<S: FloorSource> Shared<S> {
    fn spawn_cycle(self: &Arc<Self>) -> JoinHandle<CycleOutcome> {
        tokio::spawn(Arc::clone(self).run_cycle())
    }

    async fn run_cycle(self: Arc<Self>) -> CycleOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_if_modified(|state| {
            if self.is_superseded(generation) {
                return false;
            }
            state.phase = PollPhase::Loading;
            true
        });
        tracing::debug!(generation, "Floor cycle started");

        let fetched = tokio::try_join!(self.source.fetch_calls(), self.source.fetch_roster());

        match fetched {
            Ok((calls, agents)) => {
                let diagnostics = diagnose(&agents, &calls);
                if !diagnostics.duplicate_agent_ids.is_empty() {
                    tracing::warn!(
                        generation,
                        agents = ?diagnostics.duplicate_agent_ids,
                        "Multiple active calls for one agent, keeping the last"
                    );
                }
                if !diagnostics.orphaned_call_ids.is_empty() {
                    tracing::debug!(
                        generation,
                        calls = ?diagnostics.orphaned_call_ids,
                        "Dropping calls for agents not on the roster"
                    );
                }

                let slots = merge_agents_and_calls(&agents, &calls);
                let mut changes = 0;
                let applied = self.state.send_if_modified(|state| {
                    if self.is_superseded(generation) {
                        return false;
                    }
                    // Sent under the watch lock so event order follows state order.
                    let events = diff_slots(&state.slots, &slots);
                    changes = events.len();
                    for event in events {
                        let _ = self.events.send((generation, event));
                    }
                    *state = FloorState {
                        phase: PollPhase::Ready,
                        calls,
                        slots,
                        error: None,
                        generation,
                        updated_at: Some(Utc::now()),
                    };
                    true
                });
                if !applied {
                    tracing::debug!(generation, "Discarding superseded floor cycle");
                    return CycleOutcome::Superseded;
                }

                tracing::debug!(generation, changes, "Floor cycle applied");
                CycleOutcome::Applied
            },
            Err(error) => {
                let applied = self.state.send_if_modified(|state| {
                    if self.is_superseded(generation) {
                        return false;
                    }
                    if !state.slots.is_empty() {
                        let cleared = SlotEvent::Cleared {
                            reason: error.to_string(),
                        };
                        let _ = self.events.send((generation, cleared));
                    }
                    *state = FloorState {
                        phase: PollPhase::Errored,
                        calls: Vec::new(),
                        slots: Vec::new(),
                        error: Some(error.clone()),
                        generation,
                        updated_at: Some(Utc::now()),
                    };
                    true
                });
                if !applied {
                    tracing::debug!(generation, error = %error, "Discarding superseded failed cycle");
                    return CycleOutcome::Superseded;
                }

                tracing::warn!(generation, error = %error, "Floor cycle failed");
                CycleOutcome::Failed(error)
            },
        }
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}

/// Polls a [`FloorSource`] and keeps a reconciled slot view of the floor.
///
/// Each cycle fetches calls and roster concurrently, merges them, and
/// publishes the result through a `watch` channel. Cycles run as their own
/// tasks, so neither disabling auto-refresh nor dropping the poller cancels a
/// fetch already in flight. A cycle that finishes after a newer one has
/// started drops its result.
///
/// Auto-refresh and cycle spawning need a Tokio runtime.
pub struct FloorPoller<S: FloorSource> {
    pub(crate) shared: Arc<Shared<S>>,
    interval: Duration,
    auto_refresh_on_mount: bool,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl<S: FloorSource> FloorPoller<S> {
    pub fn new(source: S, config: &FloorPollerConfig) -> Self {
        let (state, _) = watch::channel(FloorState::default());
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                source,
                state,
                events,
                generation: AtomicU64::new(0),
            }),
            interval: config.poll_interval(),
            auto_refresh_on_mount: config.auto_refresh,
            ticker: Mutex::new(None),
        }
    }

    /// Start the first cycle and, if configured, the auto-refresh ticker.
    /// The returned handle resolves when the first cycle ends.
    pub fn mount(&self) -> JoinHandle<CycleOutcome> {
        let first = self.spawn_cycle();
        if self.auto_refresh_on_mount {
            self.set_auto_refresh(true);
        }
        first
    }

    /// Run one cycle now and wait for it.
    pub async fn refresh(&self) -> CycleOutcome {
        match self.spawn_cycle().await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            // Only reachable while the runtime shuts down.
            Err(_) => CycleOutcome::Superseded,
        }
    }

    /// Start one cycle in the background.
    pub fn spawn_cycle(&self) -> JoinHandle<CycleOutcome> {
        self.shared.spawn_cycle()
    }

    /// Turn scheduled refreshes on or off. The first scheduled cycle runs one
    /// interval after enabling. Turning it off never cancels a running cycle.
    pub fn set_auto_refresh(&self, enabled: bool) {
        let mut ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        match (enabled, ticker.take()) {
            (true, Some(handle)) if !handle.is_finished() => {
                *ticker = Some(handle);
            },
            (true, _) => {
                tracing::info!(
                    interval_ms = self.interval.as_millis() as u64,
                    "Auto-refresh enabled"
                );
                *ticker = Some(self.spawn_ticker());
            },
            (false, Some(handle)) => {
                handle.abort();
                tracing::info!("Auto-refresh disabled");
            },
            (false, None) => {},
        }
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Stop scheduled refreshes. In-flight cycles still complete and publish.
    pub fn teardown(&self) {
        self.set_auto_refresh(false);
    }

    /// Current snapshot.
    pub fn state(&self) -> FloorState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every published state change.
    pub fn subscribe(&self) -> watch::Receiver<FloorState> {
        self.shared.state.subscribe()
    }

    /// Number of cycles started so far.
    pub fn cycles_started(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    pub fn source(&self) -> &S {
        &self.shared.source
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let period = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                shared.spawn_cycle();
            }
        })
    }
}

impl<S: FloorSource> Drop for FloorPoller<S> {
    fn drop(&mut self) {
        let ticker = self.ticker.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
    }
}
