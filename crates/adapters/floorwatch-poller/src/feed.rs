use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

use floorwatch_core::feed::SlotEvent;

use crate::client::FloorSource;
use crate::poller::{FloorPoller, FloorState};

pub type SlotEventStream = Pin<Box<dyn Stream<Item = SlotEvent> + Send>>;

/// A producer of slot-diff events. Polling is one implementation; a push
/// transport can provide the same stream.
pub trait SlotFeed {
    /// Events published from now on. A subscriber that falls behind receives
    /// a `Cleared` event followed by the full current floor, then only events
    /// newer than that floor.
    fn slot_events(&self) -> SlotEventStream;
}

impl<S: FloorSource> SlotFeed for FloorPoller<S> {
    fn slot_events(&self) -> SlotEventStream {
        let rx = self.shared.events.subscribe();
        let state = self.shared.state.subscribe();
        // Events at or below this generation are already folded into a resync.
        let mut resynced_at = 0;

        BroadcastStream::new(rx)
            .flat_map(move |item| {
                let events = match item {
                    Ok((generation, _)) if generation <= resynced_at => Vec::new(),
                    Ok((_, event)) => vec![event],
                    Err(BroadcastStreamRecvError::Lagged(missed)) => {
                        let snapshot = state.borrow();
                        tracing::warn!(
                            missed,
                            generation = snapshot.generation,
                            "Slot event subscriber lagged, resyncing"
                        );
                        resynced_at = snapshot.generation;
                        resync_events(&snapshot)
                    },
                };
                stream::iter(events)
            })
            .boxed()
    }
}

impl<S: FloorSource> FloorPoller<S> {
    /// Stream of state snapshots, starting with the current one.
    pub fn state_stream(&self) -> WatchStream<FloorState> {
        WatchStream::new(self.subscribe())
    }
}

/// Events that rebuild `state.slots` from nothing.
fn resync_events(state: &FloorState) -> Vec<SlotEvent> {
    let mut events = Vec::with_capacity(state.slots.len() + 1);
    events.push(SlotEvent::Cleared {
        reason: "subscriber lagged".to_string(),
    });
    events.extend(
        state
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| SlotEvent::AgentJoined {
                index,
                slot: slot.clone(),
            }),
    );
    events
}
