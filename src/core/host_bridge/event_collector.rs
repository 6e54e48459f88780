//=========================================================================
// Event Collector
//=========================================================================
//
// Host event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<HostEvent> → collect_frame() → frame events → TickControl
//
// Bounded polling keeps one noisy host from starving the tick. Pacing is
// owned by the orchestrator, so an empty queue returns immediately.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::HostEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Upper bound on events drained in a single tick.
const MAX_EVENTS_PER_FRAME: usize = 100;

/// Collects host events with bounded polling.
pub(crate) struct EventCollector {
    receiver: Receiver<HostEvent>,
    events: Vec<HostEvent>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<HostEvent>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(16),
        }
    }

    /// Collects pending host events (bounded to prevent starvation).
    ///
    /// Returns `Exit` on `Shutdown` or when every sender is gone. A
    /// `Shutdown` is still kept in the frame so systems can tear down.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(HostEvent::Shutdown) => {
                    info!("Host requested shutdown");
                    self.events.push(HostEvent::Shutdown);
                    return TickControl::Exit;
                }
                Ok(event) => {
                    self.events.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    info!("Host event channel disconnected");
                    self.events.push(HostEvent::Shutdown);
                    return TickControl::Exit;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Host event backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Takes ownership of collected events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
