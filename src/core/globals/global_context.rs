//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for zone systems.
//
// Contains state that zone systems read/write:
// - message_bus: This tick's zone events
// - progression: Unlock state for every zone
// - clock: Tick rate and tick counter
// - outbox: Commands for the host (internal, flushed by the orchestrator)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::host_bridge::{HostEvent, Outbox};
use crate::core::message_bus::MessageBus;
use crate::core::timing::TickClock;
use crate::core::zones::ZoneProgression;

//=== GlobalContext =======================================================

/// Shared context data passed to zone systems during updates.
///
/// Zone controllers, barriers and the briefing receive `&mut GlobalContext`
/// rather than reaching for process-wide state, so every session (and
/// every test) owns an isolated progression.
pub struct GlobalContext {
    /// Events published during the current tick.
    ///
    /// Cleared at the start of every update, so after a tick it holds
    /// exactly that tick's events.
    pub message_bus: MessageBus,

    /// Single source of truth for zone unlock state.
    pub progression: ZoneProgression,

    pub clock: TickClock,

    /// Host commands queued this tick.
    pub(crate) outbox: Outbox,

    /// Host events for the current tick, consumed by `GlobalSystems`.
    pub(crate) frame_events: Vec<HostEvent>,
}

impl GlobalContext {
    pub(crate) fn new(progression: ZoneProgression, clock: TickClock) -> Self {
        Self {
            message_bus: MessageBus::new(),
            progression,
            clock,
            outbox: Outbox::new(),
            frame_events: Vec::new(),
        }
    }

    /// Commands queued for the host and not yet flushed.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }
}
