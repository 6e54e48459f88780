//=========================================================================
// Host Bridge
//=========================================================================
//
// Bridges the render/physics/audio host with the orchestration core.
//
// Components:
// - `interface`: Event and command types (the contract)
// - `outbox`: Per-tick command buffer and the actor spawning seam
// - `event_collector`: Core-side event collection and buffering
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
mod interface;
mod outbox;

//=== Public API ==========================================================

pub use interface::{HostCommand, HostEvent, InteractionEvent, ZoneNotice};
pub use outbox::{ActorSpawner, Outbox};

pub(crate) use event_collector::{EventCollector, TickControl};
