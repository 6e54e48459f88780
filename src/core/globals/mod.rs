//=========================================================================
// Global Session State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: ZoneControllers + ZoneBarriers + RadioBriefing (owned by the session)
//   GlobalContext: MessageBus + ZoneProgression + Outbox + TickClock (passed to systems)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
pub use global_systems::GlobalSystems;
