//=========================================================================
// Zone Events
//=========================================================================
//
// Messages published on the bus by zone systems. Each is pushed at most
// once per underlying transition; observers read them within the tick
// they were published and the bus is cleared at the start of the next.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{ActorHandle, BarrierId, ZoneId};

//=== Progression =========================================================

/// A zone transitioned from locked to unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneUnlocked {
    pub zone: ZoneId,
}

//=== Mechanism ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanismProgressed {
    pub zone: ZoneId,
    pub current: u32,
    pub required: u32,
}

/// The zone's shutdown sequencer latched complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanismCompleted {
    pub zone: ZoneId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RidesStopped {
    pub zone: ZoneId,
    /// Rides that were running when the stop was issued.
    pub count: usize,
}

//=== Encounter ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterStarted {
    pub zone: ZoneId,
    pub planned: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDefeated {
    pub zone: ZoneId,
    pub actor: ActorHandle,
    pub remaining: usize,
}

/// The zone's encounter cleared. Published exactly once per zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCleared {
    pub zone: ZoneId,
}

//=== Barriers ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierBlocked {
    pub barrier: BarrierId,
    pub zone: ZoneId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierDissolved {
    pub barrier: BarrierId,
    pub zone: ZoneId,
}

//=== Briefing ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BriefingCueStarted {
    pub cue: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BriefingCueFinished {
    pub cue: usize,
}
