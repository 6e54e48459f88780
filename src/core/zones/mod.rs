//=========================================================================
// Zones
//=========================================================================
//
// Zone progression and ride-shutdown orchestration.
//
// Architecture:
//   InteractionPrimitive ─units─> ShutdownSequencer ─complete─┐
//                                                             ▼
//   ZoneController: Idle → MechanismActive → RidesStopped → EncounterSpawned → Cleared
//                                              │                  │
//                                    RideController::stop   EncounterSpawner
//                                                                 │
//   RadioBriefing ─unlock_zone─> ZoneProgression ─ZoneUnlocked─> ZoneBarrier
//
// Every component is a plain state machine advanced by `GlobalSystems`
// once per tick. Cross-component signals travel as typed messages on the
// bus (see `events`), never as stored callbacks.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== Module Declarations =================================================

pub mod barrier;
pub mod briefing;
pub mod controller;
pub mod encounter;
pub mod events;
pub mod progression;
pub mod ride;
pub mod sequencer;

//=== Public API ==========================================================

pub use barrier::{ContactOutcome, ZoneBarrier};
pub use briefing::{BriefingOutcome, RadioBriefing};
pub use controller::{ZoneController, ZoneState};
pub use encounter::{DestroyOutcome, EncounterSignal, EncounterSpawner};
pub use progression::{UnlockOutcome, ZoneProgression};
pub use ride::RideController;
pub use sequencer::{InteractionPrimitive, ProgressOutcome, ShutdownProgress, ShutdownSequencer};

//=== Identifiers =========================================================

/// Zone number, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u8);

impl ZoneId {
    /// Zero-based slot for this zone, `None` for the invalid zone 0.
    pub fn index(self) -> Option<usize> {
        usize::from(self.0).checked_sub(1)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

/// Host-side actor handed out by an [`ActorSpawner`](crate::core::host_bridge::ActorSpawner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarrierId(pub u32);

impl fmt::Display for BarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "barrier {}", self.0)
    }
}

//=== World Data ==========================================================

/// Position and heading used for spawns and positional sounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl Pose {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            yaw_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideKind {
    Carousel,
    FerrisWheel,
    Teacups,
    BumperCars,
    SwingRide,
}

//=========================================================================
// Unit Tests
//=========================================================================
