//=========================================================================
// Host Bridge Interface
//=========================================================================
//
// Host-to-core and core-to-host message types.
//
// Defines the contract between the render/physics/audio host and the
// orchestration core. The core never polls devices or touches scene
// objects: it receives `HostEvent`s and answers with `HostCommand`s.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::zones::{ActorHandle, BarrierId, Pose, ZoneId};

//=== HostEvent ===========================================================

/// Discrete interaction reported by the input/XR host for a mechanism.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    Grab,
    Release,
    /// One push of a push-handle.
    Push,
    /// Rotation delta in degrees since the last report.
    Rotate { degrees: f32 },
    /// The control object was seated in its socket.
    Socketed,
}

/// Events sent from host to core.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Player manipulated the mechanism of a zone.
    Interaction {
        zone: ZoneId,
        event: InteractionEvent,
    },

    /// Player collider entered a barrier.
    PlayerContact { barrier: BarrierId },

    /// Scripted request to open every barrier of an unlocked zone.
    DissolveBarriers { zone: ZoneId },

    /// A spawned actor was destroyed, by any path.
    ActorDestroyed { actor: ActorHandle },

    /// Player pressed the radio button.
    RadioPressed,

    /// Direct unlock request, bypassing the briefing.
    UnlockZone(ZoneId),

    /// The host unloaded a zone's objects.
    Teardown { zone: ZoneId },

    /// Session is ending.
    Shutdown,
}

//=== HostCommand =========================================================

/// Progression notices for UI and narrative systems on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneNotice {
    Unlocked(ZoneId),
    Cleared(ZoneId),
}

/// Fire-and-forget requests sent from core to host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// One-shot clip, positional when `at` is set.
    PlaySound { clip: String, at: Option<Pose> },

    PlayLooping {
        source: String,
        clip: String,
        volume: f32,
    },

    /// Interpolate a source's volume over time on the host.
    FadeAudio {
        source: String,
        target_volume: f32,
        duration_secs: f32,
    },

    StopAudio { source: String },

    SetVolume { source: String, volume: f32 },

    SetRideMotion { ride: String, running: bool },

    SpawnActor {
        actor: ActorHandle,
        prefab: String,
        pose: Pose,
    },

    SetBarrierVisible { barrier: BarrierId, visible: bool },

    /// Material opacity in `0.0..=1.0`.
    SetBarrierOpacity { barrier: BarrierId, opacity: f32 },

    Notify(ZoneNotice),
}
