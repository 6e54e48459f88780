//=========================================================================
// Outbox
//=========================================================================
//
// Per-tick buffer of host commands.
//
// Architecture:
//   Zone systems → Outbox::{play_sound, spawn, ...} → Vec<HostCommand>
//                                                          ↓
//   CoreSystemsOrchestrator ──take()──> Sender<HostCommand> → host
//
// Actor spawning goes through the `ActorSpawner` seam so encounters can
// be exercised against hosts that refuse or fail a spawn.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{HostCommand, ZoneNotice};
use crate::core::zones::{ActorHandle, BarrierId, Pose};

//=== ActorSpawner ========================================================

/// Actor instantiation as provided by the render/physics host.
pub trait ActorSpawner {
    /// Instantiates `prefab` at `pose`. `None` when the host cannot
    /// produce the actor; the caller skips that spawn.
    fn spawn(&mut self, prefab: &str, pose: Pose) -> Option<ActorHandle>;

    /// Positional one-shot sound accompanying a spawn.
    fn play_at(&mut self, _clip: &str, _pose: Pose) {}
}

//=== Outbox ==============================================================

/// Commands queued for the host during the current tick.
#[derive(Debug, Default)]
pub struct Outbox {
    commands: Vec<HostCommand>,
    next_actor: u64,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: HostCommand) {
        self.commands.push(command);
    }

    //--- Audio ------------------------------------------------------------

    pub fn play_sound(&mut self, clip: &str, at: Option<Pose>) {
        self.push(HostCommand::PlaySound {
            clip: clip.to_string(),
            at,
        });
    }

    pub fn play_looping(&mut self, source: &str, clip: &str, volume: f32) {
        self.push(HostCommand::PlayLooping {
            source: source.to_string(),
            clip: clip.to_string(),
            volume,
        });
    }

    pub fn fade_audio(&mut self, source: &str, target_volume: f32, duration_secs: f32) {
        self.push(HostCommand::FadeAudio {
            source: source.to_string(),
            target_volume,
            duration_secs,
        });
    }

    pub fn stop_audio(&mut self, source: &str) {
        self.push(HostCommand::StopAudio {
            source: source.to_string(),
        });
    }

    pub fn set_volume(&mut self, source: &str, volume: f32) {
        self.push(HostCommand::SetVolume {
            source: source.to_string(),
            volume,
        });
    }

    //--- Scene Objects ----------------------------------------------------

    pub fn set_ride_motion(&mut self, ride: &str, running: bool) {
        self.push(HostCommand::SetRideMotion {
            ride: ride.to_string(),
            running,
        });
    }

    pub fn set_barrier_visible(&mut self, barrier: BarrierId, visible: bool) {
        self.push(HostCommand::SetBarrierVisible { barrier, visible });
    }

    pub fn set_barrier_opacity(&mut self, barrier: BarrierId, opacity: f32) {
        self.push(HostCommand::SetBarrierOpacity { barrier, opacity });
    }

    pub fn notify(&mut self, notice: ZoneNotice) {
        self.push(HostCommand::Notify(notice));
    }

    //--- Draining ---------------------------------------------------------

    /// Commands queued since the last [`take`](Self::take).
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Takes all queued commands, leaving the outbox empty.
    pub fn take(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl ActorSpawner for Outbox {
    /// Allocates a session-unique handle and asks the host to bind it.
    fn spawn(&mut self, prefab: &str, pose: Pose) -> Option<ActorHandle> {
        self.next_actor += 1;
        let actor = ActorHandle(self.next_actor);
        self.push(HostCommand::SpawnActor {
            actor,
            prefab: prefab.to_string(),
            pose,
        });
        Some(actor)
    }

    fn play_at(&mut self, clip: &str, pose: Pose) {
        self.play_sound(clip, Some(pose));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
