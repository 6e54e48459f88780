//=========================================================================
// Zone Barrier
//=========================================================================
//
// Gate blocking entry to a zone until it is unlocked and touched.
//
// Architecture:
//   PlayerContact ──locked──> blocked sound (repeatable, no transition)
//        │
//        └─unlocked─> passed latch ─> Delay ─> down sound ─> Fading ─> hidden
//                                   (Countdown)             (Tween 1→0)
//
// `passed` is a one-shot latch: the dissolve runs at most once per
// barrier, and a passed barrier is never shown again.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::events::{BarrierBlocked, BarrierDissolved};
use super::{BarrierId, Pose, ZoneId};
use crate::core::config::BarrierConfig;
use crate::core::globals::GlobalContext;
use crate::core::timing::{lerp, Countdown, TickClock, Tween};

//=== Outcomes ============================================================

/// Result of the player touching a barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Zone locked; blocked signal played.
    Blocked,
    /// Zone unlocked; dissolve started by this contact.
    Dissolving,
    AlreadyPassed,
    /// Barrier was torn down.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DissolvePhase {
    Idle,
    Delay(Countdown),
    Fading(Tween),
    Done,
}

//=== ZoneBarrier =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBarrier {
    id: BarrierId,
    zone: ZoneId,
    pose: Option<Pose>,
    active: bool,
    passed: bool,
    disposed: bool,
    phase: DissolvePhase,
    delay_ticks: u32,
    dissolve_ticks: u32,
    blocked_sound: Option<String>,
    down_sound: Option<String>,
}

impl ZoneBarrier {
    pub fn from_config(zone: ZoneId, config: &BarrierConfig, clock: &TickClock) -> Self {
        Self {
            id: config.id,
            zone,
            pose: config.pose,
            active: false,
            passed: false,
            disposed: false,
            phase: DissolvePhase::Idle,
            delay_ticks: clock.ticks_for(config.dissolve_delay_secs),
            dissolve_ticks: clock.ticks_for(config.dissolve_secs),
            blocked_sound: config.blocked_sound.clone(),
            down_sound: config.down_sound.clone(),
        }
    }

    //--- Activation -------------------------------------------------------

    /// Makes the barrier visible and interactable once its zone unlocks.
    ///
    /// Returns false when already active, passed or torn down.
    pub fn activate(&mut self, ctx: &mut GlobalContext) -> bool {
        if self.active || self.passed || self.disposed {
            return false;
        }
        self.active = true;
        ctx.outbox.set_barrier_visible(self.id, true);
        debug!("{} for {} activated", self.id, self.zone);
        true
    }

    //--- Contact ----------------------------------------------------------

    pub fn on_player_contact(&mut self, ctx: &mut GlobalContext) -> ContactOutcome {
        if self.disposed {
            return ContactOutcome::Ignored;
        }
        if self.passed {
            return ContactOutcome::AlreadyPassed;
        }

        if !ctx.progression.is_unlocked(self.zone) {
            info!("{} is locked, {} blocks entry", self.zone, self.id);
            if let Some(clip) = &self.blocked_sound {
                ctx.outbox.play_sound(clip, self.pose);
            }
            ctx.message_bus.push(BarrierBlocked {
                barrier: self.id,
                zone: self.zone,
            });
            return ContactOutcome::Blocked;
        }

        self.begin_dissolve();
        info!("{} passed, dissolving", self.id);
        ContactOutcome::Dissolving
    }

    /// Opens the barrier without player contact. Locked zones stay
    /// blocked, silently.
    pub fn start_dissolve(&mut self, ctx: &mut GlobalContext) -> ContactOutcome {
        if self.disposed {
            return ContactOutcome::Ignored;
        }
        if self.passed {
            return ContactOutcome::AlreadyPassed;
        }
        if !ctx.progression.is_unlocked(self.zone) {
            debug!("{} still locked, {} stays up", self.zone, self.id);
            return ContactOutcome::Blocked;
        }

        self.begin_dissolve();
        info!("{} dissolving on request", self.id);
        ContactOutcome::Dissolving
    }

    fn begin_dissolve(&mut self) {
        self.passed = true;
        self.phase = DissolvePhase::Delay(Countdown::new(self.delay_ticks));
    }

    //--- Dissolve ---------------------------------------------------------

    /// Advances the dissolve by one tick.
    pub fn tick(&mut self, ctx: &mut GlobalContext) {
        if self.disposed {
            return;
        }

        match &mut self.phase {
            DissolvePhase::Idle | DissolvePhase::Done => {}
            DissolvePhase::Delay(delay) => {
                if delay.advance() {
                    if let Some(clip) = &self.down_sound {
                        ctx.outbox.play_sound(clip, self.pose);
                    }
                    self.phase = DissolvePhase::Fading(Tween::new(self.dissolve_ticks));
                }
            }
            DissolvePhase::Fading(fade) => {
                let t = fade.advance();
                let finished = fade.is_finished();
                ctx.outbox.set_barrier_opacity(self.id, lerp(1.0, 0.0, t));
                if finished {
                    self.finish(ctx);
                }
            }
        }
    }

    fn finish(&mut self, ctx: &mut GlobalContext) {
        self.phase = DissolvePhase::Done;
        self.active = false;
        ctx.outbox.set_barrier_visible(self.id, false);
        ctx.message_bus.push(BarrierDissolved {
            barrier: self.id,
            zone: self.zone,
        });
        info!("{} dissolved, {} open", self.id, self.zone);
    }

    /// Stops any in-flight dissolve silently.
    pub fn teardown(&mut self) {
        self.disposed = true;
        self.active = false;
        if matches!(self.phase, DissolvePhase::Delay(_) | DissolvePhase::Fading(_)) {
            self.phase = DissolvePhase::Idle;
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> BarrierId {
        self.id
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_been_passed(&self) -> bool {
        self.passed
    }

    pub fn is_dissolving(&self) -> bool {
        matches!(self.phase, DissolvePhase::Delay(_) | DissolvePhase::Fading(_))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
