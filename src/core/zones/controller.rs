//=========================================================================
// Zone Controller
//=========================================================================
//
// One zone's shutdown → ride stop → encounter → cleared pipeline.
//
// State Machine:
//   Idle ──first interaction──> MechanismActive ──sequencer complete──> RidesStopped
//                                                                           │
//                                                                   settle countdown
//                                                                           ▼
//   Cleared <──────────────encounter cleared────────────────────── EncounterSpawned
//
//   any state ──teardown──> Disposed (terminal, pending work dropped)
//
// Transitions only move forward. A signal aimed at a state the zone has
// already left is ignored, so duplicate completions never stop rides
// twice or respawn an encounter.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::encounter::{DestroyOutcome, EncounterSignal, EncounterSpawner};
use super::events::{
    EncounterStarted, EnemyDefeated, MechanismCompleted, MechanismProgressed, RidesStopped,
    ZoneCleared,
};
use super::ride::RideController;
use super::sequencer::{InteractionPrimitive, ProgressOutcome, ShutdownProgress, ShutdownSequencer};
use super::{ActorHandle, ZoneId};
use crate::core::config::{MechanismSounds, ZoneConfig};
use crate::core::globals::GlobalContext;
use crate::core::host_bridge::InteractionEvent;
use crate::core::timing::{Countdown, TickClock};

//=== ZoneState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneState {
    Idle,
    MechanismActive,
    RidesStopped,
    EncounterSpawned,
    Cleared,
    /// Torn down by the host. Terminal.
    Disposed,
}

//=== ZoneController ======================================================

pub struct ZoneController {
    zone: ZoneId,
    state: ZoneState,
    primitive: InteractionPrimitive,
    sequencer: ShutdownSequencer,
    sounds: MechanismSounds,
    rides: Vec<RideController>,
    encounter: EncounterSpawner,
    settle_ticks: u32,
    settle: Option<Countdown>,
}

impl ZoneController {
    pub fn from_config(config: &ZoneConfig, clock: &TickClock) -> Self {
        Self {
            zone: config.zone,
            state: ZoneState::Idle,
            primitive: InteractionPrimitive::from_config(&config.mechanism, clock),
            sequencer: ShutdownSequencer::new(config.mechanism.required_units()),
            sounds: config.mechanism.sounds().clone(),
            rides: config
                .rides
                .iter()
                .map(|ride| RideController::from_config(ride, clock))
                .collect(),
            encounter: EncounterSpawner::from_config(config.zone, &config.encounter, clock),
            settle_ticks: clock.ticks_for(config.settle_delay_secs),
            settle: None,
        }
    }

    //--- Inbound Signals --------------------------------------------------

    /// Feeds a host interaction to the zone's mechanism. The first one
    /// moves the zone out of `Idle`.
    pub fn handle_interaction(&mut self, event: InteractionEvent, ctx: &mut GlobalContext) {
        match self.state {
            ZoneState::Idle => {
                self.state = ZoneState::MechanismActive;
                info!("{}: mechanism engaged ({})", self.zone, self.primitive.kind());
            }
            ZoneState::MechanismActive => {}
            state => {
                debug!("{}: interaction ignored in {:?}", self.zone, state);
                return;
            }
        }

        let units = self.primitive.handle(event);
        self.apply_units(units, ctx);
    }

    /// Stops the zone's rides and schedules the encounter.
    ///
    /// Returns false, with no side effects, unless the zone is in
    /// `MechanismActive`.
    pub fn handle_mechanism_complete(&mut self, ctx: &mut GlobalContext) -> bool {
        if self.state != ZoneState::MechanismActive {
            debug!("{}: mechanism completion ignored in {:?}", self.zone, self.state);
            return false;
        }
        self.state = ZoneState::RidesStopped;

        let mut stopped = 0;
        for ride in &mut self.rides {
            if ride.stop(&mut ctx.outbox) {
                stopped += 1;
            }
        }
        if let Some(clip) = &self.sounds.rides_stopped {
            ctx.outbox.play_sound(clip, None);
        }
        ctx.message_bus.push(RidesStopped {
            zone: self.zone,
            count: stopped,
        });
        info!("{}: {} ride(s) stopped", self.zone, stopped);

        self.settle = Some(Countdown::new(self.settle_ticks));
        true
    }

    /// Reports a destroyed actor. Returns true if it belonged to this
    /// zone's encounter.
    pub fn handle_actor_destroyed(&mut self, actor: ActorHandle, ctx: &mut GlobalContext) -> bool {
        match self.encounter.notify_destroyed(actor) {
            DestroyOutcome::Unknown => false,
            DestroyOutcome::Duplicate => true,
            DestroyOutcome::Defeated { remaining } => {
                ctx.message_bus.push(EnemyDefeated {
                    zone: self.zone,
                    actor,
                    remaining,
                });
                debug!("{}: enemy down, {} remaining", self.zone, remaining);
                true
            }
            DestroyOutcome::Cleared => {
                ctx.message_bus.push(EnemyDefeated {
                    zone: self.zone,
                    actor,
                    remaining: 0,
                });
                self.handle_encounter_cleared(ctx);
                true
            }
        }
    }

    /// Marks the zone cleared. Only valid from `EncounterSpawned`; any
    /// other state is an ordering violation and is ignored.
    pub fn handle_encounter_cleared(&mut self, ctx: &mut GlobalContext) -> bool {
        if self.state != ZoneState::EncounterSpawned {
            warn!("{}: clear signal ignored in {:?}", self.zone, self.state);
            return false;
        }
        self.state = ZoneState::Cleared;
        ctx.message_bus.push(ZoneCleared { zone: self.zone });
        info!("{}: cleared", self.zone);
        true
    }

    //--- Tick -------------------------------------------------------------

    /// Advances timers for the state the zone was in at the start of the
    /// tick. A transition taken here waits for the next tick to progress.
    pub fn tick(&mut self, ctx: &mut GlobalContext) {
        if self.state == ZoneState::Disposed {
            return;
        }
        for ride in &mut self.rides {
            ride.tick(&mut ctx.outbox);
        }

        match self.state {
            ZoneState::MechanismActive => {
                let units = self.primitive.tick();
                self.apply_units(units, ctx);
            }
            ZoneState::RidesStopped => {
                let settled = self.settle.as_mut().map_or(false, Countdown::advance);
                if settled {
                    self.settle = None;
                    self.begin_encounter(ctx);
                }
            }
            ZoneState::EncounterSpawned => {
                if self.encounter.tick(&mut ctx.outbox) == EncounterSignal::Cleared {
                    self.handle_encounter_cleared(ctx);
                }
            }
            ZoneState::Idle | ZoneState::Cleared | ZoneState::Disposed => {}
        }
    }

    /// Drops every pending countdown, fade and spawn.
    pub fn teardown(&mut self) {
        if self.state == ZoneState::Disposed {
            return;
        }
        info!("{}: torn down in {:?}", self.zone, self.state);
        self.state = ZoneState::Disposed;
        self.settle = None;
        for ride in &mut self.rides {
            ride.abandon();
        }
        self.encounter.dispose();
    }

    /// Starts every ride. Used when the session begins.
    pub fn start_rides(&mut self, ctx: &mut GlobalContext) {
        if self.state == ZoneState::Disposed {
            return;
        }
        for ride in &mut self.rides {
            ride.start(&mut ctx.outbox);
        }
    }

    //--- Internals --------------------------------------------------------

    fn apply_units(&mut self, units: u32, ctx: &mut GlobalContext) {
        if units == 0 {
            return;
        }
        match self.sequencer.register_progress(units) {
            ProgressOutcome::Ignored => {}
            ProgressOutcome::Advanced { current, required } => {
                if let Some(clip) = &self.sounds.progress {
                    ctx.outbox.play_sound(clip, None);
                }
                ctx.message_bus.push(MechanismProgressed {
                    zone: self.zone,
                    current,
                    required,
                });
                debug!("{}: mechanism {}/{}", self.zone, current, required);
            }
            ProgressOutcome::Completed => {
                if let Some(clip) = &self.sounds.complete {
                    ctx.outbox.play_sound(clip, None);
                }
                ctx.message_bus.push(MechanismCompleted { zone: self.zone });
                info!("{}: mechanism complete", self.zone);
                self.handle_mechanism_complete(ctx);
            }
        }
    }

    fn begin_encounter(&mut self, ctx: &mut GlobalContext) {
        self.state = ZoneState::EncounterSpawned;
        ctx.message_bus.push(EncounterStarted {
            zone: self.zone,
            planned: self.encounter.planned(),
        });
        info!("{}: encounter started ({} planned)", self.zone, self.encounter.planned());

        if self.encounter.begin(&mut ctx.outbox) == EncounterSignal::Cleared {
            self.handle_encounter_cleared(ctx);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn state(&self) -> ZoneState {
        self.state
    }

    pub fn progress(&self) -> ShutdownProgress {
        self.sequencer.progress()
    }

    pub fn rides(&self) -> &[RideController] {
        &self.rides
    }

    pub fn encounter(&self) -> &EncounterSpawner {
        &self.encounter
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
