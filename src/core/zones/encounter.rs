//=========================================================================
// Encounter Spawner
//=========================================================================
//
// Staggered enemy spawning with deduplicated destruction tracking.
//
// Architecture:
//   begin() ── first spawn now, rest every `stagger` ticks ──> tick()
//                                                                │
//   ActorDestroyed ──> notify_destroyed() ── per-actor latch ────┤
//                                                                ▼
//                              queue empty && active == 0 → Cleared (once)
//
// Each spawned actor carries its own "already notified" flag so an actor
// destroyed through several paths decrements the count once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, VecDeque};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{ActorHandle, Pose, ZoneId};
use crate::core::config::EncounterConfig;
use crate::core::host_bridge::ActorSpawner;
use crate::core::timing::{Countdown, TickClock};

//=== Outcomes ============================================================

/// Encounter state after a step that can clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterSignal {
    Pending,
    /// The encounter cleared during this call. Returned exactly once.
    Cleared,
}

/// Result of reporting an actor's destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// Not an actor of this encounter (or the encounter was disposed).
    Unknown,
    /// This actor was already reported.
    Duplicate,
    Defeated { remaining: usize },
    /// Last outstanding actor; the encounter is now cleared.
    Cleared,
}

//=== EncounterSpawner ====================================================

/// Spawns and tracks one zone's hostile actors.
#[derive(Debug, Clone)]
pub struct EncounterSpawner {
    zone: ZoneId,
    prefab: Option<String>,
    plan: Vec<Pose>,
    spawn_sound: Option<String>,
    stagger_ticks: u32,

    queue: VecDeque<Pose>,
    next_spawn: Option<Countdown>,
    /// Spawned actors and whether their destruction was reported.
    actors: HashMap<ActorHandle, bool>,
    active: usize,

    started: bool,
    cleared: bool,
    disposed: bool,
}

impl EncounterSpawner {
    pub fn from_config(zone: ZoneId, config: &EncounterConfig, clock: &TickClock) -> Self {
        let plan = config
            .spawn_points
            .iter()
            .copied()
            .take(config.effective_count())
            .collect();

        Self {
            zone,
            prefab: config.prefab.clone(),
            plan,
            spawn_sound: config.spawn_sound.clone(),
            stagger_ticks: clock.ticks_for(config.stagger_secs),
            queue: VecDeque::new(),
            next_spawn: None,
            actors: HashMap::new(),
            active: 0,
            started: false,
            cleared: false,
            disposed: false,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Starts the encounter: spawns the first actor now and schedules the
    /// rest. An encounter with nothing to spawn clears immediately.
    pub fn begin(&mut self, spawner: &mut dyn ActorSpawner) -> EncounterSignal {
        if self.started || self.disposed {
            warn!("{}: encounter already started, begin ignored", self.zone);
            return EncounterSignal::Pending;
        }
        self.started = true;
        self.queue = self.plan.iter().copied().collect();

        self.spawn_next(spawner);
        self.schedule_or_drain(spawner);
        self.check_cleared()
    }

    /// Advances the stagger timer, spawning when it elapses.
    pub fn tick(&mut self, spawner: &mut dyn ActorSpawner) -> EncounterSignal {
        if !self.started || self.cleared || self.disposed {
            return EncounterSignal::Pending;
        }

        let due = self.next_spawn.as_mut().map_or(false, Countdown::advance);
        if due {
            self.next_spawn = None;
            self.spawn_next(spawner);
            self.schedule_or_drain(spawner);
        }
        self.check_cleared()
    }

    /// Records the destruction of `actor`. Each actor counts once.
    pub fn notify_destroyed(&mut self, actor: ActorHandle) -> DestroyOutcome {
        let Some(notified) = self.actors.get_mut(&actor) else {
            return DestroyOutcome::Unknown;
        };
        if *notified {
            debug!("{}: duplicate destruction of {:?} ignored", self.zone, actor);
            return DestroyOutcome::Duplicate;
        }
        *notified = true;
        self.active = self.active.saturating_sub(1);

        match self.check_cleared() {
            EncounterSignal::Cleared => DestroyOutcome::Cleared,
            EncounterSignal::Pending => DestroyOutcome::Defeated {
                remaining: self.remaining(),
            },
        }
    }

    /// Drops pending spawns and forgets every actor.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.queue.clear();
        self.next_spawn = None;
        self.actors.clear();
        self.active = 0;
    }

    //--- Spawning ---------------------------------------------------------

    fn spawn_next(&mut self, spawner: &mut dyn ActorSpawner) {
        let Some(pose) = self.queue.pop_front() else {
            return;
        };
        let Some(prefab) = self.prefab.as_deref() else {
            return;
        };

        match spawner.spawn(prefab, pose) {
            Some(actor) if self.actors.contains_key(&actor) => {
                warn!("{}: host reused handle {:?}, spawn not tracked", self.zone, actor);
            }
            Some(actor) => {
                self.actors.insert(actor, false);
                self.active += 1;
                if let Some(clip) = &self.spawn_sound {
                    spawner.play_at(clip, pose);
                }
                debug!("{}: spawned {:?} ({} active)", self.zone, actor, self.active);
            }
            None => warn!("{}: host failed to spawn {}, skipping", self.zone, prefab),
        }
    }

    /// Arms the stagger timer for the next spawn. Without a stagger the
    /// remaining queue is spawned in the same tick.
    fn schedule_or_drain(&mut self, spawner: &mut dyn ActorSpawner) {
        if self.stagger_ticks == 0 {
            while !self.queue.is_empty() {
                self.spawn_next(spawner);
            }
        } else if !self.queue.is_empty() {
            self.next_spawn = Some(Countdown::new(self.stagger_ticks));
        }
    }

    fn check_cleared(&mut self) -> EncounterSignal {
        if self.cleared || self.disposed || !self.queue.is_empty() || self.active > 0 {
            return EncounterSignal::Pending;
        }
        self.cleared = true;
        EncounterSignal::Cleared
    }

    //--- Queries ----------------------------------------------------------

    /// Actors this encounter will attempt to spawn.
    pub fn planned(&self) -> usize {
        self.plan.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Live actors plus those still waiting to spawn.
    pub fn remaining(&self) -> usize {
        self.active + self.queue.len()
    }

    pub fn spawned(&self) -> usize {
        self.actors.len()
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
