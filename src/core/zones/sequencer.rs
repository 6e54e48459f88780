//=========================================================================
// Shutdown Sequencer
//=========================================================================
//
// Mechanism progress accumulation with an at-most-once completion latch.
//
// Architecture:
//   InteractionEvent → InteractionPrimitive::handle() ─┐
//   tick             → InteractionPrimitive::tick()   ─┴─ units ─> ShutdownSequencer
//                                                                     │
//                                                   ProgressOutcome::Completed (once)
//
// Primitives convert host interaction into abstract integer units (pushes,
// full crank turns, a finished socket run). The sequencer only counts.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::config::MechanismConfig;
use crate::core::host_bridge::InteractionEvent;
use crate::core::timing::{Countdown, TickClock};

//=== ShutdownSequencer ===================================================

/// Result of feeding progress into a [`ShutdownSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Already complete, or zero units.
    Ignored,
    Advanced { current: u32, required: u32 },
    /// Threshold reached by this call. Returned exactly once.
    Completed,
}

/// Snapshot of a sequencer's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownProgress {
    pub current_count: u32,
    pub required_count: u32,
    pub is_complete: bool,
}

/// Counts progress units towards a required total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownSequencer {
    current: u32,
    required: u32,
    complete: bool,
}

impl ShutdownSequencer {
    /// A required count of 0 is treated as 1.
    pub fn new(required: u32) -> Self {
        Self {
            current: 0,
            required: required.max(1),
            complete: false,
        }
    }

    /// Adds `amount` units. Completes when the total reaches the required
    /// count; every call after that is ignored.
    pub fn register_progress(&mut self, amount: u32) -> ProgressOutcome {
        if self.complete {
            debug!("Progress of {} ignored: mechanism already complete", amount);
            return ProgressOutcome::Ignored;
        }
        if amount == 0 {
            return ProgressOutcome::Ignored;
        }

        self.current = self.current.saturating_add(amount);
        if self.current >= self.required {
            self.complete = true;
            ProgressOutcome::Completed
        } else {
            ProgressOutcome::Advanced {
                current: self.current,
                required: self.required,
            }
        }
    }

    pub fn progress(&self) -> ShutdownProgress {
        ShutdownProgress {
            current_count: self.current,
            required_count: self.required,
            is_complete: self.complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

//=== InteractionPrimitive ================================================

/// Converts interaction events into sequencer units.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionPrimitive {
    PushLever(PushLever),
    HandCrank(HandCrank),
    Socket(Socket),
}

impl InteractionPrimitive {
    pub fn from_config(config: &MechanismConfig, clock: &TickClock) -> Self {
        match config {
            MechanismConfig::PushLever { debounce_secs, .. } => Self::PushLever(PushLever {
                debounce_ticks: clock.ticks_for(*debounce_secs),
                cooldown: None,
            }),
            MechanismConfig::HandCrank {
                rotation_threshold_degrees,
                ..
            } => Self::HandCrank(HandCrank {
                threshold_degrees: rotation_threshold_degrees.abs(),
                grabbed: false,
                accumulated: 0.0,
            }),
            MechanismConfig::Socket { auto_run_secs, .. } => Self::Socket(Socket {
                run_ticks: clock.ticks_for(*auto_run_secs),
                run: None,
                seated: false,
            }),
        }
    }

    /// Units produced by one interaction event.
    pub fn handle(&mut self, event: InteractionEvent) -> u32 {
        match self {
            Self::PushLever(lever) => lever.handle(event),
            Self::HandCrank(crank) => crank.handle(event),
            Self::Socket(socket) => socket.handle(event),
        }
    }

    /// Units produced by time passing (socket runs finishing).
    pub fn tick(&mut self) -> u32 {
        match self {
            Self::PushLever(lever) => {
                lever.tick();
                0
            }
            Self::HandCrank(_) => 0,
            Self::Socket(socket) => socket.tick(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PushLever(_) => "push lever",
            Self::HandCrank(_) => "hand crank",
            Self::Socket(_) => "socket",
        }
    }
}

//--- PushLever -----------------------------------------------------------

/// One unit per push; pushes during the push animation are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushLever {
    debounce_ticks: u32,
    cooldown: Option<Countdown>,
}

impl PushLever {
    fn handle(&mut self, event: InteractionEvent) -> u32 {
        if event != InteractionEvent::Push {
            return 0;
        }
        if self.cooldown.is_some() {
            debug!("Lever push ignored during push animation");
            return 0;
        }
        if self.debounce_ticks > 0 {
            self.cooldown = Some(Countdown::new(self.debounce_ticks));
        }
        1
    }

    fn tick(&mut self) {
        if let Some(cooldown) = &mut self.cooldown {
            if cooldown.advance() {
                self.cooldown = None;
            }
        }
    }
}

//--- HandCrank -----------------------------------------------------------

/// One unit per full turn, counted only while grabbed. Deltas at or
/// below the threshold are treated as hand jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct HandCrank {
    threshold_degrees: f32,
    grabbed: bool,
    accumulated: f32,
}

impl HandCrank {
    fn handle(&mut self, event: InteractionEvent) -> u32 {
        match event {
            InteractionEvent::Grab => {
                self.grabbed = true;
                0
            }
            InteractionEvent::Release => {
                self.grabbed = false;
                0
            }
            InteractionEvent::Rotate { degrees } if self.grabbed && degrees.is_finite() => {
                let magnitude = degrees.abs();
                if magnitude <= self.threshold_degrees {
                    return 0;
                }
                self.accumulated += magnitude;
                let turns = (self.accumulated / 360.0).floor();
                self.accumulated -= turns * 360.0;
                turns as u32
            }
            _ => 0,
        }
    }
}

//--- Socket --------------------------------------------------------------

/// Seating the control object starts an automatic run; one unit when it
/// finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Socket {
    run_ticks: u32,
    run: Option<Countdown>,
    seated: bool,
}

impl Socket {
    fn handle(&mut self, event: InteractionEvent) -> u32 {
        if event == InteractionEvent::Socketed && !self.seated {
            self.seated = true;
            self.run = Some(Countdown::new(self.run_ticks));
        }
        0
    }

    fn tick(&mut self) -> u32 {
        if self.run.as_mut().map_or(false, Countdown::advance) {
            self.run = None;
            1
        } else {
            0
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
