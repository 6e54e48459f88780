//=========================================================================
// Session
//=========================================================================
//
// Headless, deterministic driver for one play session.
//
// Architecture:
//   submit(HostEvent) ──> frame events ──tick()──> GlobalSystems::update
//                                                        │
//   take_commands() <── Outbox <─────────────────────────┘
//
// The threaded orchestrator wraps a Session; tests drive one directly,
// one tick at a time, with no wall clock involved.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::config::{ConfigError, ConfigWarning, SessionConfig};
use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::host_bridge::{HostCommand, HostEvent};
use crate::core::message_bus::Message;
use crate::core::timing::TickClock;
use crate::core::zones::{ZoneId, ZoneProgression, ZoneState};

//=== Session =============================================================

pub struct Session {
    systems: GlobalSystems,
    context: GlobalContext,
    warnings: Vec<ConfigWarning>,
    started: bool,
}

impl Session {
    /// Validates `config` and builds every zone system.
    ///
    /// Degradations are kept in [`warnings`](Self::warnings); structural
    /// problems are returned as errors.
    pub fn new(config: &SessionConfig, tps: f64) -> Result<Self, ConfigError> {
        let warnings = config.validate()?;
        let clock = TickClock::new(tps);
        let progression = ZoneProgression::new(config.zone_count(), config.initially_unlocked);

        Ok(Self {
            systems: GlobalSystems::from_config(config, &clock),
            context: GlobalContext::new(progression, clock),
            warnings,
            started: false,
        })
    }

    //--- Driving ----------------------------------------------------------

    /// Queues a host event for the next tick.
    pub fn submit(&mut self, event: HostEvent) {
        self.context.frame_events.push(event);
    }

    /// Runs one tick. The first tick also starts rides and activates the
    /// initially unlocked barriers.
    pub fn tick(&mut self) {
        if !self.started {
            self.started = true;
            self.systems.start(&mut self.context);
        }
        self.systems.update(&mut self.context);
    }

    pub fn run_ticks(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Takes every command queued for the host.
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        self.context.outbox.take()
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_unlocked(&self, zone: ZoneId) -> bool {
        self.context.progression.is_unlocked(zone)
    }

    pub fn zone_state(&self, zone: ZoneId) -> Option<ZoneState> {
        self.systems.zone(zone).map(|controller| controller.state())
    }

    /// Events of kind `M` published during the last tick.
    pub fn events<M: Message>(&self) -> &[M] {
        self.context.message_bus.read::<M>()
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn tick_count(&self) -> u64 {
        self.context.clock.tick()
    }

    pub fn systems(&self) -> &GlobalSystems {
        &self.systems
    }

    pub fn systems_mut(&mut self) -> &mut GlobalSystems {
        &mut self.systems
    }

    pub fn context(&self) -> &GlobalContext {
        &self.context
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host_bridge::{InteractionEvent, ZoneNotice};
    use crate::core::zones::events::ZoneUnlocked;
    use crate::core::zones::BarrierId;

    fn carnival() -> Session {
        let config = SessionConfig::carnival().expect("bundled layout");
        Session::new(&config, 10.0).expect("valid layout")
    }

    #[test]
    fn first_tick_announces_initial_zone() {
        let mut session = carnival();
        assert!(session.take_commands().is_empty());

        session.tick();
        let commands = session.take_commands();
        assert!(commands.contains(&HostCommand::Notify(ZoneNotice::Unlocked(ZoneId(1)))));
        assert!(commands.contains(&HostCommand::SetBarrierVisible {
            barrier: BarrierId(1),
            visible: true
        }));
        assert_eq!(session.tick_count(), 1);
    }

    #[test]
    fn repeated_unlock_activates_barrier_once() {
        let mut session = carnival();
        session.tick();
        session.take_commands();

        for _ in 0..3 {
            session.submit(HostEvent::UnlockZone(ZoneId(2)));
        }
        session.tick();
        assert_eq!(session.events::<ZoneUnlocked>().len(), 1);

        session.submit(HostEvent::UnlockZone(ZoneId(2)));
        session.tick();
        assert!(session.events::<ZoneUnlocked>().is_empty());

        let activations = session
            .take_commands()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    HostCommand::SetBarrierVisible {
                        barrier: BarrierId(2),
                        visible: true
                    }
                )
            })
            .count();
        assert_eq!(activations, 1);
        assert!(session.is_unlocked(ZoneId(2)));
    }

    #[test]
    fn unknown_zone_events_are_ignored() {
        let mut session = carnival();
        session.submit(HostEvent::Interaction {
            zone: ZoneId(9),
            event: InteractionEvent::Push,
        });
        session.submit(HostEvent::UnlockZone(ZoneId(9)));
        session.tick();
        assert!(!session.is_unlocked(ZoneId(9)));
        assert_eq!(session.zone_state(ZoneId(9)), None);
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let config = SessionConfig::from_json_str(r#"{ "zones": [] }"#).expect("parse");
        assert!(matches!(Session::new(&config, 60.0), Err(ConfigError::NoZones)));
    }
}
