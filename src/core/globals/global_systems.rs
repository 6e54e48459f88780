//=========================================================================
// Global Systems
//=========================================================================
//
// Container for zone systems with logic.
//
// Owns every zone controller, barrier and the radio briefing, and runs
// them in a fixed order each tick. Systems operate on GlobalContext data.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::config::SessionConfig;
use crate::core::host_bridge::{HostEvent, ZoneNotice};
use crate::core::timing::TickClock;
use crate::core::zones::events::{ZoneCleared, ZoneUnlocked};
use crate::core::zones::{BarrierId, RadioBriefing, ZoneBarrier, ZoneController, ZoneId};

//=== GlobalSystems =======================================================

/// Container for zone logic systems.
///
/// # Available Systems
///
/// - `zones`: One controller per zone, in layout order
/// - `barriers`: Every barrier, each tagged with the zone it gates
/// - `briefing`: Radio briefing, if the layout declares one
pub struct GlobalSystems {
    pub zones: Vec<ZoneController>,
    pub barriers: Vec<ZoneBarrier>,
    pub briefing: Option<RadioBriefing>,
}

impl GlobalSystems {
    /// Builds every system from a validated layout.
    pub(crate) fn from_config(config: &SessionConfig, clock: &TickClock) -> Self {
        let zones = config
            .zones
            .iter()
            .map(|zone| ZoneController::from_config(zone, clock))
            .collect();

        let barriers = config
            .zones
            .iter()
            .flat_map(|zone| {
                zone.barriers
                    .iter()
                    .map(move |barrier| ZoneBarrier::from_config(zone.zone, barrier, clock))
            })
            .collect();

        let briefing = config
            .briefing
            .as_ref()
            .map(|briefing| RadioBriefing::from_config(briefing, clock));

        Self {
            zones,
            barriers,
            briefing,
        }
    }

    //--- Lookup -----------------------------------------------------------

    pub fn zone(&self, zone: ZoneId) -> Option<&ZoneController> {
        self.zones.iter().find(|controller| controller.zone() == zone)
    }

    pub fn zone_mut(&mut self, zone: ZoneId) -> Option<&mut ZoneController> {
        self.zones.iter_mut().find(|controller| controller.zone() == zone)
    }

    pub fn barrier(&self, barrier: BarrierId) -> Option<&ZoneBarrier> {
        self.barriers.iter().find(|b| b.id() == barrier)
    }

    //--- Session Start ----------------------------------------------------

    /// Starts every ride, activates barriers of initially unlocked zones
    /// and announces those zones to the host.
    pub(crate) fn start(&mut self, context: &mut GlobalContext) {
        for zone in &mut self.zones {
            zone.start_rides(context);
        }

        let unlocked: Vec<ZoneId> = context.progression.unlocked_zones().collect();
        for zone in &unlocked {
            self.activate_barriers(*zone, context);
            context.outbox.notify(ZoneNotice::Unlocked(*zone));
        }
        info!("Session started with {:?} unlocked", unlocked);
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates all zone systems for the current tick.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Bus Reset**: Drops the previous tick's events
    /// 2. **Dispatch**: Routes host events to zones, barriers and the radio
    /// 3. **Briefing**: Advances cooldown and finished cues (may unlock zones)
    /// 4. **Zones**: Advances mechanisms, settle delays, spawns and fades
    /// 5. **Barriers**: Activates barriers of newly unlocked zones, advances dissolves
    /// 6. **Notices**: Forwards unlock/clear events to the host
    /// 7. **Clock**: Advances the tick counter
    pub(crate) fn update(&mut self, context: &mut GlobalContext) {
        // 1. Fresh bus for this tick
        context.message_bus.clear_all();

        // 2. Route host events
        let events = std::mem::take(&mut context.frame_events);
        for event in events {
            self.dispatch(event, context);
        }

        // 3. Briefing
        if let Some(briefing) = &mut self.briefing {
            briefing.tick(context);
        }

        // 4. Zone pipelines
        for zone in &mut self.zones {
            zone.tick(context);
        }

        // 5. Barrier activation and dissolves
        let newly_unlocked: Vec<ZoneId> = context
            .message_bus
            .read::<ZoneUnlocked>()
            .iter()
            .map(|unlocked| unlocked.zone)
            .collect();
        for zone in &newly_unlocked {
            self.activate_barriers(*zone, context);
        }
        for barrier in &mut self.barriers {
            barrier.tick(context);
        }

        // 6. Notices for host-side UI and narrative
        for zone in newly_unlocked {
            context.outbox.notify(ZoneNotice::Unlocked(zone));
        }
        let cleared: Vec<ZoneId> = context
            .message_bus
            .read::<ZoneCleared>()
            .iter()
            .map(|cleared| cleared.zone)
            .collect();
        for zone in cleared {
            context.outbox.notify(ZoneNotice::Cleared(zone));
        }

        // 7. Tick boundary
        context.clock.advance();
    }

    fn dispatch(&mut self, event: HostEvent, context: &mut GlobalContext) {
        match event {
            HostEvent::Interaction { zone, event } => match self.zone_mut(zone) {
                Some(controller) => controller.handle_interaction(event, context),
                None => warn!("Interaction for unknown {}", zone),
            },
            HostEvent::PlayerContact { barrier } => {
                match self.barriers.iter_mut().find(|b| b.id() == barrier) {
                    Some(gate) => {
                        gate.on_player_contact(context);
                    }
                    None => warn!("Contact with unknown {}", barrier),
                }
            }
            HostEvent::DissolveBarriers { zone } => {
                let mut found = false;
                for gate in self.barriers.iter_mut().filter(|b| b.zone() == zone) {
                    found = true;
                    gate.start_dissolve(context);
                }
                if !found {
                    warn!("Dissolve requested for {} which has no barriers", zone);
                }
            }
            HostEvent::ActorDestroyed { actor } => {
                let claimed = self
                    .zones
                    .iter_mut()
                    .any(|zone| zone.handle_actor_destroyed(actor, context));
                if !claimed {
                    debug!("Destruction of untracked {:?} ignored", actor);
                }
            }
            HostEvent::RadioPressed => match &mut self.briefing {
                Some(briefing) => {
                    briefing.request(context);
                }
                None => info!("Radio pressed but no briefing is configured"),
            },
            HostEvent::UnlockZone(zone) => {
                context.progression.unlock_zone(zone, &mut context.message_bus);
            }
            HostEvent::Teardown { zone } => self.teardown_zone(zone),
            HostEvent::Shutdown => self.teardown_all(),
        }
    }

    //--- Teardown ---------------------------------------------------------

    /// Disposes one zone and its barriers.
    pub fn teardown_zone(&mut self, zone: ZoneId) {
        match self.zone_mut(zone) {
            Some(controller) => controller.teardown(),
            None => warn!("Teardown for unknown {}", zone),
        }
        for barrier in self.barriers.iter_mut().filter(|b| b.zone() == zone) {
            barrier.teardown();
        }
    }

    pub fn teardown_all(&mut self) {
        info!("Tearing down all zones");
        for zone in &mut self.zones {
            zone.teardown();
        }
        for barrier in &mut self.barriers {
            barrier.teardown();
        }
    }

    fn activate_barriers(&mut self, zone: ZoneId, context: &mut GlobalContext) {
        for barrier in self.barriers.iter_mut().filter(|b| b.zone() == zone) {
            barrier.activate(context);
        }
    }
}
