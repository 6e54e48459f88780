//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the zone systems running on the logic
// (non-host) thread.
//
// Responsibilities:
// - Own the session (every zone, barrier and the briefing)
// - Receive host events via a crossbeam channel
// - Maintain deterministic pacing using a fixed tick rate (TPS)
// - Send the commands produced by each tick back to the host
//
// Notes:
// The orchestrator runs independently from the host. It is the only
// mutator of zone state; communication with the host occurs only
// through message passing, so no zone state is ever shared or locked.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::{Receiver, Sender};
use log::{info, warn};

//=== Internal Modules ====================================================
pub mod config;
pub mod globals;
pub mod host_bridge;
pub mod message_bus;
pub mod session;
pub mod timing;
pub mod zones;

use host_bridge::{EventCollector, HostCommand, HostEvent, TickControl};

pub use globals::{GlobalContext, GlobalSystems};
pub use session::Session;

//=== CoreSystemsOrchestrator =============================================
//
// Owns the session and schedules its ticks on a background thread.
//
pub(crate) struct CoreSystemsOrchestrator {
    session: Session,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------
    //
    // Wraps a built session but does not yet start the logic thread.
    //
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    //--- init_systems() ---------------------------------------------------
    //
    // Gives the caller one chance to adjust systems before the first tick.
    //
    pub fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems),
    {
        init_fn(self.session.systems_mut());
    }

    //--- spawn_core_thread() ----------------------------------------------
    //
    // Spawns the main logic thread responsible for ticking the session
    // at a fixed update frequency (TPS - ticks per second).
    //
    // Each tick:
    //  1. Collects host events (bounded)
    //  2. Runs the zone pipeline
    //  3. Flushes host commands
    //  4. Sleeps to maintain fixed pacing
    //  5. Exits cleanly after a shutdown tick or on disconnect
    //
    pub fn spawn_core_thread(
        self,
        receiver: Receiver<HostEvent>,
        sender: Sender<HostCommand>,
    ) -> thread::JoinHandle<()> {
        let tps = self.session.context().clock.tps();
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let mut session = self.session;
            let mut collector = EventCollector::new(receiver);
            let mut host_gone = false;

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather host events --------------------------
                let control = collector.collect_frame();
                for event in collector.take_events() {
                    session.submit(event);
                }

                //--- Step 2: Update zone systems -------------------------
                session.tick();

                //--- Step 3: Flush commands ------------------------------
                for command in session.take_commands() {
                    if sender.send(command).is_err() {
                        if !host_gone {
                            warn!("Host command receiver dropped, discarding commands");
                            host_gone = true;
                        }
                        break;
                    }
                }

                if control == TickControl::Exit {
                    info!("Core thread exiting after {} ticks", session.tick_count());
                    break;
                }

                //--- Step 4: Maintain deterministic pacing ---------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        })
    }
}
