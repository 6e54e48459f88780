//=========================================================================
// Carnival Engine
//
// Main entry point and coordinator for a play session.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──start()──>  EngineHandle
//         │                          │                      │
//         ├─ with_tps()              ├─ init()              ├─ send(HostEvent)
//         ├─ with_channel_capacity() └─ spawns logic        ├─ commands()
//         └─ with_layout()              thread              └─ shutdown()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Receiver, SendError, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::config::{ConfigError, SessionConfig};
use crate::core::host_bridge::{HostCommand, HostEvent};
use crate::core::{CoreSystemsOrchestrator, GlobalSystems, Session};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 host events
/// - **Layout**: the bundled five-zone carnival
///
/// # Examples
///
/// ```no_run
/// use carnival_engine::EngineBuilder;
/// use carnival_engine::core::host_bridge::HostEvent;
///
/// let engine = EngineBuilder::new()
///     .with_tps(90.0)
///     .build()
///     .expect("layout is valid");
///
/// let handle = engine.start();
/// handle.send(HostEvent::RadioPressed).ok();
/// handle.shutdown();
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    layout: Option<SessionConfig>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            layout: None,
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Every timed sequence (settle delays, staggered spawns, fades) is
    /// counted in ticks at this rate.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for host → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Uses `layout` instead of the bundled carnival.
    pub fn with_layout(mut self, layout: SessionConfig) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Validates the layout and builds the engine.
    pub fn build(self) -> Result<Engine, ConfigError> {
        info!(
            "Building engine (TPS: {}, channel: {})",
            self.tps, self.channel_capacity
        );

        let layout = match self.layout {
            Some(layout) => layout,
            None => SessionConfig::carnival()?,
        };
        let session = Session::new(&layout, self.tps)?;

        Ok(Engine {
            orchestrator: CoreSystemsOrchestrator::new(session),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Carnival session runtime.
///
/// # Architecture
///
/// ```text
/// Host (caller's thread)
///   │  HostEvent ──bounded channel──►  CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │                                    └─► Zones, Barriers, Briefing
///   └─ HostCommand ◄─unbounded channel──┘
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Adjusts zone systems before the session starts.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems),
    {
        info!("Initializing zone systems");
        self.orchestrator.init_systems(init_fn);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Spawns the logic thread and returns the host's end of the channels.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the host → core (bounded) and core → host channels
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. The thread exits on `HostEvent::Shutdown` or when the handle's
    ///    sender is dropped
    pub fn start(self) -> EngineHandle {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let (event_tx, event_rx) = bounded(self.channel_capacity);
        let (command_tx, command_rx) = unbounded();
        info!("Host channels created (capacity: {})", self.channel_capacity);

        let core = self.orchestrator.spawn_core_thread(event_rx, command_tx);
        info!("Core logic thread spawned");

        EngineHandle {
            events: Some(event_tx),
            commands: command_rx,
            core: Some(core),
        }
    }
}

//=== EngineHandle ========================================================

/// Host side of a running engine.
///
/// Dropping the handle shuts the logic thread down and waits for it.
pub struct EngineHandle {
    events: Option<Sender<HostEvent>>,
    commands: Receiver<HostCommand>,
    core: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Sends an event to the logic thread. Blocks while the channel is
    /// full; fails once the thread has exited.
    pub fn send(&self, event: HostEvent) -> Result<(), SendError<HostEvent>> {
        match &self.events {
            Some(events) => events.send(event),
            None => Err(SendError(event)),
        }
    }

    /// Commands produced by the logic thread.
    pub fn commands(&self) -> &Receiver<HostCommand> {
        &self.commands
    }

    /// Requests shutdown and waits for the logic thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(events) = self.events.take() {
            // The thread may already be gone; dropping the sender covers it.
            let _ = events.send(HostEvent::Shutdown);
        }

        if let Some(core) = self.core.take() {
            match core.join() {
                Ok(()) => info!("Core thread terminated cleanly"),
                Err(e) => error!("Core thread panicked: {:?}", e),
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
