//=========================================================================
// Carnival Engine — Library Root
//
// This crate defines the public API surface of the carnival session
// core: zone progression and ride-shutdown orchestration for a VR
// carnival shooter whose rendering, physics and audio live in a host.
//
// Responsibilities:
// - Expose the threaded runtime (`EngineBuilder`, `Engine`, `EngineHandle`)
// - Expose the deterministic `Session` driver and the zone systems
// - Keep host interaction to typed events in and typed commands out
//
// Typical usage:
// ```no_run
// use carnival_engine::EngineBuilder;
// use carnival_engine::core::host_bridge::HostEvent;
//
// let handle = EngineBuilder::new().build().expect("valid layout").start();
// handle.send(HostEvent::RadioPressed).ok();
// for command in handle.commands().try_iter() {
//     println!("{:?}", command);
// }
// handle.shutdown();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the zone systems, configuration and host bridge.
// Hosts that drive ticks themselves use `core::Session` directly.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the threaded entry point and its builder.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineHandle};
