//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use carnival_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineHandle};
pub use crate::core::Session;

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Configuration
pub use crate::core::config::{ConfigError, ConfigWarning, SessionConfig};

// Host bridge
pub use crate::core::host_bridge::{
    ActorSpawner, HostCommand, HostEvent, InteractionEvent, ZoneNotice,
};

// Zones
pub use crate::core::zones::{
    ActorHandle, BarrierId, ContactOutcome, Pose, UnlockOutcome, ZoneId, ZoneState,
};

// Message bus
pub use crate::core::message_bus::MessageBus;
