//=========================================================================
// Message Bus Module
//=========================================================================
//
// Event fan-out keyed by event kind. Replaces per-object event lists:
// any number of observers read the same tick's events without
// registering callbacks on the publisher.
//
//=========================================================================

//=== Module Declarations =================================================

mod message_bus;
mod message_queue;

//=== Public API ==========================================================

pub use message_bus::{Message, MessageBus};
