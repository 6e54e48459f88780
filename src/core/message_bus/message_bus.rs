//=========================================================================
// Message Bus
//=========================================================================
//
// Type-keyed multi-consumer event fan-out between zone systems.
//
// Architecture:
//   Zone systems → push<M>() → HashMap<TypeId, Vec<M>>
//                                   ↓
//   Observers (barriers, notices) ← read<M>() (shared)
//                                   ↓
//   GlobalSystems ──────────────→ clear_all() at tick start
//
// One queue per event kind. Every observer of a kind sees every event
// pushed during the tick, in push order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;

use log::error;

//=== Internal Dependencies ===============================================

use super::message_queue::MessageQueue;

//=== Public API ==========================================================

/// Marker trait for event kinds carried by the [`MessageBus`].
///
/// Automatically implemented for all types that are Send + 'static.
pub trait Message: Send + 'static {}

impl<T: Send + 'static> Message for T {}

//=========================================================================

/// Per-tick event bus keyed by event kind.
pub struct MessageBus {
    queues: HashMap<TypeId, Box<dyn MessageQueue>>,
}

impl MessageBus {
    /// Creates a new empty message bus.
    pub fn new() -> Self {
        MessageBus {
            queues: HashMap::new(),
        }
    }

    //--- Publishing -------------------------------------------------------

    /// Publishes an event onto the queue for its kind.
    pub fn push<M: Message>(&mut self, msg: M) {
        let queue = self
            .queues
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()));

        match queue.as_any_mut().downcast_mut::<Vec<M>>() {
            Some(events) => events.push(msg),
            None => error!(
                "MessageBus queue for {} holds a foreign type, event dropped",
                std::any::type_name::<M>()
            ),
        }
    }

    //--- Observation ------------------------------------------------------

    /// Returns every event of kind `M` published since the last clear.
    ///
    /// Reading does not consume; several observers can read the same
    /// events within one tick.
    pub fn read<M: Message>(&self) -> &[M] {
        self.queue::<M>().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Removes and returns all events of kind `M`, keeping the allocation.
    pub fn take<M: Message>(&mut self) -> Vec<M> {
        self.queues
            .get_mut(&TypeId::of::<M>())
            .and_then(|q| q.as_any_mut().downcast_mut::<Vec<M>>())
            .map(|v| v.drain(..).collect())
            .unwrap_or_default()
    }

    /// Returns true if any event of kind `M` is queued.
    pub fn has_messages<M: Message>(&self) -> bool {
        self.count::<M>() > 0
    }

    /// Returns the number of queued events of kind `M`.
    pub fn count<M: Message>(&self) -> usize {
        self.queue::<M>().map(Vec::len).unwrap_or(0)
    }

    /// Total events queued across all kinds.
    pub fn total(&self) -> usize {
        self.queues.values().map(|q| q.len()).sum()
    }

    //--- Tick Boundary ----------------------------------------------------

    /// Clears every queue, preserving map entries and capacity.
    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.clear_queue();
        }
    }

    fn queue<M: Message>(&self) -> Option<&Vec<M>> {
        self.queues
            .get(&TypeId::of::<M>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<M>>())
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
