//=========================================================================
// Message Queue Trait
//=========================================================================
//
// Type-erased view over a `Vec<M>` so the bus can store queues of
// different event kinds in one map.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::Message;

//=========================================================================

/// Type-erased queue operations used by the bus at tick boundaries.
pub(super) trait MessageQueue: Send {
    /// Clears all events while preserving allocated capacity.
    fn clear_queue(&mut self);

    /// Number of queued events.
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<M: Message> MessageQueue for Vec<M> {
    fn clear_queue(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================
