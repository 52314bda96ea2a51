//=========================================================================
// Input Buffer
//
// Collects translated input events between two frame boundaries.
//
// Responsibilities:
// - Store incoming platform events in arrival order
// - Coalesce runs of pointer motion (only the latest position of a
//   consecutive run of moves matters)
// - Hand the whole batch to the scene host via `drain()`
//
// Notes:
// Order across kinds is preserved: a press, a move and a release that
// arrive in one frame reach the scene in that order. Moves separated by
// any other event are never merged.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================
//
// Represents the transient event store for one frame of input.
//
pub struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates for a busy frame so typical frames never reallocate.
    //
    pub fn new() -> Self {
        const BASE_CAPACITY: usize = 128;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- Push -------------------------------------------------------------
    //
    // Appends an event. A motion event of the same kind as the previous
    // event replaces it instead of growing the batch.
    //
    pub fn push(&mut self, event: InputEvent) {
        if event.is_motion() {
            if let Some(last) = self.events.last_mut() {
                if last.kind() == event.kind() {
                    *last = event;
                    return;
                }
            }
        }
        self.events.push(event);
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns this frame's events, oldest first, and empties the buffer
    // while keeping its capacity.
    //
    pub fn drain(&mut self) -> std::vec::Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    //--- Utilities --------------------------------------------------------
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
