//=========================================================================
// Core Systems
//
// Everything the frame loop needs that does not touch the OS.
//
// Responsibilities:
// - Scene lifecycle and the per-frame tick (`scene`)
// - Input events, routing and hit regions (`input`)
// - Frame deltas (`clock`) and fire-once timers (`timer`)
// - Persisted profiles and high scores (`state`)
//
// Notes:
// All of it runs on the platform's thread; nothing in here is shared
// across threads or locked.
//
//=========================================================================

pub mod clock;
pub mod input;
pub mod scene;
pub mod state;
pub mod timer;
