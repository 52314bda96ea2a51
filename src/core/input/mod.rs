//=========================================================================
// Input
//
// Everything between the platform's raw events and a scene's reaction.
//
// Responsibilities:
// - Portable event vocabulary (`InputEvent`, `KeyCode`, `MouseButton`)
// - Routing to per-scene listeners with display → surface scaling
// - Shared hit testing for on-screen buttons
//
// Scenes compose these pieces instead of wiring platform callbacks
// themselves: attach in `init`, drain in `update`, detach in `cleanup`.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod hit;
pub mod router;

//=== Public API ==========================================================

pub use event::{EventKind, InputEvent, KeyCode, MouseButton};
pub use hit::{Button, ButtonSet, Rect};
pub use router::{DisplayMapping, InputRouter, Listener, ListenerId};
