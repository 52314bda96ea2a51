//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use playroom::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::platform::PlatformError;

// Scene system
pub use crate::core::scene::{
    Scene, SceneContext, SceneError, SceneHost, SceneKey, SceneRegistry, SceneTransition,
};
pub use crate::core::timer::TimerId;

// Input
pub use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, KeyCode, Listener, MouseButton, Rect};

// State
pub use crate::core::state::{AppState, Appearance, Pet, Profile};

// Rendering
pub use crate::gfx::{Canvas, Color, PixelBuffer};
