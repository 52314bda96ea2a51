//=========================================================================
// Scene System
//=========================================================================
//
// Single-active-scene lifecycle and the per-frame loop that drives it.
//
// Architecture:
//   SceneHost
//     ├─ registry:    SceneRegistry<K> (key → factory)
//     ├─ surface:     Canvas (shared render target)
//     ├─ input:       InputRouter (scene listeners)
//     ├─ timers:      TimerQueue (generation-tagged)
//     ├─ transitions: TransitionQueue<K>
//     └─ active:      Option<Box<dyn Scene<K>>>
//
// Lifecycle:
//   activate(): old.cleanup() → generation += 1 → new.init() → new.resize()
//   tick():     clock → timers → clear → update → draw → transitions
//
//=========================================================================

//=== Module Declarations =================================================

mod host;
mod registry;
mod transition_queue;

//=== Public API ==========================================================

pub use host::SceneHost;
pub use registry::{SceneFactory, SceneRegistry};
pub use transition_queue::TransitionQueue;

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::InputRouter;
use crate::core::state::AppState;
use crate::core::timer::{Generation, TimerId, TimerQueue};
use crate::gfx::{Canvas, CanvasError};

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Typically implemented by an application-level enum.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== Scene Transition ====================================================

/// A request to change the active scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition<K: SceneKey> {
    /// Tear down the active scene and activate a fresh `K`.
    Switch(K),

    /// No transition occurs.
    Empty,
}

impl<K: SceneKey> Default for SceneTransition<K> {
    fn default() -> Self {
        Self::Empty
    }
}

//=== SceneError ==========================================================

#[derive(Debug, Error)]
pub enum SceneError {
    /// A render surface or offscreen buffer could not be allocated.
    #[error("surface allocation failed: {0}")]
    Surface(#[from] CanvasError),

    #[error("scene {scene} failed to initialize: {reason}")]
    Init { scene: &'static str, reason: String },

    #[error("no scene registered for {0}")]
    Unregistered(String),
}

//=== SceneContext ========================================================

/// What a scene may touch while it runs.
///
/// Built by the host for each lifecycle call and bound to the scene's
/// activation, so timers scheduled through it belong to that activation.
pub struct SceneContext<'a, K: SceneKey> {
    /// Listener attachment and detachment.
    pub input: &'a mut InputRouter,

    /// Persisted application state.
    pub state: &'a mut AppState,

    transitions: &'a mut TransitionQueue<K>,
    timers: &'a mut TimerQueue,
    generation: Generation,
    surface_size: (u32, u32),
}

impl<'a, K: SceneKey> SceneContext<'a, K> {
    pub(crate) fn new(
        input: &'a mut InputRouter,
        state: &'a mut AppState,
        transitions: &'a mut TransitionQueue<K>,
        timers: &'a mut TimerQueue,
        generation: Generation,
        surface_size: (u32, u32),
    ) -> Self {
        Self {
            input,
            state,
            transitions,
            timers,
            generation,
            surface_size,
        }
    }

    /// Queues a switch to `key`; applied after this frame's draw.
    pub fn switch_to(&mut self, key: K) {
        self.transitions.push(SceneTransition::Switch(key));
    }

    /// Schedules a fire-once timer delivered to `Scene::on_timer`.
    ///
    /// If the scene is torn down first, the timer is dropped unseen.
    pub fn schedule(&mut self, delay_ms: f64) -> TimerId {
        self.timers.schedule(self.generation, delay_ms)
    }

    /// Activation this context belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }
}

//=== Scene Trait =========================================================

/// A self-contained mini-game or menu.
///
/// Instances are built fresh by a factory for every activation and
/// dropped after `cleanup`, so no state survives between activations
/// except what lives in [`AppState`].
pub trait Scene<K: SceneKey> {
    /// Human-readable name for logs.
    fn name(&self) -> &'static str;

    /// Attaches listeners and builds scene-local state.
    ///
    /// Acquire anything fallible before attaching listeners: on error
    /// the scene is discarded without `cleanup`.
    fn init(&mut self, ctx: &mut SceneContext<K>) -> Result<(), SceneError>;

    /// Advances timers, physics and rules by `delta_ms`.
    fn update(&mut self, ctx: &mut SceneContext<K>, delta_ms: f64);

    /// Renders current state. Must not change game state.
    fn draw(&self, surface: &mut Canvas, state: &AppState);

    /// Recomputes dimension-dependent layout.
    fn resize(&mut self, width: u32, height: u32);

    /// Detaches every listener attached in `init`.
    fn cleanup(&mut self, ctx: &mut SceneContext<K>);

    /// A timer scheduled by this activation came due.
    fn on_timer(&mut self, _ctx: &mut SceneContext<K>, _timer: TimerId) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
