//=========================================================================
// Scene Host
//=========================================================================
//
// Owns the render surface and the single active scene, and drives the
// per-frame loop.
//
// Activation order:
//   1. cleanup() on the outgoing scene (exactly once), then a listener
//      balance check against the count recorded before its init()
//   2. generation += 1 (orphans every timer the old scene scheduled)
//   3. init() on the incoming scene; on error nothing is active
//   4. resize() with the current surface size
//   5. the incoming scene becomes active
//
// Tick order:
//   clock → due timers (stale generations dropped) → clear → update
//         → draw → last queued switch applied
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneContext, SceneError, SceneKey, SceneRegistry, TransitionQueue};
use crate::core::clock::FrameClock;
use crate::core::input::{DisplayMapping, InputEvent, InputRouter};
use crate::core::state::AppState;
use crate::core::timer::{Generation, TimerQueue};
use crate::gfx::{Canvas, MAX_DIMENSION};

//=== ActiveScene =========================================================

struct ActiveScene<K: SceneKey> {
    key: Option<K>,
    scene: Box<dyn Scene<K>>,
    generation: Generation,
    listener_baseline: usize,
}

//=== SceneHost ===========================================================

pub struct SceneHost<K: SceneKey> {
    registry: SceneRegistry<K>,
    surface: Canvas,
    input: InputRouter,
    timers: TimerQueue,
    transitions: TransitionQueue<K>,
    clock: FrameClock,
    generation: Generation,
    active: Option<ActiveScene<K>>,
}

impl<K: SceneKey> SceneHost<K> {
    //--- Construction -----------------------------------------------------

    /// Creates a host with a `width × height` surface and no active scene.
    pub fn new(width: u32, height: u32, registry: SceneRegistry<K>) -> Result<Self, SceneError> {
        Ok(Self {
            registry,
            surface: Canvas::new(width.max(1), height.max(1))?,
            input: InputRouter::new(),
            timers: TimerQueue::new(),
            transitions: TransitionQueue::new(),
            clock: FrameClock::new(),
            generation: Generation::default(),
            active: None,
        })
    }

    /// Replaces the frame clock (e.g. to change the delta ceiling).
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    //--- Activation -------------------------------------------------------

    /// Builds the scene registered under `key` and activates it.
    pub fn activate_key(&mut self, key: K, state: &mut AppState) -> Result<(), SceneError> {
        let scene = self.registry.create(key)?;
        self.activate_inner(Some(key), scene, state)
    }

    /// Activates an already-built scene, superseding the current one.
    pub fn activate(&mut self, scene: Box<dyn Scene<K>>, state: &mut AppState) -> Result<(), SceneError> {
        self.activate_inner(None, scene, state)
    }

    fn activate_inner(
        &mut self,
        key: Option<K>,
        mut scene: Box<dyn Scene<K>>,
        state: &mut AppState,
    ) -> Result<(), SceneError> {
        self.deactivate(state);

        self.generation = self.generation.next();
        let generation = self.generation;
        let listener_baseline = self.input.listener_count();
        let size = self.surface_size();

        let init_result = {
            let mut ctx = SceneContext::new(
                &mut self.input,
                state,
                &mut self.transitions,
                &mut self.timers,
                generation,
                size,
            );
            scene.init(&mut ctx)
        };
        if let Err(e) = init_result {
            error!(target: "scene", "Activation of {} aborted: {}", scene.name(), e);
            let released = self.input.release_since(listener_baseline);
            if released > 0 {
                warn!(
                    target: "scene",
                    "Released {} input listener(s) left by failed {}",
                    released,
                    scene.name()
                );
            }
            return Err(e);
        }

        scene.resize(size.0, size.1);

        info!(target: "scene", "Activated {} ({:?})", scene.name(), generation);
        self.active = Some(ActiveScene {
            key,
            scene,
            generation,
            listener_baseline,
        });
        Ok(())
    }

    /// Tears down the active scene, if any.
    fn deactivate(&mut self, state: &mut AppState) {
        let Some(mut old) = self.active.take() else {
            return;
        };

        let size = self.surface_size();
        {
            let mut ctx = SceneContext::new(
                &mut self.input,
                state,
                &mut self.transitions,
                &mut self.timers,
                old.generation,
                size,
            );
            old.scene.cleanup(&mut ctx);
        }

        let live = self.input.listener_count();
        if live > old.listener_baseline {
            warn!(
                target: "scene",
                "{} leaked {} input listener(s) past cleanup",
                old.scene.name(),
                live - old.listener_baseline
            );
        }

        debug!(target: "scene", "Tore down {}", old.scene.name());
    }

    //--- Frame Loop -------------------------------------------------------

    /// Runs one frame at host time `timestamp_ms`.
    pub fn tick(&mut self, timestamp_ms: f64, state: &mut AppState) -> Result<(), SceneError> {
        let delta = self.clock.tick(timestamp_ms);
        let size = self.surface_size();

        for fired in self.timers.advance(delta) {
            match self.active.as_mut() {
                Some(active) if active.generation == fired.owner => {
                    let mut ctx = SceneContext::new(
                        &mut self.input,
                        state,
                        &mut self.transitions,
                        &mut self.timers,
                        active.generation,
                        size,
                    );
                    active.scene.on_timer(&mut ctx, fired.id);
                }
                _ => {
                    debug!(
                        target: "scene",
                        "Dropping timer {:?} of inactive {:?}",
                        fired.id,
                        fired.owner
                    );
                }
            }
        }

        self.surface.reset_transform();
        self.surface.clear();

        if let Some(active) = self.active.as_mut() {
            {
                let mut ctx = SceneContext::new(
                    &mut self.input,
                    state,
                    &mut self.transitions,
                    &mut self.timers,
                    active.generation,
                    size,
                );
                active.scene.update(&mut ctx, delta);
            }
            active.scene.draw(&mut self.surface, state);
        }

        if let Some(key) = self.transitions.take_last_switch() {
            info!(target: "scene", "Switching to {:?}", key);
            self.activate_key(key, state)?;
        }
        Ok(())
    }

    //--- Surface ----------------------------------------------------------

    /// Resizes the surface (clamped to at least 1×1) and notifies the
    /// active scene.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SceneError> {
        let width = width.clamp(1, MAX_DIMENSION);
        let height = height.clamp(1, MAX_DIMENSION);
        if (width, height) == self.surface_size() {
            return Ok(());
        }

        self.surface.resize(width, height)?;
        debug!(target: "scene", "Surface resized to {}x{}", width, height);

        if let Some(active) = self.active.as_mut() {
            active.scene.resize(width, height);
        }
        Ok(())
    }

    /// Resizes for a display of `display` pixels showing the surface at
    /// `surface` pixels, and updates pointer scaling to match.
    pub fn resize_for_display(
        &mut self,
        display: (f32, f32),
        surface: (u32, u32),
    ) -> Result<(), SceneError> {
        self.resize(surface.0, surface.1)?;
        let mapping = DisplayMapping::stretched(display, self.surface_size());
        self.input.set_display_mapping(mapping);
        Ok(())
    }

    pub fn surface(&self) -> &Canvas {
        &self.surface
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    //--- Input ------------------------------------------------------------

    /// Routes one platform event to the active scene's listeners.
    pub fn dispatch(&mut self, event: InputEvent) {
        self.input.dispatch(event);
    }

    pub fn listener_count(&self) -> usize {
        self.input.listener_count()
    }

    //--- Introspection ----------------------------------------------------

    pub fn active_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|active| active.scene.name())
    }

    /// Key of the active scene, if it was activated by key.
    pub fn active_key(&self) -> Option<K> {
        self.active.as_ref().and_then(|active| active.key)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{EventKind, Listener};
    use crate::core::timer::TimerId;
    use crate::gfx::Color;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        A,
        B,
        C,
    }

    impl SceneKey for Key {}

    type Log = Rc<RefCell<Vec<String>>>;

    //--- Recording Scene ------------------------------------------------------

    /// Records every lifecycle call into a shared log.
    #[derive(Default)]
    struct Recorder {
        name: &'static str,
        log: Log,
        listener: Option<Listener>,
        leak: bool,
        fail_init: bool,
        timer_on_init: Option<f64>,
        switch_on_update: Vec<Key>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
                ..Default::default()
            }
        }

        fn record(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}.{}", self.name, what));
        }
    }

    impl Scene<Key> for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn init(&mut self, ctx: &mut SceneContext<Key>) -> Result<(), SceneError> {
            self.record("init");
            self.listener = Some(ctx.input.attach(&[EventKind::PointerUp]));
            if self.fail_init {
                return Err(SceneError::Init {
                    scene: self.name,
                    reason: "no buffer".into(),
                });
            }
            if let Some(delay) = self.timer_on_init {
                ctx.schedule(delay);
            }
            Ok(())
        }

        fn update(&mut self, ctx: &mut SceneContext<Key>, _delta_ms: f64) {
            self.record("update");
            for key in &self.switch_on_update {
                ctx.switch_to(*key);
            }
        }

        fn draw(&self, surface: &mut Canvas, _state: &AppState) {
            self.record("draw");
            surface.fill_rect(0.0, 0.0, 1.0, 1.0, Color::WHITE);
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.record(&format!("resize({}x{})", width, height));
        }

        fn cleanup(&mut self, ctx: &mut SceneContext<Key>) {
            self.record("cleanup");
            if let Some(listener) = self.listener.take() {
                if self.leak {
                    std::mem::forget(listener);
                } else {
                    ctx.input.detach(listener);
                }
            }
        }

        fn on_timer(&mut self, _ctx: &mut SceneContext<Key>, _timer: TimerId) {
            self.record("timer");
        }
    }

    fn host() -> SceneHost<Key> {
        SceneHost::new(64, 48, SceneRegistry::new()).unwrap()
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    //--- Exclusivity ------------------------------------------------------

    #[test]
    fn switching_cleans_up_old_before_init_of_new() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();

        host.activate(Box::new(Recorder::new("a", &log)), &mut state).unwrap();
        host.activate(Box::new(Recorder::new("b", &log)), &mut state).unwrap();

        assert_eq!(
            entries(&log),
            vec!["a.init", "a.resize(64x48)", "a.cleanup", "b.init", "b.resize(64x48)"]
        );
        assert_eq!(host.active_name(), Some("b"));
    }

    #[test]
    fn torn_down_scene_gets_no_more_frames() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();

        host.activate(Box::new(Recorder::new("a", &log)), &mut state).unwrap();
        host.activate(Box::new(Recorder::new("b", &log)), &mut state).unwrap();
        log.borrow_mut().clear();
        host.tick(0.0, &mut state).unwrap();

        assert_eq!(entries(&log), vec!["b.update", "b.draw"]);
    }

    #[test]
    fn tick_without_scene_only_clears() {
        let mut state = AppState::in_memory();
        let mut host = host();

        host.tick(0.0, &mut state).unwrap();

        assert!(host.surface().frame().data().iter().all(|b| *b == 0));
        assert_eq!(host.active_name(), None);
    }

    //--- Listener Balance -------------------------------------------------

    #[test]
    fn listener_count_returns_to_baseline() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();
        let baseline = host.listener_count();

        host.activate(Box::new(Recorder::new("a", &log)), &mut state).unwrap();
        assert_eq!(host.listener_count(), baseline + 1);

        host.activate(Box::new(Recorder::new("b", &log)), &mut state).unwrap();
        assert_eq!(host.listener_count(), baseline + 1);
    }

    #[test]
    fn leaking_scene_is_detected() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();

        let leaky = Recorder {
            leak: true,
            ..Recorder::new("leaky", &log)
        };
        host.activate(Box::new(leaky), &mut state).unwrap();
        host.activate(Box::new(Recorder::new("b", &log)), &mut state).unwrap();

        // The leaked route stays until a dispatch finds its receiver gone.
        assert_eq!(host.listener_count(), 2);
    }

    //--- Init Failure -----------------------------------------------------

    #[test]
    fn failed_init_propagates_and_leaves_nothing_active() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();

        host.activate(Box::new(Recorder::new("a", &log)), &mut state).unwrap();
        let broken = Recorder {
            fail_init: true,
            ..Recorder::new("broken", &log)
        };
        let err = host.activate(Box::new(broken), &mut state).unwrap_err();

        assert!(matches!(err, SceneError::Init { scene: "broken", .. }));
        assert_eq!(host.active_name(), None);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(entries(&log), vec!["a.init", "a.resize(64x48)", "a.cleanup", "broken.init"]);
    }

    #[test]
    fn failed_init_releases_listeners_it_attached() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();
        let baseline = host.listener_count();

        for _ in 0..3 {
            let broken = Recorder {
                fail_init: true,
                ..Recorder::new("broken", &log)
            };
            assert!(host.activate(Box::new(broken), &mut state).is_err());
            assert_eq!(host.listener_count(), baseline);
        }

        host.activate(Box::new(Recorder::new("a", &log)), &mut state).unwrap();
        assert_eq!(host.listener_count(), baseline + 1);
    }

    //--- Timers -----------------------------------------------------------

    #[test]
    fn timer_fires_for_its_own_activation() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();

        let recorder = Recorder {
            timer_on_init: Some(10.0),
            ..Recorder::new("a", &log)
        };
        host.activate(Box::new(recorder), &mut state).unwrap();
        host.tick(0.0, &mut state).unwrap(); // first frame: 16 ms default

        assert!(entries(&log).contains(&"a.timer".to_string()));
    }

    #[test]
    fn timer_outliving_its_scene_is_dropped() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();

        let recorder = Recorder {
            timer_on_init: Some(1000.0),
            ..Recorder::new("a", &log)
        };
        host.activate(Box::new(recorder), &mut state).unwrap();
        host.tick(0.0, &mut state).unwrap();

        // Rapid switch while the timer is still pending.
        host.activate(Box::new(Recorder::new("b", &log)), &mut state).unwrap();
        assert_eq!(host.pending_timers(), 1);

        for frame in 1..=20 {
            host.tick(frame as f64 * 100.0, &mut state).unwrap();
        }

        let log = entries(&log);
        assert!(!log.iter().any(|e| e.ends_with(".timer")), "{:?}", log);
        assert_eq!(host.pending_timers(), 0);
    }

    //--- Transitions ------------------------------------------------------

    #[test]
    fn last_queued_switch_wins_after_draw() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut registry = SceneRegistry::new();
        {
            let log = log.clone();
            registry.register(Key::A, move || {
                Box::new(Recorder {
                    switch_on_update: vec![Key::B, Key::C],
                    ..Recorder::new("a", &log)
                }) as Box<dyn Scene<Key>>
            });
        }
        for (key, name) in [(Key::B, "b"), (Key::C, "c")] {
            let log = log.clone();
            registry.register(key, move || Box::new(Recorder::new(name, &log)) as Box<dyn Scene<Key>>);
        }

        let mut host = SceneHost::new(64, 48, registry).unwrap();
        host.activate_key(Key::A, &mut state).unwrap();
        host.tick(0.0, &mut state).unwrap();

        assert_eq!(host.active_key(), Some(Key::C));
        assert_eq!(
            entries(&log),
            vec![
                "a.init",
                "a.resize(64x48)",
                "a.update",
                "a.draw",
                "a.cleanup",
                "c.init",
                "c.resize(64x48)"
            ]
        );
    }

    #[test]
    fn unregistered_key_is_an_error() {
        let mut state = AppState::in_memory();
        let mut host = host();

        assert!(matches!(
            host.activate_key(Key::A, &mut state),
            Err(SceneError::Unregistered(_))
        ));
    }

    //--- Resize -----------------------------------------------------------

    #[test]
    fn resize_is_clamped_and_forwarded() {
        let log = Log::default();
        let mut state = AppState::in_memory();
        let mut host = host();
        host.activate(Box::new(Recorder::new("a", &log)), &mut state).unwrap();

        host.resize(0, 30).unwrap();

        assert_eq!(host.surface_size(), (1, 30));
        assert_eq!(entries(&log).last().map(String::as_str), Some("a.resize(1x30)"));
    }

    #[test]
    fn display_resize_rescales_pointer_input() {
        let mut state = AppState::in_memory();
        let mut host = host();
        host.resize_for_display((400.0, 300.0), (200, 150)).unwrap();

        let watcher = host.input.attach(&[EventKind::PointerUp]);
        host.dispatch(InputEvent::PointerUp { x: 100.0, y: 100.0 });

        assert_eq!(
            watcher.drain().next(),
            Some(InputEvent::PointerUp { x: 50.0, y: 50.0 })
        );
        host.tick(0.0, &mut state).unwrap();
    }
}
