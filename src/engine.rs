//=========================================================================
// Playroom Engine
//
// Main entry point and coordinator.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                      │
//         ├─ with_title()            └─ owns the scene registry              ├─ loads AppState
//         ├─ with_window_size()                                              ├─ builds SceneHost
//         ├─ with_pixel_scale()                                              └─ runs platform
//         ├─ with_max_frame_delta()                                             (blocks)
//         └─ with_save_dir()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::clock::{FrameClock, DEFAULT_MAX_DELTA_MS};
use crate::core::scene::{SceneHost, SceneKey, SceneRegistry};
use crate::core::state::{AppState, FileStore, KeyValueStore, MemoryStore};
use crate::platform::{Platform, PlatformConfig, PlatformError};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Playroom"
/// - **Window size**: 1024×720 logical pixels
/// - **Pixel scale**: 1 (one surface pixel per display pixel)
/// - **Max frame delta**: 100 ms
/// - **Save directory**: none (progress kept in memory only)
///
/// # Examples
///
/// ```no_run
/// use playroom::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Main }
/// impl SceneKey for Screen {}
///
/// EngineBuilder::new(Screen::Main)
///     .with_title("Demo")
///     .with_pixel_scale(2)
///     .build()
///     .init(|registry| {
///         // registry.register(Screen::Main, || Box::new(MainScene::default()));
///     })
///     .run()
///     .expect("engine failed");
/// ```
pub struct EngineBuilder<K: SceneKey> {
    start: K,
    title: String,
    window_size: (u32, u32),
    pixel_scale: u32,
    max_frame_delta: f64,
    save_dir: Option<PathBuf>,
}

impl<K: SceneKey> EngineBuilder<K> {
    /// Creates a builder that opens on the scene registered under `start`.
    pub fn new(start: K) -> Self {
        Self {
            start,
            title: "Playroom".to_string(),
            window_size: (1024, 720),
            pixel_scale: 1,
            max_frame_delta: DEFAULT_MAX_DELTA_MS,
            save_dir: None,
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.window_size = (width, height);
        self
    }

    /// Sets how many display pixels one surface pixel covers.
    ///
    /// Default: 1
    ///
    /// # Panics
    ///
    /// Panics if `scale == 0`.
    pub fn with_pixel_scale(mut self, scale: u32) -> Self {
        assert!(scale > 0, "Pixel scale must be positive");
        self.pixel_scale = scale;
        self
    }

    /// Sets the largest frame delta scenes will ever see, in ms.
    ///
    /// Default: 100.0
    ///
    /// # Panics
    ///
    /// Panics if `max_ms` is not a positive finite number.
    pub fn with_max_frame_delta(mut self, max_ms: f64) -> Self {
        assert!(
            max_ms.is_finite() && max_ms > 0.0,
            "Max frame delta must be positive, got {}",
            max_ms
        );
        self.max_frame_delta = max_ms;
        self
    }

    /// Persists progress as JSON files under `dir`.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    /// Builds the engine instance.
    ///
    /// Call [`Engine::init`] to register scenes before [`Engine::run`].
    pub fn build(self) -> Engine<K> {
        info!(
            "Building engine ({}x{} window, pixel scale {}, max delta {} ms)",
            self.window_size.0, self.window_size.1, self.pixel_scale, self.max_frame_delta
        );

        Engine {
            start: self.start,
            config: PlatformConfig {
                title: self.title,
                window_size: self.window_size,
                pixel_scale: self.pixel_scale,
            },
            max_frame_delta: self.max_frame_delta,
            save_dir: self.save_dir,
            registry: SceneRegistry::new(),
        }
    }
}

//=== Engine ==============================================================

/// Playroom runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (winit event loop)
///         ├─► SceneHost (active scene, timers, input routing)
///         └─► AppState (persisted profiles)
/// ```
pub struct Engine<K: SceneKey> {
    start: K,
    config: PlatformConfig,
    max_frame_delta: f64,
    save_dir: Option<PathBuf>,
    registry: SceneRegistry<K>,
}

impl<K: SceneKey> Engine<K> {
    //--- Initialization ---------------------------------------------------

    /// Registers scenes before execution.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneRegistry<K>),
    {
        info!("Registering scenes");

        init_fn(&mut self.registry);

        info!("{} scene(s) registered", self.registry.len());
        self
    }

    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Opens the save store and loads (or defaults) the app state
    /// 2. Builds the scene host with the configured frame clock
    /// 3. Runs the platform event loop (blocks here)
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`PlatformError`], including a start scene
    /// that failed to initialise.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting engine runtime (start scene: {:?})", self.start);

        //--- 1. Persisted state -------------------------------------------
        let state = AppState::load(self.open_store());

        //--- 2. Scene host ------------------------------------------------
        let (width, height) = self.config.window_size;
        let scale = self.config.pixel_scale;
        let host = SceneHost::new(width / scale, height / scale, self.registry)?
            .with_clock(FrameClock::with_max_delta(self.max_frame_delta));

        //--- 3. Platform --------------------------------------------------
        let platform = Platform::new(self.config, self.start, host, state);
        info!("Platform initialized, entering event loop");

        let result = platform.run();

        info!("Engine shutdown complete");
        result
    }

    /// File store under the save directory, or memory when none is set
    /// or the directory cannot be created.
    fn open_store(&self) -> Box<dyn KeyValueStore> {
        let Some(dir) = &self.save_dir else {
            info!("No save directory; progress will not persist");
            return Box::new(MemoryStore::new());
        };

        match FileStore::open(dir) {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!("Save directory unavailable ({}); progress will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{Scene, SceneContext, SceneError};
    use crate::core::state::AppState;
    use crate::gfx::Canvas;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Main,
        Other,
    }

    impl SceneKey for TestScene {}

    struct Blank;

    impl Scene<TestScene> for Blank {
        fn name(&self) -> &'static str {
            "blank"
        }
        fn init(&mut self, _ctx: &mut SceneContext<TestScene>) -> Result<(), SceneError> {
            Ok(())
        }
        fn update(&mut self, _ctx: &mut SceneContext<TestScene>, _delta_ms: f64) {}
        fn draw(&self, _surface: &mut Canvas, _state: &AppState) {}
        fn resize(&mut self, _width: u32, _height: u32) {}
        fn cleanup(&mut self, _ctx: &mut SceneContext<TestScene>) {}
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new(TestScene::Main);
        assert_eq!(builder.title, "Playroom");
        assert_eq!(builder.window_size, (1024, 720));
        assert_eq!(builder.pixel_scale, 1);
        assert_eq!(builder.max_frame_delta, 100.0);
        assert!(builder.save_dir.is_none());
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_size_panics_on_zero() {
        EngineBuilder::new(TestScene::Main).with_window_size(0, 600);
    }

    #[test]
    #[should_panic(expected = "Pixel scale must be positive")]
    fn builder_with_pixel_scale_panics_on_zero() {
        EngineBuilder::new(TestScene::Main).with_pixel_scale(0);
    }

    #[test]
    #[should_panic(expected = "Max frame delta must be positive")]
    fn builder_with_max_frame_delta_panics_on_negative() {
        EngineBuilder::new(TestScene::Main).with_max_frame_delta(-1.0);
    }

    #[test]
    #[should_panic(expected = "Max frame delta must be positive")]
    fn builder_with_max_frame_delta_panics_on_nan() {
        EngineBuilder::new(TestScene::Main).with_max_frame_delta(f64::NAN);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new(TestScene::Other)
            .with_title("Kids")
            .with_window_size(640, 480)
            .with_pixel_scale(2)
            .with_max_frame_delta(50.0)
            .with_save_dir("/tmp/playroom-test")
            .build();

        assert_eq!(engine.start, TestScene::Other);
        assert_eq!(
            engine.config,
            PlatformConfig {
                title: "Kids".into(),
                window_size: (640, 480),
                pixel_scale: 2,
            }
        );
        assert_eq!(engine.max_frame_delta, 50.0);
        assert_eq!(engine.save_dir, Some(PathBuf::from("/tmp/playroom-test")));
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn init_registers_scenes() {
        let engine = EngineBuilder::new(TestScene::Main)
            .build()
            .init(|registry| {
                registry.register(TestScene::Main, || Box::new(Blank) as Box<dyn Scene<TestScene>>);
                registry.register(TestScene::Other, || Box::new(Blank) as Box<dyn Scene<TestScene>>);
            });

        assert_eq!(engine.registry.len(), 2);
        assert!(engine.registry.contains(TestScene::Main));
    }

    #[test]
    fn missing_save_dir_uses_memory_store() {
        let engine = EngineBuilder::new(TestScene::Main).build();
        let mut store = engine.open_store();

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }
}
