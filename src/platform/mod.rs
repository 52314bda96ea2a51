//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the scene host and presents each
// rendered frame through `pixels`.
//
// Architecture:
// ```text
//  Main Thread (the only thread):
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ↓                                          │
//  │  InputProcessor  (winit → InputEvent)        │
//  │   ↓                                          │
//  │  InputBuffer     (ordered, moves coalesced)  │
//  │   ↓                                          │
//  │  RedrawRequested = frame boundary            │
//  │   ├─ flush buffer → SceneHost::dispatch      │
//  │   ├─ SceneHost::tick(now)                    │
//  │   └─ copy surface → pixels → present         │
//  └──────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: input gathered since the last
//   frame is routed before the tick, so an input is observed no later
//   than the first tick that follows it
// - **Single execution context**: input callbacks and frame ticks never
//   overlap, so nothing here is shared across threads
// - **Fatal errors end the loop**: winit callbacks cannot return errors,
//   so the first fatal error is stored, the loop exits, and `run()`
//   returns it
// - **Pixel scale**: the surface is the window size divided by the scale;
//   `pixels` stretches it back up and pointer input is scaled down
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::sync::Arc;
use std::time::Instant;

use log::*;
use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    error::{EventLoopError, OsError},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::scene::{SceneError, SceneHost, SceneKey};
use crate::core::state::AppState;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Fatal platform and startup errors.
///
/// Any of these ends the event loop; `Engine::run` hands it to `main`.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(#[source] OsError),

    #[error("renderer error: {0}")]
    Renderer(#[source] pixels::Error),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

//=== PlatformConfig ======================================================

/// Window settings resolved by the engine builder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlatformConfig {
    pub title: String,
    pub window_size: (u32, u32),
    pub pixel_scale: u32,
}

/// Surface size for a window of `window` physical pixels.
fn surface_size_for(window: PhysicalSize<u32>, pixel_scale: u32) -> (u32, u32) {
    let scale = pixel_scale.max(1);
    ((window.width / scale).max(1), (window.height / scale).max(1))
}

/// Copies the RGBA surface into the presentation buffer, forcing every
/// pixel opaque.
fn copy_frame(src: &[u8], dst: &mut [u8]) {
    for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        out[..3].copy_from_slice(&px[..3]);
        out[3] = 0xff;
    }
}

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(..)` - no window yet
/// 2. **Execution**: `platform.run()` - enters the winit loop
/// 3. **resumed()**: window + renderer created, start scene activated
/// 4. **RedrawRequested**: input flushed, host ticked, frame presented
/// 5. **Shutdown**: window closed or fatal error → loop exits
pub(crate) struct Platform<K: SceneKey> {
    config: PlatformConfig,

    /// Scene activated once the window exists.
    start: K,

    host: SceneHost<K>,
    state: AppState,

    /// OS window handle (None until `resumed()` called).
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,

    /// Ordered input since the last frame boundary.
    buffer: InputBuffer,
    input_processor: InputProcessor,

    /// Origin of frame timestamps.
    epoch: Instant,

    /// First fatal error; returned from `run()`.
    fatal: Option<PlatformError>,
}

impl<K: SceneKey> Platform<K> {
    //--- Construction -----------------------------------------------------

    pub fn new(config: PlatformConfig, start: K, host: SceneHost<K>, state: AppState) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            config,
            start,
            host,
            state,
            window: None,
            pixels: None,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            epoch: Instant::now(),
            fatal: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: event loop or window creation,
    /// renderer failure, or a scene that failed to activate.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Records a fatal error and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: PlatformError) {
        error!(target: "platform", "Fatal: {}", error);
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
        event_loop.exit();
    }

    /// Creates the window and renderer, then activates the start scene.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let (width, height) = self.config.window_size;
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(PlatformError::WindowCreation)?,
        );

        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        self.host.resize_for_display(
            (size.width as f32, size.height as f32),
            surface_size_for(size, self.config.pixel_scale),
        )?;
        let (surface_w, surface_h) = self.host.surface_size();

        let texture = SurfaceTexture::new(size.width.max(1), size.height.max(1), Arc::clone(&window));
        let pixels = Pixels::new(surface_w, surface_h, texture).map_err(PlatformError::Renderer)?;

        self.host.activate_key(self.start, &mut self.state)?;

        window.request_redraw();
        self.pixels = Some(pixels);
        self.window = Some(window);
        Ok(())
    }

    /// Follows a window resize with the surface, the renderer and the
    /// pointer mapping.
    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<(), PlatformError> {
        if size.width == 0 || size.height == 0 {
            debug!(target: "platform", "Ignoring resize to zero (minimised)");
            return Ok(());
        }

        self.host.resize_for_display(
            (size.width as f32, size.height as f32),
            surface_size_for(size, self.config.pixel_scale),
        )?;
        let (surface_w, surface_h) = self.host.surface_size();

        if let Some(pixels) = self.pixels.as_mut() {
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                warn!(target: "platform", "Renderer surface resize failed: {}", e);
            }
            if let Err(e) = pixels.resize_buffer(surface_w, surface_h) {
                warn!(target: "platform", "Renderer buffer resize failed: {}", e);
            }
        }
        Ok(())
    }

    /// Routes everything buffered since the last frame, oldest first.
    fn flush_input_buffer(&mut self) -> usize {
        let mut routed = 0;
        for event in self.buffer.drain() {
            self.host.dispatch(event);
            routed += 1;
        }
        if routed > 0 {
            trace!(target: "platform::input", "Flushed {} events", routed);
        }
        routed
    }

    /// One frame: input, tick, present.
    fn frame(&mut self) -> Result<(), PlatformError> {
        self.flush_input_buffer();

        let now_ms = self.epoch.elapsed().as_secs_f64() * 1000.0;
        self.host.tick(now_ms, &mut self.state)?;

        if let Some(pixels) = self.pixels.as_mut() {
            copy_frame(self.host.surface().frame().data(), pixels.frame_mut());
            pixels.render().map_err(PlatformError::Renderer)?;
        }
        Ok(())
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }
}

//=== Winit Integration ===================================================

impl<K: SceneKey> ApplicationHandler for Platform<K> {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Err(e) = self.resize(size) {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input_processor.process_cursor_moved(
                    position.x as f32,
                    position.y as f32,
                    &mut self.buffer,
                );
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.input_processor
                    .process_mouse_button(button, state, &mut self.buffer);
            }

            WindowEvent::Touch(touch) => {
                self.input_processor.process_touch(
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                    &mut self.buffer,
                );
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(&key_event) {
                    self.buffer.push(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frame() {
                    self.fail(event_loop, e);
                    return;
                }

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Ignore: Focused, Moved, etc.
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
