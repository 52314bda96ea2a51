//=========================================================================
// Playroom — Library Root
//
// A scene-switching collection of mini-games for young children.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the scene contract and shared services (`core`)
// - Provide the software render surface and flood fill (`gfx`)
// - Ship the concrete games (`games`)
//
// Typical usage:
// ```no_run
// use std::rc::Rc;
// use playroom::assets::LineArtBook;
// use playroom::games::{self, SceneId};
// use playroom::EngineBuilder;
//
// EngineBuilder::new(SceneId::Title)
//     .build()
//     .init(|registry| games::register_all(registry, Rc::new(LineArtBook::new())))
//     .run()
//     .expect("playroom failed");
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the scene host, input routing, timers and persisted state.
// `gfx` is the immediate-mode raster surface scenes draw on.
// `assets` supplies coloring-book pages.
// `games` holds every concrete scene.
//
pub mod assets;
pub mod core;
pub mod games;
pub mod gfx;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit window, input translation and frame
// presentation, and is not part of the public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use platform::PlatformError;
