//=========================================================================
// Playroom — Binary Entry Point
//
// Environment:
// - `PLAYROOM_SAVE_DIR`     directory for save files (unset: no saving)
// - `PLAYROOM_PIXEL_SCALE`  display pixels per surface pixel (default 1)
// - `RUST_LOG`              log filter (default `info`)
//
//=========================================================================

use std::env;
use std::process::ExitCode;
use std::rc::Rc;

use log::{error, warn};

use playroom::assets::LineArtBook;
use playroom::games::{self, SceneId};
use playroom::EngineBuilder;

fn pixel_scale() -> u32 {
    match env::var("PLAYROOM_PIXEL_SCALE") {
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(scale) if scale > 0 => scale,
            _ => {
                warn!("Ignoring PLAYROOM_PIXEL_SCALE={:?}; using 1", raw);
                1
            }
        },
        Err(_) => 1,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut builder = EngineBuilder::new(SceneId::Title)
        .with_title("Playroom")
        .with_pixel_scale(pixel_scale());

    if let Some(dir) = env::var_os("PLAYROOM_SAVE_DIR") {
        builder = builder.with_save_dir(dir);
    }

    let result = builder
        .build()
        .init(|registry| games::register_all(registry, Rc::new(LineArtBook::new())))
        .run();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Playroom stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
