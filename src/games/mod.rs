//=========================================================================
// Games
//=========================================================================
//
// Every concrete scene, keyed by `SceneId`.
//
// Scene graph:
// ```text
//   Title ──pick profile──> Wardrobe ──play──> GameMenu ──> each game
//                                                 │  ▲         │
//                                    "My Room" ───┘  └── back ─┘
//   Room ──zones──> Wardrobe / Drawing / Blocks / Runner / GameMenu
// ```
//
// Every scene follows the same shape: one input listener attached in
// `init`, drained at the top of `update`, detached in `cleanup`; hit
// regions are rebuilt in `resize`.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod blocks;
pub mod coloring;
pub mod drawing;
pub mod game_menu;
pub mod horse_runner;
pub mod jumper;
pub mod maze;
pub mod memory;
pub mod puzzle;
pub mod room;
pub mod runner;
pub mod title;
pub mod ui;
pub mod wardrobe;

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::assets::ArtSource;
use crate::core::scene::{Scene, SceneKey, SceneRegistry};

//=== SceneId =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Title,
    Room,
    GameMenu,
    Wardrobe,
    Blocks,
    Drawing,
    Coloring,
    Maze,
    Puzzle,
    Runner,
    HorseRunner,
    Memory,
}

impl SceneKey for SceneId {}

impl SceneId {
    pub const ALL: [SceneId; 12] = [
        SceneId::Title,
        SceneId::Room,
        SceneId::GameMenu,
        SceneId::Wardrobe,
        SceneId::Blocks,
        SceneId::Drawing,
        SceneId::Coloring,
        SceneId::Maze,
        SceneId::Puzzle,
        SceneId::Runner,
        SceneId::HorseRunner,
        SceneId::Memory,
    ];
}

/// Boxed scene as the registry stores it.
pub type BoxedScene = Box<dyn Scene<SceneId>>;

//=== Registration ========================================================

/// Registers every scene. The coloring book draws its pages from `art`.
pub fn register_all(registry: &mut SceneRegistry<SceneId>, art: Rc<dyn ArtSource>) {
    registry.register(SceneId::Title, || Box::new(title::TitleScene::new()) as BoxedScene);
    registry.register(SceneId::Room, || Box::new(room::RoomScene::new()) as BoxedScene);
    registry.register(SceneId::GameMenu, || Box::new(game_menu::GameMenuScene::new()) as BoxedScene);
    registry.register(SceneId::Wardrobe, || Box::new(wardrobe::WardrobeScene::new()) as BoxedScene);
    registry.register(SceneId::Blocks, || Box::new(blocks::BlocksScene::new()) as BoxedScene);
    registry.register(SceneId::Drawing, || Box::new(drawing::DrawingScene::new()) as BoxedScene);
    registry.register(SceneId::Coloring, move || {
        Box::new(coloring::ColoringScene::new(Rc::clone(&art))) as BoxedScene
    });
    registry.register(SceneId::Maze, || Box::new(maze::MazeScene::new()) as BoxedScene);
    registry.register(SceneId::Puzzle, || Box::new(puzzle::PuzzleScene::new()) as BoxedScene);
    registry.register(SceneId::Runner, || Box::new(runner::RunnerScene::new()) as BoxedScene);
    registry.register(SceneId::HorseRunner, || {
        Box::new(horse_runner::HorseRunnerScene::new()) as BoxedScene
    });
    registry.register(SceneId::Memory, || Box::new(memory::MemoryScene::new()) as BoxedScene);
}

//=== Test Harness ========================================================

/// Host with every scene registered, for scene-level tests.
#[cfg(test)]
pub(crate) mod harness {
    use super::*;
    use crate::assets::LineArtBook;
    use crate::core::input::InputEvent;
    use crate::core::scene::SceneHost;
    use crate::core::state::AppState;

    pub const WIDTH: u32 = 1024;
    pub const HEIGHT: u32 = 720;

    pub struct Harness {
        pub host: SceneHost<SceneId>,
        pub state: AppState,
        now_ms: f64,
    }

    impl Harness {
        /// Host showing `start` on a 1024×720 surface.
        pub fn start(start: SceneId) -> Self {
            let mut registry = SceneRegistry::new();
            register_all(&mut registry, Rc::new(LineArtBook::new()));
            let mut host = SceneHost::new(WIDTH, HEIGHT, registry).unwrap();
            let mut state = AppState::in_memory();
            host.activate_key(start, &mut state).unwrap();
            Self { host, state, now_ms: 0.0 }
        }

        /// Runs one 16 ms frame.
        pub fn tick(&mut self) {
            self.host.tick(self.now_ms, &mut self.state).unwrap();
            self.now_ms += 16.0;
        }

        /// Runs frames until at least `ms` of scene time has passed.
        pub fn run_for(&mut self, ms: f64) {
            let frames = (ms / 16.0).ceil() as usize + 1;
            for _ in 0..frames {
                self.tick();
            }
        }

        /// Taps `(x, y)` and runs the frame that observes it.
        pub fn tap(&mut self, x: f32, y: f32) {
            self.host.dispatch(InputEvent::PointerUp { x, y });
            self.tick();
        }

        pub fn send(&mut self, event: InputEvent) {
            self.host.dispatch(event);
        }

        pub fn active(&self) -> Option<SceneId> {
            self.host.active_key()
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
