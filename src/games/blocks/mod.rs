//=========================================================================
// Block Party
//=========================================================================
//
// Falling-block game. Rules live in `logic`; this scene maps keys and
// touches onto them and paints the grid centred on the surface.
//
// Controls: arrows move, rotate (up) and drop (down). On game over,
// Enter or a tap starts again and Escape leaves. On touch screens the
// left and right thirds move, the middle rotates.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod logic;

//=== External Dependencies ===============================================

use log::{debug, warn};
use rand::rngs::StdRng;

//=== Internal Dependencies ===============================================

use self::logic::{BlockGame, Descent, Tetromino, COLS, ROWS};
use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{Button, EventKind, InputEvent, KeyCode};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::{Canvas, Color};

//=== Layout ==============================================================

pub const HIGH_SCORE_KEY: &str = "blocks";

const BACKGROUND: Color = Color::rgb(0x22, 0x22, 0x22);
const GRID_LINE: Color = Color::rgb(0x33, 0x33, 0x33);
const HIGHLIGHT: Color = Color::rgba(255, 255, 255, 0x4d);

/// Share of the width on each side that moves the piece on touch.
const TOUCH_EDGE: f32 = 0.3;

fn block_size(width: u32, height: u32) -> f32 {
    (width as f32 / 15.0).min(height as f32 / 25.0).max(1.0)
}

//=== BlocksScene =========================================================

pub struct BlocksScene {
    input: SceneInput,
    game: BlockGame,
    back: Button<()>,
    size: (u32, u32),
    block: f32,
}

impl BlocksScene {
    pub fn new() -> Self {
        Self::from_game(BlockGame::new())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self::from_game(BlockGame::with_rng(rng))
    }

    fn from_game(game: BlockGame) -> Self {
        Self {
            input: SceneInput::new(),
            game,
            back: ui::back_button(1, ()),
            size: (1, 1),
            block: 1.0,
        }
    }

    pub fn game(&self) -> &BlockGame {
        &self.game
    }

    //--- Input ------------------------------------------------------------

    fn on_key(&mut self, ctx: &mut SceneContext<SceneId>, key: KeyCode) {
        if self.game.is_over() {
            match key {
                KeyCode::Enter => self.restart(),
                KeyCode::Escape => ctx.switch_to(SceneId::GameMenu),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::ArrowLeft => {
                self.game.move_left();
            }
            KeyCode::ArrowRight => {
                self.game.move_right();
            }
            KeyCode::ArrowUp => {
                self.game.rotate();
            }
            KeyCode::ArrowDown => {
                let descent = self.game.soft_drop();
                self.on_descent(ctx, descent);
            }
            _ => {}
        }
    }

    fn on_touch(&mut self, x: f32) {
        if self.game.is_over() {
            self.restart();
            return;
        }

        let width = self.size.0 as f32;
        if x < width * TOUCH_EDGE {
            self.game.move_left();
        } else if x > width * (1.0 - TOUCH_EDGE) {
            self.game.move_right();
        } else {
            self.game.rotate();
        }
    }

    fn restart(&mut self) {
        debug!(target: "scene", "Blocks restarted");
        self.game.reset();
    }

    /// Every lock ends with a sweep; the best score is kept after each.
    fn on_descent(&mut self, ctx: &mut SceneContext<SceneId>, descent: Descent) {
        if descent == Descent::Moved {
            return;
        }
        if let Descent::Landed { cleared } = descent {
            if cleared > 0 {
                debug!(target: "scene", "Cleared {} rows, score {}", cleared, self.game.score());
            }
        }
        if let Err(e) = ctx.state.record_high_score(HIGH_SCORE_KEY, self.game.score()) {
            warn!(target: "state", "Could not save blocks high score: {}", e);
        }
    }

    //--- Drawing ----------------------------------------------------------

    fn draw_block(&self, surface: &mut Canvas, col: i32, row: i32, kind: Tetromino) {
        let size = self.block;
        let (x, y) = (col as f32 * size, row as f32 * size);
        surface.fill_rect(x, y, size - 1.0, size - 1.0, kind.color());
        surface.fill_rect(x, y, size - 1.0, 4.0_f32.min(size), HIGHLIGHT);
    }
}

impl Default for BlocksScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for BlocksScene {
    fn name(&self) -> &'static str {
        "blocks"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.input
            .attach(ctx, &[EventKind::KeyDown, EventKind::TouchStart, EventKind::PointerUp]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, delta_ms: f64) {
        for event in self.input.drain() {
            match event {
                InputEvent::KeyDown(key) => self.on_key(ctx, key),
                InputEvent::TouchStart { x, .. } => self.on_touch(x),
                InputEvent::PointerUp { x, y } => {
                    if self.back.rect.contains(x, y) {
                        ctx.switch_to(SceneId::GameMenu);
                        return;
                    }
                    if self.game.is_over() {
                        self.restart();
                    }
                }
                _ => {}
            }
        }

        if let Some(descent) = self.game.update(delta_ms) {
            self.on_descent(ctx, descent);
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        surface.fill_rect(0.0, 0.0, w, h, BACKGROUND);

        let (grid_w, grid_h) = (COLS as f32 * self.block, ROWS as f32 * self.block);
        surface.save();
        surface.translate((w - grid_w) / 2.0, (h - grid_h) / 2.0);
        surface.stroke_rect(0.0, 0.0, grid_w, grid_h, 1.0, GRID_LINE);

        let grid = self.game.grid();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                if let Some(kind) = grid.get(col, row) {
                    self.draw_block(surface, col as i32, row as i32, kind);
                }
            }
        }
        if let Some(piece) = self.game.piece() {
            for (col, row) in piece.cells() {
                self.draw_block(surface, col, row, piece.kind);
            }
        }
        surface.restore();

        surface.fill_text(&format!("Score: {}", self.game.score()), 20.0, 28.0, 24.0, Color::WHITE);

        if self.game.is_over() {
            surface.fill_rect(0.0, 0.0, w, h, Color::rgba(0, 0, 0, 0xcc));
            ui::title(surface, "GAME OVER", h / 2.0, 40.0, Color::WHITE);
            ui::title(surface, "Tap / Enter to Restart", h / 2.0 + 40.0, 20.0, Color::WHITE);
        }

        ui::draw_button(surface, &self.back);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.block = block_size(width, height);
        self.back = ui::back_button(width, ());
    }

    fn cleanup(&mut self, ctx: &mut SceneContext<SceneId>) {
        self.input.detach(ctx);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::harness::{Harness, HEIGHT, WIDTH};

    fn key(h: &mut Harness, key: KeyCode) {
        h.send(InputEvent::KeyDown(key));
        h.tick();
    }

    #[test]
    fn block_size_follows_the_tighter_axis() {
        assert_eq!(block_size(1500, 2500), 100.0);
        assert_eq!(block_size(300, 2500), 20.0);
        assert_eq!(block_size(1, 1), 1.0);
    }

    #[test]
    fn back_button_returns_to_the_menu() {
        let mut h = Harness::start(SceneId::Blocks);
        let (cx, cy) = ui::back_button_rect(WIDTH).center();
        h.tap(cx, cy);
        assert_eq!(h.active(), Some(SceneId::GameMenu));
    }

    #[test]
    fn taps_elsewhere_do_not_leave_a_running_game() {
        let mut h = Harness::start(SceneId::Blocks);
        h.tap(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
        assert_eq!(h.active(), Some(SceneId::Blocks));
    }

    #[test]
    fn landing_records_the_high_score() {
        let mut h = Harness::start(SceneId::Blocks);
        h.state.record_high_score(HIGH_SCORE_KEY, 0).unwrap();
        for _ in 0..25 {
            key(&mut h, KeyCode::ArrowDown);
        }
        h.run_for(100.0);

        assert_eq!(h.active(), Some(SceneId::Blocks));
        assert_eq!(h.state.high_score(HIGH_SCORE_KEY), 0);
    }

    #[test]
    fn escape_only_leaves_after_game_over() {
        let mut h = Harness::start(SceneId::Blocks);
        key(&mut h, KeyCode::Escape);
        assert_eq!(h.active(), Some(SceneId::Blocks));

        // Stack pieces straight down until the spawn point is blocked.
        for _ in 0..ROWS * ROWS {
            key(&mut h, KeyCode::ArrowDown);
        }
        key(&mut h, KeyCode::Escape);
        assert_eq!(h.active(), Some(SceneId::GameMenu));
    }

    #[test]
    fn touch_zones_move_and_rotate() {
        use rand::SeedableRng;

        let mut scene = BlocksScene::with_rng(StdRng::seed_from_u64(4));
        scene.resize(1000, 800);
        let start = scene.game().piece().unwrap().clone();

        scene.on_touch(100.0);
        assert_eq!(scene.game().piece().unwrap().col, start.col - 1);
        scene.on_touch(900.0);
        assert_eq!(scene.game().piece().unwrap().col, start.col);
        scene.on_touch(500.0);
        assert_eq!(scene.game().piece().unwrap().shape, start.shape.rotated());
    }
}
