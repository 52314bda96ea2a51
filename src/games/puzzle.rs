//=========================================================================
// Picture Puzzle
//=========================================================================
//
// 3×3 sliding puzzle. The board is shuffled by walking the gap through
// random legal moves, so every deal can be solved, and a deal that
// wanders back to solved is shuffled again. Tapping a tile next to the
// gap slides it; once solved, any tap deals a fresh board.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{EventKind, InputEvent, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::{Canvas, Color};

//=== Board ===============================================================

pub const SIZE: usize = 3;
pub const SHUFFLE_MOVES: usize = 20;
const CELLS: usize = SIZE * SIZE;
/// The tile value standing for the gap.
const GAP: u8 = (CELLS - 1) as u8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: [u8; CELLS],
}

impl Board {
    pub fn solved() -> Self {
        let mut tiles = [0; CELLS];
        for (i, tile) in tiles.iter_mut().enumerate() {
            *tile = i as u8;
        }
        Self { tiles }
    }

    /// Solved board walked through `SHUFFLE_MOVES` random slides; never
    /// returned solved.
    pub fn shuffled(rng: &mut StdRng) -> Self {
        let mut board = Self::solved();
        while board.is_solved() {
            for _ in 0..SHUFFLE_MOVES {
                let gap = board.gap();
                if let Some(&pick) = neighbours(gap).choose(rng) {
                    board.tiles.swap(gap, pick);
                }
            }
        }
        board
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    pub fn gap(&self) -> usize {
        self.tiles.iter().position(|&t| t == GAP).unwrap_or(CELLS - 1)
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().enumerate().all(|(i, &t)| t as usize == i)
    }

    /// Slides the tile at `index` into the gap if they are neighbours.
    pub fn slide(&mut self, index: usize) -> bool {
        let gap = self.gap();
        if neighbours(gap).contains(&index) {
            self.tiles.swap(index, gap);
            true
        } else {
            false
        }
    }
}

/// Orthogonal neighbours of cell `index`.
fn neighbours(index: usize) -> Vec<usize> {
    let (col, row) = (index % SIZE, index / SIZE);
    let mut out = Vec::with_capacity(4);
    if col > 0 {
        out.push(index - 1);
    }
    if col < SIZE - 1 {
        out.push(index + 1);
    }
    if row > 0 {
        out.push(index - SIZE);
    }
    if row < SIZE - 1 {
        out.push(index + SIZE);
    }
    out
}

//=== Layout ==============================================================

const TILE: f32 = 100.0;
const BACKGROUND: Color = Color::rgb(0x9b, 0x59, 0xb6);
const TILE_FACE: Color = Color::rgb(0xec, 0xf0, 0xf1);
const TILE_INK: Color = Color::rgb(0x2c, 0x3e, 0x50);

fn board_rect(width: u32, height: u32) -> Rect {
    let side = SIZE as f32 * TILE;
    Rect::new(width as f32 / 2.0 - side / 2.0, height as f32 / 2.0 - side / 2.0, side, side)
}

//=== PuzzleScene =========================================================

pub struct PuzzleScene {
    input: SceneInput,
    rng: StdRng,
    board: Board,
    size: (u32, u32),
}

impl PuzzleScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let board = Board::shuffled(&mut rng);
        Self {
            input: SceneInput::new(),
            rng,
            board,
            size: (1, 1),
        }
    }

    /// Cell under `(x, y)`, if the point is on the board.
    fn cell_at(&self, x: f32, y: f32) -> Option<usize> {
        let r = board_rect(self.size.0, self.size.1);
        let (mx, my) = (x - r.x, y - r.y);
        if mx < 0.0 || my < 0.0 || mx >= r.w || my >= r.h {
            return None;
        }
        Some((my / TILE) as usize * SIZE + (mx / TILE) as usize)
    }

    fn on_tap(&mut self, x: f32, y: f32) {
        if self.board.is_solved() {
            self.board = Board::shuffled(&mut self.rng);
            return;
        }
        if let Some(cell) = self.cell_at(x, y) {
            if self.board.slide(cell) && self.board.is_solved() {
                info!(target: "scene", "Puzzle solved");
            }
        }
    }
}

impl Default for PuzzleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for PuzzleScene {
    fn name(&self) -> &'static str {
        "puzzle"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.input.attach(ctx, &[EventKind::PointerUp]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, _delta_ms: f64) {
        for event in self.input.drain() {
            if let InputEvent::PointerUp { x, y } = event {
                if ui::back_button_rect(self.size.0).contains(x, y) {
                    ctx.switch_to(SceneId::GameMenu);
                    return;
                }
                self.on_tap(x, y);
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        surface.fill_rect(0.0, 0.0, w, h, BACKGROUND);
        ui::title(surface, "Picture Puzzle", 50.0, 30.0, Color::WHITE);

        let solved = self.board.is_solved();
        let r = board_rect(self.size.0, self.size.1);
        for (i, &tile) in self.board.tiles().iter().enumerate() {
            // The gap only shows as a tile once the picture is complete.
            if tile == GAP && !solved {
                continue;
            }
            let x = r.x + (i % SIZE) as f32 * TILE;
            let y = r.y + (i / SIZE) as f32 * TILE;
            surface.fill_rect(x + 2.0, y + 2.0, TILE - 4.0, TILE - 4.0, TILE_FACE);
            surface.fill_text_centered(&(tile + 1).to_string(), x + TILE / 2.0, y + TILE / 2.0, 30.0, TILE_INK);
        }

        if solved {
            ui::title(surface, "SOLVED! Tap to Shuffle", h / 2.0 + 200.0, 30.0, Color::WHITE);
        }

        let back = ui::back_button(self.size.0, ());
        ui::draw_button(surface, &back);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
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
    use crate::games::harness::{Harness, WIDTH};

    /// Parity of the permutation ignoring the gap; 3×3 boards are
    /// solvable exactly when it is even.
    fn inversions(board: &Board) -> usize {
        let tiles: Vec<u8> = board.tiles().iter().copied().filter(|&t| t != GAP).collect();
        let mut count = 0;
        for i in 0..tiles.len() {
            for j in i + 1..tiles.len() {
                if tiles[i] > tiles[j] {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn neighbours_stay_on_the_board() {
        assert_eq!(neighbours(0), vec![1, 3]);
        assert_eq!(neighbours(4), vec![3, 5, 1, 7]);
        assert_eq!(neighbours(8), vec![7, 5]);
    }

    #[test]
    fn shuffles_are_solvable_and_never_solved() {
        for seed in 0..200 {
            let board = Board::shuffled(&mut StdRng::seed_from_u64(seed));
            assert!(!board.is_solved(), "seed {} dealt a solved board", seed);
            assert_eq!(inversions(&board) % 2, 0, "seed {} dealt an unsolvable board", seed);
        }
    }

    #[test]
    fn shuffling_only_moves_tiles_through_the_gap() {
        let board = Board::shuffled(&mut StdRng::seed_from_u64(7));
        let mut tiles = *board.tiles();
        tiles.sort_unstable();
        assert_eq!(tiles, *Board::solved().tiles());
        assert_eq!(board.tiles()[board.gap()], GAP);
    }

    #[test]
    fn only_neighbours_of_the_gap_slide() {
        let mut board = Board::solved();
        assert!(!board.slide(0));
        assert!(board.slide(5));
        assert_eq!(board.gap(), 5);
        assert!(board.slide(8));
        assert!(board.is_solved());
    }

    #[test]
    fn tapping_a_solved_board_reshuffles() {
        let mut scene = PuzzleScene::with_rng(StdRng::seed_from_u64(3));
        scene.resize(1000, 800);
        scene.board = Board::solved();
        assert!(scene.board.slide(7));
        let r = board_rect(1000, 800);

        // Tap the tile now sitting in the bottom-right corner back.
        scene.on_tap(r.x + 2.5 * TILE, r.y + 2.5 * TILE);
        assert!(scene.board.is_solved());

        scene.on_tap(1.0, 799.0);
        assert!(!scene.board.is_solved());
    }

    #[test]
    fn taps_off_the_board_hit_nothing() {
        let mut scene = PuzzleScene::new();
        scene.resize(1000, 800);
        let r = board_rect(1000, 800);
        assert_eq!(scene.cell_at(r.x - 1.0, r.y), None);
        assert_eq!(scene.cell_at(r.x + r.w, r.y), None);
        assert_eq!(scene.cell_at(r.x, r.y), Some(0));
        assert_eq!(scene.cell_at(r.x + r.w - 1.0, r.y + r.h - 1.0), Some(8));
    }

    #[test]
    fn back_returns_to_the_menu() {
        let mut h = Harness::start(SceneId::Puzzle);
        let (cx, cy) = ui::back_button_rect(WIDTH).center();
        h.tap(cx, cy);
        assert_eq!(h.active(), Some(SceneId::GameMenu));
    }
}
