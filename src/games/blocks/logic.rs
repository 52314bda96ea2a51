//=========================================================================
// Block Game Rules
//=========================================================================
//
// Grid, tetrominoes and the drop/lock/clear/spawn cycle, free of any
// drawing or input. The falling piece never overlaps a filled cell and
// never leaves the grid: every move is tried on a copy and discarded if
// it collides.
//
// Cycle:
// ```text
//   spawning ──fits──> falling ──down rejected──> locking ──> line-clearing
//       │                                                         │
//       └──collides──> game-over            spawning <────────────┘
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Internal Dependencies ===============================================

use crate::gfx::Color;

//=== Constants ===========================================================

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
pub const SPAWN_COL: i32 = 3;
pub const SPAWN_ROW: i32 = 0;
pub const DROP_INTERVAL_MS: f64 = 1000.0;

/// Score for the first full row of a sweep; each further row doubles it.
pub const BASE_SCORE: u32 = 10;

//=== Tetromino ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tetromino {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::T,
        Tetromino::Z,
    ];

    pub fn color(self) -> Color {
        match self {
            Tetromino::I => Color::rgb(0x00, 0xf0, 0xf0),
            Tetromino::J => Color::rgb(0x00, 0x00, 0xf0),
            Tetromino::L => Color::rgb(0xf0, 0xa0, 0x00),
            Tetromino::O => Color::rgb(0xf0, 0xf0, 0x00),
            Tetromino::S => Color::rgb(0x00, 0xf0, 0x00),
            Tetromino::T => Color::rgb(0xa0, 0x00, 0xf0),
            Tetromino::Z => Color::rgb(0xf0, 0x00, 0x00),
        }
    }

    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[1, 1, 1, 1]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1]],
        };
        Shape::from_rows(rows)
    }
}

//=== Shape ===============================================================

/// Boolean matrix, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&cell| cell != 0).collect())
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Quarter turn clockwise: transpose, then reverse each new row.
    pub fn rotated(&self) -> Shape {
        let rows = (0..self.width())
            .map(|col| self.rows.iter().rev().map(|row| row[col]).collect())
            .collect();
        Shape { rows }
    }

    /// Offsets `(dx, dy)` of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(dx, _)| (dx as i32, dy as i32))
        })
    }
}

//=== Piece ===============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: Tetromino,
    pub shape: Shape,
    pub col: i32,
    pub row: i32,
}

impl Piece {
    fn spawn(kind: Tetromino) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            col: SPAWN_COL,
            row: SPAWN_ROW,
        }
    }

    /// Absolute grid cells the piece covers.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.cells().map(|(dx, dy)| (self.col + dx, self.row + dy))
    }

    fn shifted(&self, dc: i32, dr: i32) -> Piece {
        Piece {
            col: self.col + dc,
            row: self.row + dr,
            ..self.clone()
        }
    }
}

//=== Grid ================================================================

/// Filled cells remember which tetromino left them, for the color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: Vec<Vec<Option<Tetromino>>>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows: vec![vec![None; cols]; rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Tetromino> {
        self.rows.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn set(&mut self, col: usize, row: usize, cell: Option<Tetromino>) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Cells above the top edge are open; anything else off-grid is not.
    fn blocks(&self, col: i32, row: i32) -> bool {
        if col < 0 || col >= self.cols as i32 || row >= self.rows() as i32 {
            return true;
        }
        row >= 0 && self.get(col as usize, row as usize).is_some()
    }

    fn fits(&self, piece: &Piece) -> bool {
        piece.cells().all(|(c, r)| !self.blocks(c, r))
    }

    fn merge(&mut self, piece: &Piece) {
        for (c, r) in piece.cells() {
            if c >= 0 && r >= 0 {
                self.set(c as usize, r as usize, Some(piece.kind));
            }
        }
    }

    /// Removes full rows scanning bottom-up and returns the rows cleared
    /// and the score they earned.
    pub fn sweep(&mut self) -> (u32, u32) {
        let (mut cleared, mut score, mut increment) = (0, 0, BASE_SCORE);
        let mut row = self.rows.len();

        while row > 0 {
            let index = row - 1;
            if self.rows[index].iter().all(Option::is_some) {
                self.rows.remove(index);
                self.rows.insert(0, vec![None; self.cols]);
                cleared += 1;
                score += increment;
                increment *= 2;
                // The row that slid into `index` gets checked next.
                continue;
            }
            row -= 1;
        }
        (cleared, score)
    }
}

//=== BlockGame ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    GameOver,
}

/// What a one-row descent did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    Moved,
    /// The piece locked; `cleared` rows went in the sweep.
    Landed { cleared: u32 },
    /// Nothing falls any more.
    Over,
}

pub struct BlockGame {
    grid: Grid,
    piece: Option<Piece>,
    score: u32,
    phase: Phase,
    drop_counter: f64,
    rng: StdRng,
}

impl BlockGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        let mut game = Self {
            grid: Grid::new(COLS, ROWS),
            piece: None,
            score: 0,
            phase: Phase::Falling,
            drop_counter: 0.0,
            rng,
        };
        game.spawn();
        game
    }

    /// Starts from an existing grid, with no piece in play until the next spawn.
    pub fn from_grid(grid: Grid, rng: StdRng) -> Self {
        Self {
            grid,
            piece: None,
            score: 0,
            phase: Phase::Falling,
            drop_counter: 0.0,
            rng,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    //--- Commands ---------------------------------------------------------

    /// Empties the grid, zeroes the score and spawns a fresh piece.
    pub fn reset(&mut self) {
        self.grid = Grid::new(self.grid.cols(), self.grid.rows());
        self.score = 0;
        self.drop_counter = 0.0;
        self.phase = Phase::Falling;
        self.spawn();
    }

    /// Advances the drop timer; descends one row once it passes the interval.
    pub fn update(&mut self, delta_ms: f64) -> Option<Descent> {
        if self.is_over() {
            return None;
        }
        self.drop_counter += delta_ms;
        if self.drop_counter > DROP_INTERVAL_MS {
            Some(self.soft_drop())
        } else {
            None
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_replace(|p| p.shifted(-1, 0))
    }

    pub fn move_right(&mut self) -> bool {
        self.try_replace(|p| p.shifted(1, 0))
    }

    /// Rotation has no wall kicks; a blocked turn is simply dropped.
    pub fn rotate(&mut self) -> bool {
        self.try_replace(|p| Piece {
            shape: p.shape.rotated(),
            ..p.clone()
        })
    }

    /// One row down; a rejected descent locks the piece, sweeps and spawns.
    pub fn soft_drop(&mut self) -> Descent {
        self.drop_counter = 0.0;
        if self.is_over() {
            return Descent::Over;
        }
        if self.try_replace(|p| p.shifted(0, 1)) {
            return Descent::Moved;
        }

        if let Some(piece) = self.piece.take() {
            self.grid.merge(&piece);
        }
        let (cleared, earned) = self.grid.sweep();
        self.score += earned;
        self.spawn();

        if self.is_over() {
            Descent::Over
        } else {
            Descent::Landed { cleared }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn spawn(&mut self) {
        let kind = Tetromino::ALL[self.rng.gen_range(0..Tetromino::ALL.len())];
        let piece = Piece::spawn(kind);
        if self.grid.fits(&piece) {
            self.piece = Some(piece);
        } else {
            self.piece = None;
            self.phase = Phase::GameOver;
        }
    }

    fn try_replace(&mut self, change: impl FnOnce(&Piece) -> Piece) -> bool {
        if self.is_over() {
            return false;
        }
        let Some(current) = &self.piece else {
            return false;
        };
        let candidate = change(current);
        if self.grid.fits(&candidate) {
            self.piece = Some(candidate);
            true
        } else {
            false
        }
    }
}

impl Default for BlockGame {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
