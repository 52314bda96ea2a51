//=========================================================================
// Memory Magic
//=========================================================================
//
// Pair-matching game over levels of growing grids. Turning two cards
// that differ locks the board for a second before they flip back; the
// last pair of a level shows a "complete" banner half a second later
// and deals the next level two seconds after that.
//
// Every delay goes through the host's timer queue, so a timer still
// pending when the player leaves is dropped rather than delivered.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use super::ui::SceneInput;
use super::SceneId;
use crate::core::input::{EventKind, InputEvent, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::core::timer::TimerId;
use crate::gfx::{Canvas, Color};

//=== Timing ==============================================================

pub const MISMATCH_DELAY_MS: f64 = 1000.0;
pub const COMPLETE_DELAY_MS: f64 = 500.0;
pub const NEXT_LEVEL_DELAY_MS: f64 = 2000.0;

const INTRO_MESSAGE_MS: f64 = 2000.0;
const MATCH_MESSAGE_MS: f64 = 500.0;

//=== Symbols =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Circle,
    Square,
    Triangle,
    Diamond,
}

const GLYPHS: [Glyph; 4] = [Glyph::Circle, Glyph::Square, Glyph::Triangle, Glyph::Diamond];

const INKS: [Color; 6] = [
    Color::rgb(0xe8, 0x43, 0x93),
    Color::rgb(0x6c, 0x5c, 0xe7),
    Color::rgb(0x00, 0xb8, 0x94),
    Color::rgb(0xfd, 0xcb, 0x6e),
    Color::rgb(0x09, 0x84, 0xe3),
    Color::rgb(0xe1, 0x70, 0x55),
];

/// What is printed on a card's face; equal symbols make a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub glyph: Glyph,
    pub ink: Color,
}

fn all_symbols() -> Vec<Symbol> {
    GLYPHS
        .iter()
        .flat_map(|&glyph| INKS.iter().map(move |&ink| Symbol { glyph, ink }))
        .collect()
}

fn draw_symbol(surface: &mut Canvas, symbol: Symbol, cx: f32, cy: f32) {
    let r = 22.0;
    match symbol.glyph {
        Glyph::Circle => surface.fill_circle(cx, cy, r, symbol.ink),
        Glyph::Square => surface.fill_rect(cx - r, cy - r, r * 2.0, r * 2.0, symbol.ink),
        Glyph::Triangle => surface.fill_triangle((cx, cy - r), (cx + r, cy + r), (cx - r, cy + r), symbol.ink),
        Glyph::Diamond => {
            surface.fill_triangle((cx, cy - r), (cx + r, cy), (cx - r, cy), symbol.ink);
            surface.fill_triangle((cx - r, cy), (cx + r, cy), (cx, cy + r), symbol.ink);
        }
    }
}

//=== Rules ===============================================================

/// Columns and rows for `level` (1-based); grids stop growing at level 5.
pub fn grid_for(level: u32) -> (usize, usize) {
    match level {
        0 | 1 => (4, 3),
        2 => (4, 4),
        3 => (5, 4),
        4 => (6, 4),
        _ => (6, 5),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub symbol: Symbol,
    pub face_up: bool,
    pub matched: bool,
}

/// Result of turning a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Ignored,
    First,
    Matched { level_complete: bool },
    /// The board is locked until `hide_mismatch`.
    Mismatched,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    level: u32,
    cols: usize,
    rows: usize,
    cards: Vec<Card>,
    turned: Vec<usize>,
    locked: bool,
}

impl MemoryGame {
    /// Shuffled pairs for `level`.
    pub fn deal(level: u32, rng: &mut StdRng) -> Self {
        let (cols, rows) = grid_for(level);
        let mut symbols = all_symbols();
        symbols.shuffle(rng);
        symbols.truncate(cols * rows / 2);

        let mut faces: Vec<Symbol> = symbols.iter().chain(symbols.iter()).copied().collect();
        faces.shuffle(rng);

        let cards = faces
            .into_iter()
            .map(|symbol| Card {
                symbol,
                face_up: false,
                matched: false,
            })
            .collect();
        Self {
            level,
            cols,
            rows,
            cards,
            turned: Vec::new(),
            locked: false,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn grid(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_complete(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }

    pub fn flip(&mut self, index: usize) -> Flip {
        if self.locked {
            return Flip::Ignored;
        }
        match self.cards.get_mut(index) {
            Some(card) if !card.face_up && !card.matched => card.face_up = true,
            _ => return Flip::Ignored,
        }
        self.turned.push(index);

        let [a, b] = match self.turned[..] {
            [a, b] => [a, b],
            _ => return Flip::First,
        };
        self.turned.clear();

        if self.cards[a].symbol == self.cards[b].symbol {
            self.cards[a].matched = true;
            self.cards[b].matched = true;
            Flip::Matched {
                level_complete: self.is_complete(),
            }
        } else {
            self.turned = vec![a, b];
            self.locked = true;
            Flip::Mismatched
        }
    }

    /// Turns the mismatched pair back down and unlocks the board.
    pub fn hide_mismatch(&mut self) {
        for index in self.turned.drain(..) {
            if let Some(card) = self.cards.get_mut(index) {
                card.face_up = false;
            }
        }
        self.locked = false;
    }
}

//=== Layout ==============================================================

const CARD_W: f32 = 80.0;
const CARD_H: f32 = 100.0;
const CARD_GAP: f32 = 15.0;
const HEADER_OFFSET: f32 = 30.0;

const BACKGROUND: Color = Color::rgb(0xff, 0xea, 0xa7);
const CARD_BACK: Color = Color::rgb(0xff, 0x9f, 0xf3);
const CARD_FACE: Color = Color::WHITE;
const BACK_RECT: Rect = Rect::new(10.0, 10.0, 90.0, 40.0);

/// Card rectangles, row-major, centred a little below the middle.
fn layout(cols: usize, rows: usize, width: u32, height: u32) -> Vec<Rect> {
    let total_w = cols as f32 * CARD_W + cols.saturating_sub(1) as f32 * CARD_GAP;
    let total_h = rows as f32 * CARD_H + rows.saturating_sub(1) as f32 * CARD_GAP;
    let start_x = (width as f32 - total_w) / 2.0;
    let start_y = (height as f32 - total_h) / 2.0 + HEADER_OFFSET;

    (0..cols * rows)
        .map(|i| {
            let (col, row) = (i % cols, i / cols);
            Rect::new(
                start_x + col as f32 * (CARD_W + CARD_GAP),
                start_y + row as f32 * (CARD_H + CARD_GAP),
                CARD_W,
                CARD_H,
            )
        })
        .collect()
}

//=== MemoryScene =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    HideMismatch,
    ShowComplete,
    NextLevel,
}

#[derive(Debug, Clone)]
struct Banner {
    text: String,
    remaining_ms: f64,
}

pub struct MemoryScene {
    input: SceneInput,
    rng: StdRng,
    game: MemoryGame,
    cards: Vec<Rect>,
    size: (u32, u32),
    banner: Option<Banner>,
    deferred: Vec<(TimerId, Deferred)>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let game = MemoryGame::deal(1, &mut rng);
        Self {
            input: SceneInput::new(),
            rng,
            game,
            cards: Vec::new(),
            size: (1, 1),
            banner: None,
            deferred: Vec::new(),
        }
    }

    fn show(&mut self, text: impl Into<String>, duration_ms: f64) {
        self.banner = Some(Banner {
            text: text.into(),
            remaining_ms: duration_ms,
        });
    }

    fn defer(&mut self, ctx: &mut SceneContext<SceneId>, delay_ms: f64, what: Deferred) {
        let id = ctx.schedule(delay_ms);
        self.deferred.push((id, what));
    }

    fn relayout(&mut self) {
        let (cols, rows) = self.game.grid();
        self.cards = layout(cols, rows, self.size.0, self.size.1);
    }

    fn start_level(&mut self, level: u32) {
        info!(target: "scene", "Memory level {}", level);
        self.game = MemoryGame::deal(level, &mut self.rng);
        self.relayout();
        self.show(format!("Level {}", level), INTRO_MESSAGE_MS);
    }

    fn on_tap(&mut self, ctx: &mut SceneContext<SceneId>, x: f32, y: f32) {
        // Cards stay still while a banner is up.
        if self.banner.is_some() {
            return;
        }
        let Some(index) = self.cards.iter().position(|r| r.contains(x, y)) else {
            return;
        };

        match self.game.flip(index) {
            Flip::Ignored | Flip::First => {}
            Flip::Matched { level_complete } => {
                self.show("Good Job!", MATCH_MESSAGE_MS);
                if level_complete {
                    self.defer(ctx, COMPLETE_DELAY_MS, Deferred::ShowComplete);
                }
            }
            Flip::Mismatched => self.defer(ctx, MISMATCH_DELAY_MS, Deferred::HideMismatch),
        }
    }

    fn draw_card(surface: &mut Canvas, rect: Rect, card: &Card) {
        surface.fill_rect(rect.x, rect.y + 3.0, rect.w, rect.h, Color::rgba(0, 0, 0, 0x33));
        let (cx, cy) = rect.center();
        if card.face_up || card.matched {
            surface.fill_rect(rect.x, rect.y, rect.w, rect.h, CARD_FACE);
            draw_symbol(surface, card.symbol, cx, cy);
        } else {
            surface.fill_rect(rect.x, rect.y, rect.w, rect.h, CARD_BACK);
            surface.fill_text_centered("?", cx, cy, 40.0, Color::WHITE);
        }
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for MemoryScene {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.show(format!("Level {}", self.game.level()), INTRO_MESSAGE_MS);
        self.input.attach(ctx, &[EventKind::PointerUp]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, delta_ms: f64) {
        if let Some(banner) = &mut self.banner {
            banner.remaining_ms -= delta_ms;
            if banner.remaining_ms <= 0.0 {
                self.banner = None;
            }
        }

        for event in self.input.drain() {
            if let InputEvent::PointerUp { x, y } = event {
                if BACK_RECT.contains(x, y) {
                    ctx.switch_to(SceneId::GameMenu);
                    return;
                }
                self.on_tap(ctx, x, y);
            }
        }
    }

    fn on_timer(&mut self, ctx: &mut SceneContext<SceneId>, timer: TimerId) {
        let Some(slot) = self.deferred.iter().position(|(id, _)| *id == timer) else {
            return;
        };
        let (_, what) = self.deferred.swap_remove(slot);
        debug!(target: "scene", "Memory timer {:?}", what);

        match what {
            Deferred::HideMismatch => self.game.hide_mismatch(),
            Deferred::ShowComplete => {
                self.show("Level Complete!", NEXT_LEVEL_DELAY_MS);
                self.defer(ctx, NEXT_LEVEL_DELAY_MS, Deferred::NextLevel);
            }
            Deferred::NextLevel => self.start_level(self.game.level() + 1),
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        surface.fill_rect(0.0, 0.0, w, h, BACKGROUND);

        let heading = format!("Memory Magic - Level {}", self.game.level());
        super::ui::title(surface, &heading, 60.0, 40.0, Color::rgb(0xff, 0x76, 0x75));

        let b = BACK_RECT;
        surface.fill_rect(b.x, b.y, b.w, b.h, Color::rgb(0xfa, 0xb1, 0xa0));
        let (bx, by) = b.center();
        surface.fill_text_centered("Back", bx, by, 20.0, Color::WHITE);

        for (rect, card) in self.cards.iter().zip(self.game.cards()) {
            Self::draw_card(surface, *rect, card);
        }

        if let Some(banner) = &self.banner {
            surface.fill_rect(0.0, h / 2.0 - 50.0, w, 100.0, Color::rgba(255, 255, 255, 0xcc));
            super::ui::title(surface, &banner.text, h / 2.0, 50.0, Color::rgb(0xd6, 0x30, 0x31));
        }
    }

    /// Re-lays out the current deal; the level keeps going.
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.relayout();
    }

    fn cleanup(&mut self, ctx: &mut SceneContext<SceneId>) {
        self.input.detach(ctx);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
