//=========================================================================
// Game Menu Scene
//=========================================================================
//
// "Game Center": a 3-column grid of the seven games plus shortcuts back
// to the profile picker and the room.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::{Canvas, Color};

//=== Layout ==============================================================

const BUTTON_W: f32 = 220.0;
const BUTTON_H: f32 = 120.0;
const GAP: f32 = 40.0;
const COLUMNS: usize = 3;

const GAMES: [(&str, Color, SceneId); 7] = [
    ("Block Party", Color::rgb(0xe7, 0x4c, 0x3c), SceneId::Blocks),
    ("Creative Studio", Color::rgb(0xf3, 0x9c, 0x12), SceneId::Drawing),
    ("Coloring Book", Color::rgb(0xf1, 0xc4, 0x0f), SceneId::Coloring),
    ("Crystal Maze", Color::rgb(0x1a, 0xbc, 0x9c), SceneId::Maze),
    ("Picture Puzzle", Color::rgb(0x9b, 0x59, 0xb6), SceneId::Puzzle),
    ("Horse Runner", Color::rgb(0x34, 0x98, 0xdb), SceneId::HorseRunner),
    ("Memory Magic", Color::rgb(0xff, 0x9f, 0xf3), SceneId::Memory),
];

fn menu(width: u32, height: u32) -> ButtonSet<SceneId> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let start_x = cx - (BUTTON_W * 1.5 + GAP);
    let start_y = cy - (BUTTON_H + GAP / 2.0);

    let mut set = ButtonSet::new();
    for (i, (label, fill, target)) in GAMES.into_iter().enumerate() {
        let (col, row) = (i % COLUMNS, i / COLUMNS);
        let rect = Rect::new(
            start_x + col as f32 * (BUTTON_W + GAP),
            start_y + row as f32 * (BUTTON_H + GAP),
            BUTTON_W,
            BUTTON_H,
        );
        set.push(Button::new(rect, label, fill, target));
    }

    set.push(Button::new(Rect::new(20.0, 20.0, 140.0, 40.0), "Change Hero", ui::BACK_GREY, SceneId::Title));
    set.push(Button::new(
        Rect::new(180.0, 20.0, 120.0, 40.0),
        "My Room",
        Color::rgb(0x8e, 0x44, 0xad),
        SceneId::Room,
    ));
    set
}

//=== GameMenuScene =======================================================

pub struct GameMenuScene {
    input: SceneInput,
    buttons: ButtonSet<SceneId>,
}

impl GameMenuScene {
    pub fn new() -> Self {
        Self {
            input: SceneInput::new(),
            buttons: ButtonSet::new(),
        }
    }
}

impl Default for GameMenuScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for GameMenuScene {
    fn name(&self) -> &'static str {
        "game-menu"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.input.attach(ctx, &[EventKind::PointerUp]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, _delta_ms: f64) {
        for event in self.input.drain() {
            if let InputEvent::PointerUp { x, y } = event {
                // One button per tap.
                if let Some(target) = self.buttons.hit(x, y) {
                    ctx.switch_to(target);
                    return;
                }
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        let (w, h) = (surface.width() as f32, surface.height() as f32);
        surface.fill_rect(0.0, 0.0, w, h, Color::rgb(0xfc, 0xe4, 0xec));
        ui::title(surface, "Game Center", 80.0, 40.0, Color::rgb(0xff, 0x6b, 0x81));
        ui::draw_buttons(surface, &self.buttons);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.buttons = menu(width, height);
    }

    fn cleanup(&mut self, ctx: &mut SceneContext<SceneId>) {
        self.input.detach(ctx);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
