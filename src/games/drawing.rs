//=========================================================================
// Creative Studio
//=========================================================================
//
// Freehand drawing pad. A press that misses the controls starts a
// stroke, moves extend it and the release commits it. White doubles as
// a wide eraser.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::{Canvas, Color};

//=== Tools ===============================================================

const PALETTE: [Color; 8] = [
    Color::BLACK,
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0x00, 0x00, 0xff),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0x00, 0xff, 0xff),
    Color::WHITE,
];

pub const PEN_WIDTH: f32 = 5.0;
pub const ERASER_WIDTH: f32 = 20.0;

const SWATCH: f32 = 40.0;
const SWATCH_STEP: f32 = 50.0;
const PALETTE_TOP: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Pick(usize),
    Clear,
    Back,
}

fn controls(width: u32) -> ButtonSet<Action> {
    let mut set = ButtonSet::new();
    for (i, color) in PALETTE.into_iter().enumerate() {
        let rect = Rect::new(20.0, PALETTE_TOP + i as f32 * SWATCH_STEP, SWATCH, SWATCH);
        set.push(Button::new(rect, "", color, Action::Pick(i)));
    }
    let below = PALETTE_TOP + PALETTE.len() as f32 * SWATCH_STEP + 20.0;
    set.push(Button::new(
        Rect::new(20.0, below, 60.0, 40.0),
        "Clear",
        Color::rgb(0xcc, 0xcc, 0xcc),
        Action::Clear,
    ));
    set.push(ui::back_button(width, Action::Back));
    set
}

//=== Stroke ==============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<(f32, f32)>,
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    fn draw(&self, surface: &mut Canvas) {
        match self.points.as_slice() {
            [] => {}
            [(x, y)] => surface.fill_circle(*x, *y, self.width / 2.0, self.color),
            points => surface.stroke_polyline(points, self.width, self.color),
        }
    }
}

//=== DrawingScene ========================================================

pub struct DrawingScene {
    input: SceneInput,
    controls: ButtonSet<Action>,
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    color: Color,
    width: f32,
}

impl DrawingScene {
    pub fn new() -> Self {
        Self {
            input: SceneInput::new(),
            controls: ButtonSet::new(),
            strokes: Vec::new(),
            current: None,
            color: PALETTE[0],
            width: PEN_WIDTH,
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Presses hit the controls first; anything else starts a stroke.
    /// Returns the scene to leave for, if Back was pressed.
    fn press(&mut self, x: f32, y: f32) -> Option<SceneId> {
        match self.controls.hit(x, y) {
            Some(Action::Pick(index)) => {
                self.color = PALETTE[index];
                self.width = if self.color == Color::WHITE { ERASER_WIDTH } else { PEN_WIDTH };
                None
            }
            Some(Action::Clear) => {
                debug!(target: "scene", "Cleared {} strokes", self.strokes.len());
                self.strokes.clear();
                None
            }
            Some(Action::Back) => Some(SceneId::GameMenu),
            None => {
                self.current = Some(Stroke {
                    points: vec![(x, y)],
                    color: self.color,
                    width: self.width,
                });
                None
            }
        }
    }

    fn drag(&mut self, x: f32, y: f32) {
        if let Some(stroke) = &mut self.current {
            stroke.points.push((x, y));
        }
    }

    fn release(&mut self) {
        if let Some(stroke) = self.current.take() {
            self.strokes.push(stroke);
        }
    }
}

impl Default for DrawingScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for DrawingScene {
    fn name(&self) -> &'static str {
        "drawing"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.input.attach(ctx, &EventKind::DRAG);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, _delta_ms: f64) {
        for event in self.input.drain() {
            match event {
                InputEvent::MouseDown { x, y, .. } | InputEvent::TouchStart { x, y } => {
                    if let Some(target) = self.press(x, y) {
                        ctx.switch_to(target);
                        return;
                    }
                }
                InputEvent::MouseMove { x, y } | InputEvent::TouchMove { x, y } => self.drag(x, y),
                InputEvent::MouseUp { .. } | InputEvent::TouchEnd { .. } => self.release(),
                _ => {}
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        let (w, h) = (surface.width() as f32, surface.height() as f32);
        surface.fill_rect(0.0, 0.0, w, h, Color::WHITE);

        for stroke in self.strokes.iter().chain(self.current.as_ref()) {
            stroke.draw(surface);
        }

        for button in self.controls.iter() {
            let r = button.rect;
            surface.fill_rect(r.x, r.y, r.w, r.h, button.fill);
            if matches!(button.action, Action::Pick(_)) && button.fill == self.color {
                surface.stroke_rect(r.x, r.y, r.w, r.h, 3.0, Color::BLACK);
            }
            if !button.label.is_empty() {
                let (cx, cy) = r.center();
                surface.fill_text_centered(&button.label, cx, cy, 16.0, Color::BLACK);
            }
        }

        ui::title(surface, "Creative Studio", 30.0, 20.0, Color::rgb(0xcc, 0xcc, 0xcc));
    }

    fn resize(&mut self, width: u32, _height: u32) {
        self.controls = controls(width);
    }

    fn cleanup(&mut self, ctx: &mut SceneContext<SceneId>) {
        self.input.detach(ctx);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
