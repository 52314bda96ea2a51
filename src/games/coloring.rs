//=========================================================================
// Magic Coloring
//=========================================================================
//
// Coloring book. The current page is painted, scaled to fit, into an
// offscreen buffer the size of the surface; taps flood-fill that buffer
// with the chosen color. The buffer is what gets shown each frame.
//
// Resizing reallocates the buffer and reloads the page, so fills made
// so far are lost.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::assets::ArtSource;
use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::flood_fill::{flood_fill, FillOutcome};
use crate::gfx::{Canvas, Color, PixelBuffer};

//=== Palette =============================================================

const PALETTE: [Color; 33] = [
    // Reds and pinks
    Color::rgb(255, 0, 0),
    Color::rgb(220, 20, 60),
    Color::rgb(255, 105, 180),
    Color::rgb(255, 192, 203),
    Color::rgb(250, 128, 114),
    // Oranges and yellows
    Color::rgb(255, 69, 0),
    Color::rgb(255, 165, 0),
    Color::rgb(255, 218, 185),
    Color::rgb(255, 215, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(240, 230, 140),
    // Greens
    Color::rgb(0, 100, 0),
    Color::rgb(0, 128, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(50, 205, 50),
    Color::rgb(144, 238, 144),
    Color::rgb(0, 250, 154),
    // Blues
    Color::rgb(0, 206, 209),
    Color::rgb(0, 255, 255),
    Color::rgb(135, 206, 235),
    Color::rgb(30, 144, 255),
    Color::rgb(0, 0, 255),
    Color::rgb(0, 0, 139),
    // Purples
    Color::rgb(75, 0, 130),
    Color::rgb(138, 43, 226),
    Color::rgb(128, 0, 128),
    Color::rgb(255, 0, 255),
    // Earth
    Color::rgb(139, 69, 19),
    Color::rgb(165, 42, 42),
    Color::rgb(245, 222, 179),
    Color::BLACK,
    Color::rgb(128, 128, 128),
    Color::WHITE,
];

const SWATCH: f32 = 40.0;
const SWATCH_GAP: f32 = 8.0;
const PLACEHOLDER: Color = Color::rgb(0xee, 0xee, 0xee);

//=== Layout ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Pick(usize),
    NextPage,
    Back,
}

/// Palette rows wrap to the width, at least one swatch per row.
fn controls(width: u32, height: u32) -> ButtonSet<Action> {
    let (w, h) = (width as f32, height as f32);
    let step = SWATCH + SWATCH_GAP;
    let columns = (((w - 100.0) / step).floor() as usize).max(1);
    let (start_x, start_y) = (40.0, h - 180.0);

    let mut set = ButtonSet::new();
    for (i, color) in PALETTE.into_iter().enumerate() {
        let (col, row) = (i % columns, i / columns);
        let rect = Rect::new(start_x + col as f32 * step, start_y + row as f32 * step, SWATCH, SWATCH);
        set.push(Button::new(rect, "", color, Action::Pick(i)));
    }
    set.push(Button::new(
        Rect::new(w - 180.0, h - 80.0, 160.0, 50.0),
        "Next Picture",
        Color::rgb(0xcc, 0xcc, 0xcc),
        Action::NextPage,
    ));
    set.push(ui::back_button(width, Action::Back));
    set
}

/// Where a `page_w × page_h` page sits in a `width × height` buffer:
/// scaled to fit with a margin and nudged up to clear the palette.
fn page_rect(page_w: u32, page_h: u32, width: u32, height: u32) -> Rect {
    let (bw, bh) = (width as f32, height as f32);
    let scale = ((bw - 50.0) / page_w as f32).min((bh - 150.0) / page_h as f32).max(0.0);
    let (w, h) = (page_w as f32 * scale, page_h as f32 * scale);
    Rect::new((bw - w) / 2.0, (bh - h) / 2.0 - 20.0, w, h)
}

//=== ColoringScene =======================================================

pub struct ColoringScene {
    art: Rc<dyn ArtSource>,
    input: SceneInput,
    controls: ButtonSet<Action>,
    buffer: Option<PixelBuffer>,
    page: usize,
    color: Color,
}

impl ColoringScene {
    pub fn new(art: Rc<dyn ArtSource>) -> Self {
        Self {
            art,
            input: SceneInput::new(),
            controls: ButtonSet::new(),
            buffer: None,
            page: 0,
            color: PALETTE[0],
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    /// Repaints the buffer with a clean copy of the current page.
    fn reset_page(&mut self) {
        let Some(buffer) = self.buffer.take() else {
            return;
        };
        let (width, height) = (buffer.width(), buffer.height());
        let mut canvas = Canvas::from_buffer(buffer);
        canvas.fill_rect(0.0, 0.0, width as f32, height as f32, Color::WHITE);

        match self.art.load_page(self.page) {
            Ok(page) => {
                let r = page_rect(page.width(), page.height(), width, height);
                canvas.draw_image_scaled(&page, r.x, r.y, r.w, r.h);
            }
            Err(e) => {
                warn!(target: "assets", "Page {} unavailable, showing a blank: {}", self.page, e);
                let r = page_rect(4, 3, width, height);
                canvas.fill_rect(r.x, r.y, r.w, r.h, PLACEHOLDER);
                canvas.stroke_rect(r.x, r.y, r.w, r.h, 5.0, Color::BLACK);
            }
        }
        self.buffer = Some(canvas.into_buffer());
    }

    fn next_page(&mut self) {
        self.page = (self.page + 1) % self.art.page_count().max(1);
        debug!(target: "scene", "Coloring page {}", self.page);
        self.reset_page();
    }

    fn fill_at(&mut self, x: f32, y: f32) -> Option<FillOutcome> {
        let buffer = self.buffer.as_mut()?;
        let outcome = flood_fill(buffer, x.floor() as i64, y.floor() as i64, self.color);
        debug!(target: "gfx::fill", "Fill at {},{}: {:?}", x, y, outcome);
        Some(outcome)
    }

    fn on_tap(&mut self, ctx: &mut SceneContext<SceneId>, x: f32, y: f32) {
        match self.controls.hit(x, y) {
            Some(Action::Pick(index)) => self.color = PALETTE[index],
            Some(Action::NextPage) => self.next_page(),
            Some(Action::Back) => ctx.switch_to(SceneId::GameMenu),
            None => {
                self.fill_at(x, y);
            }
        }
    }
}

impl Scene<SceneId> for ColoringScene {
    fn name(&self) -> &'static str {
        "coloring"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        let (width, height) = ctx.surface_size();
        self.buffer = Some(PixelBuffer::filled(width, height, Color::WHITE)?);
        self.reset_page();
        self.input.attach(ctx, &[EventKind::PointerUp]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, _delta_ms: f64) {
        for event in self.input.drain() {
            if let InputEvent::PointerUp { x, y } = event {
                self.on_tap(ctx, x, y);
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        if let Some(buffer) = &self.buffer {
            surface.draw_image(buffer, 0.0, 0.0);
        }

        for button in self.controls.iter() {
            let r = button.rect;
            surface.fill_rect(r.x, r.y, r.w, r.h, button.fill);
            let selected = matches!(button.action, Action::Pick(_)) && button.fill == self.color;
            if selected {
                surface.stroke_rect(r.x, r.y, r.w, r.h, 3.0, Color::BLACK);
            } else {
                surface.stroke_rect(r.x, r.y, r.w, r.h, 1.0, Color::rgba(0, 0, 0, 0x80));
            }
            if !button.label.is_empty() {
                let (cx, cy) = r.center();
                surface.fill_text_centered(&button.label, cx, cy, 16.0, Color::BLACK);
            }
        }

        ui::title(surface, "Magic Coloring", 50.0, 30.0, Color::rgb(0x33, 0x33, 0x33));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.controls = controls(width, height);
        if self.buffer.is_none() {
            return;
        }
        match PixelBuffer::filled(width, height, Color::WHITE) {
            Ok(buffer) => {
                self.buffer = Some(buffer);
                self.reset_page();
            }
            Err(e) => error!(target: "scene", "Could not resize coloring buffer: {}", e),
        }
    }

    fn cleanup(&mut self, ctx: &mut SceneContext<SceneId>) {
        self.input.detach(ctx);
        self.buffer = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
