//=========================================================================
// Scene UI Helpers
//=========================================================================
//
// Drawing and input plumbing shared by the menus and games: the common
// back button, flat labelled buttons, background gradients, and the
// attach/drain/detach dance around a scene's single listener.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::SceneId;
use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, Listener, Rect};
use crate::core::scene::SceneContext;
use crate::gfx::{Canvas, Color};

//=== Palette =============================================================

pub const INK: Color = Color::rgb(0x55, 0x55, 0x55);
pub const BACK_GREY: Color = Color::rgb(0x95, 0xa5, 0xa6);
pub const SHADOW: Color = Color::rgba(0, 0, 0, 0x1a);

/// Label size used on every button.
pub const LABEL_SIZE: f32 = 14.0;

//=== Back Button =========================================================

/// The top-right back button every game shares.
pub fn back_button_rect(width: u32) -> Rect {
    Rect::new(width as f32 - 100.0, 20.0, 80.0, 40.0)
}

pub fn back_button<A>(width: u32, action: A) -> Button<A> {
    Button::new(back_button_rect(width), "Back", BACK_GREY, action)
}

//=== Drawing =============================================================

/// Flat button with a drop shadow and a centred white label.
pub fn draw_button<A>(canvas: &mut Canvas, button: &Button<A>) {
    let r = button.rect;
    canvas.fill_rect(r.x + 5.0, r.y + 5.0, r.w, r.h, SHADOW);
    canvas.fill_rect(r.x, r.y, r.w, r.h, button.fill);

    let size = fit_text(&button.label, LABEL_SIZE, r.w - 12.0);
    let (cx, cy) = r.center();
    canvas.fill_text_centered(&button.label, cx, cy, size, Color::WHITE);
}

pub fn draw_buttons<A: Copy>(canvas: &mut Canvas, buttons: &ButtonSet<A>) {
    for button in buttons.iter() {
        draw_button(canvas, button);
    }
}

/// Largest size ≤ `size` at which `text` fits in `max_width`.
pub fn fit_text(text: &str, size: f32, max_width: f32) -> f32 {
    let width = Canvas::text_width(text, size);
    if width <= max_width || width <= 0.0 {
        size
    } else {
        (size * max_width / width).max(4.0)
    }
}

/// Vertical two-stop gradient over the whole surface.
pub fn vertical_gradient(canvas: &mut Canvas, top: Color, bottom: Color) {
    let (w, h) = (canvas.width() as f32, canvas.height());
    const BANDS: u32 = 32;
    let band = h as f32 / BANDS as f32;

    for i in 0..BANDS {
        let t = i as f32 / (BANDS - 1) as f32;
        canvas.fill_rect(0.0, i as f32 * band, w, band + 1.0, top.lerp(bottom, t));
    }
}

/// Centred heading.
pub fn title(canvas: &mut Canvas, text: &str, y: f32, size: f32, color: Color) {
    let cx = canvas.width() as f32 / 2.0;
    let size = fit_text(text, size, canvas.width() as f32 - 20.0);
    canvas.fill_text_centered(text, cx, y, size, color);
}

//=== Listener Plumbing ===================================================

/// The one listener a scene holds while active.
#[derive(Debug, Default)]
pub struct SceneInput {
    listener: Option<Listener>,
}

impl SceneInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `kinds`, replacing nothing; call once from `init`.
    pub fn attach(&mut self, ctx: &mut SceneContext<SceneId>, kinds: &[EventKind]) {
        debug_assert!(self.listener.is_none(), "listener attached twice");
        self.listener = Some(ctx.input.attach(kinds));
    }

    /// Everything received since the last call, oldest first.
    pub fn drain(&self) -> Vec<InputEvent> {
        match &self.listener {
            Some(listener) => listener.drain().collect(),
            None => Vec::new(),
        }
    }

    /// Detaches the listener; call from `cleanup`.
    pub fn detach(&mut self, ctx: &mut SceneContext<SceneId>) {
        if let Some(listener) = self.listener.take() {
            ctx.input.detach(listener);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
