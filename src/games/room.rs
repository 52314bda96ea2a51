//=========================================================================
// Room Scene
//=========================================================================
//
// The hero's room: pieces of furniture are doors into the wardrobe, the
// drawing pad, the block game, the runner and the game center.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::character::draw_character;
use crate::gfx::{Canvas, Color};

//=== Zones ===============================================================

const WALLPAPER: Color = Color::rgb(0xff, 0xf0, 0xf5);
const FLOOR: Color = Color::rgb(0xe6, 0xd5, 0xb8);
const FLOOR_HEIGHT: f32 = 100.0;

/// Interactive zones for a `width × height` room; each leads to a scene.
fn zones(width: u32, height: u32) -> ButtonSet<SceneId> {
    let (w, h) = (width as f32, height as f32);
    let mut set = ButtonSet::new();

    set.push(Button::new(Rect::new(20.0, 20.0, 80.0, 40.0), "Exit", ui::BACK_GREY, SceneId::Title));
    set.push(Button::new(
        Rect::new(50.0, h - 300.0, 150.0, 250.0),
        "Wardrobe",
        Color::rgb(0x8e, 0x44, 0xad),
        SceneId::Wardrobe,
    ));
    set.push(Button::new(
        Rect::new(250.0, h - 250.0, 120.0, 200.0),
        "Easel",
        Color::rgb(0xf3, 0x9c, 0x12),
        SceneId::Drawing,
    ));
    set.push(Button::new(
        Rect::new(w / 2.0 - 60.0, h - 350.0, 120.0, 240.0),
        "Adventure",
        Color::rgb(0x34, 0x98, 0xdb),
        SceneId::Runner,
    ));
    set.push(Button::new(
        Rect::new(w - 370.0, h - 250.0, 120.0, 200.0),
        "Games",
        Color::rgb(0xff, 0x6b, 0x81),
        SceneId::GameMenu,
    ));
    set.push(Button::new(
        Rect::new(w - 200.0, h - 250.0, 120.0, 200.0),
        "Arcade",
        Color::rgb(0x2e, 0xcc, 0x71),
        SceneId::Blocks,
    ));
    set
}

//=== RoomScene ===========================================================

pub struct RoomScene {
    input: SceneInput,
    zones: ButtonSet<SceneId>,
    size: (u32, u32),
}

impl RoomScene {
    pub fn new() -> Self {
        Self {
            input: SceneInput::new(),
            zones: ButtonSet::new(),
            size: (1, 1),
        }
    }
}

impl Default for RoomScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for RoomScene {
    fn name(&self) -> &'static str {
        "room"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.input.attach(ctx, &[EventKind::PointerUp]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, _delta_ms: f64) {
        for event in self.input.drain() {
            if let InputEvent::PointerUp { x, y } = event {
                if let Some(target) = self.zones.hit(x, y) {
                    ctx.switch_to(target);
                    return;
                }
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, state: &AppState) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);

        surface.fill_rect(0.0, 0.0, w, h, WALLPAPER);
        surface.fill_rect(0.0, h - FLOOR_HEIGHT, w, FLOOR_HEIGHT, FLOOR);

        for zone in self.zones.iter() {
            surface.fill_rect(zone.rect.x, zone.rect.y, zone.rect.w, zone.rect.h, zone.fill);
            let (cx, cy) = zone.rect.center();
            let size = ui::fit_text(&zone.label, 16.0, zone.rect.w - 10.0);
            surface.fill_text_centered(&zone.label, cx, cy, size, Color::WHITE);
        }

        let profile = state.profile();
        draw_character(surface, w / 2.0 + 150.0, h - FLOOR_HEIGHT - 170.0, 1.0, &profile.appearance);

        let heading = format!("{}'s Room", profile.display_name);
        ui::title(surface, &heading, 50.0, 28.0, ui::INK);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.zones = zones(width, height);
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

    fn tap_zone(target: SceneId) -> Harness {
        let mut h = Harness::start(SceneId::Room);
        let zone = zones(WIDTH, HEIGHT)
            .iter()
            .find(|zone| zone.action == target)
            .map(|zone| zone.rect)
            .unwrap();
        let (cx, cy) = zone.center();
        h.tap(cx, cy);
        h
    }

    #[test]
    fn zones_lead_to_their_scenes() {
        for target in [SceneId::Wardrobe, SceneId::Drawing, SceneId::Blocks, SceneId::Runner, SceneId::GameMenu] {
            assert_eq!(tap_zone(target).active(), Some(target));
        }
    }

    #[test]
    fn exit_returns_to_title() {
        assert_eq!(tap_zone(SceneId::Title).active(), Some(SceneId::Title));
    }

    #[test]
    fn zones_do_not_overlap_on_a_normal_window() {
        let set = zones(WIDTH, HEIGHT);
        let rects: Vec<Rect> = set.iter().map(|zone| zone.rect).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }
}
