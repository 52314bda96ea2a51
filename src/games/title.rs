//=========================================================================
// Title Scene
//=========================================================================
//
// "Who are you today?" Profile picker: one card per save slot. Picking
// a card makes that slot current and opens the wardrobe.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::character::draw_character;
use crate::gfx::{Canvas, Color};

//=== Layout ==============================================================

const CARD_W: f32 = 200.0;
const CARD_H: f32 = 300.0;
const CARD_GAP: f32 = 50.0;

const CARD_COLORS: [Color; 3] = [
    Color::rgb(0xff, 0x9a, 0x9e),
    Color::rgb(0xa1, 0x8c, 0xd1),
    Color::rgb(0x4f, 0xac, 0xfe),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Pick(usize),
}

/// Card rectangles for `count` slots, centred on a `width × height` surface.
fn card_rects(count: usize, width: u32, height: u32) -> Vec<Rect> {
    let total = count as f32 * CARD_W + count.saturating_sub(1) as f32 * CARD_GAP;
    let start_x = (width as f32 - total) / 2.0;
    let y = height as f32 / 2.0 - CARD_H / 2.0;

    (0..count)
        .map(|i| Rect::new(start_x + i as f32 * (CARD_W + CARD_GAP), y, CARD_W, CARD_H))
        .collect()
}

//=== TitleScene ==========================================================

pub struct TitleScene {
    input: SceneInput,
    slots: Vec<String>,
    buttons: ButtonSet<Action>,
    size: (u32, u32),
}

impl TitleScene {
    pub fn new() -> Self {
        Self {
            input: SceneInput::new(),
            slots: Vec::new(),
            buttons: ButtonSet::new(),
            size: (1, 1),
        }
    }

    fn layout(&mut self) {
        self.buttons.clear();
        let rects = card_rects(self.slots.len(), self.size.0, self.size.1);
        for (i, rect) in rects.into_iter().enumerate() {
            let fill = CARD_COLORS[i % CARD_COLORS.len()];
            self.buttons.push(Button::new(rect, "", fill, Action::Pick(i)));
        }
    }

    fn pick(&self, ctx: &mut SceneContext<SceneId>, index: usize) {
        let Some(slot) = self.slots.get(index) else {
            return;
        };
        info!(target: "scene", "Profile {} picked", slot);
        if let Err(e) = ctx.state.select_slot(slot) {
            warn!(target: "state", "Could not select profile {}: {}", slot, e);
        }
        ctx.switch_to(SceneId::Wardrobe);
    }
}

impl Default for TitleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for TitleScene {
    fn name(&self) -> &'static str {
        "title"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.slots = ctx.state.ordered_slots().into_iter().map(|(slot, _)| slot.to_string()).collect();
        self.input.attach(ctx, &[EventKind::PointerUp]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, _delta_ms: f64) {
        for event in self.input.drain() {
            if let InputEvent::PointerUp { x, y } = event {
                if let Some(Action::Pick(index)) = self.buttons.hit(x, y) {
                    self.pick(ctx, index);
                    return;
                }
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, state: &AppState) {
        ui::vertical_gradient(surface, Color::rgb(0xa1, 0x8c, 0xd1), Color::rgb(0xfb, 0xc2, 0xeb));
        ui::title(surface, "Who are you today?", 100.0, 40.0, Color::WHITE);

        for button in self.buttons.iter() {
            let Action::Pick(index) = button.action;
            let r = button.rect;

            surface.fill_rect(r.x + 10.0, r.y + 10.0, r.w, r.h, Color::rgba(0, 0, 0, 0x33));
            surface.fill_rect(r.x, r.y, r.w, r.h, button.fill);
            surface.fill_rect(r.x + 10.0, r.y + 10.0, r.w - 20.0, r.h - 80.0, Color::rgba(255, 255, 255, 0x4d));
            surface.fill_circle(r.x + r.w / 2.0, r.y + 100.0, 60.0, Color::rgba(255, 255, 255, 0xcc));

            let profile = self.slots.get(index).and_then(|slot| state.data().slots.get(slot));
            if let Some(profile) = profile {
                draw_character(surface, r.x + r.w / 2.0, r.y + 90.0, 0.55, &profile.appearance);
                let size = ui::fit_text(&profile.display_name, 24.0, r.w - 20.0);
                surface.fill_text_centered(&profile.display_name, r.x + r.w / 2.0, r.y + r.h - 30.0, size, Color::WHITE);
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.layout();
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

    #[test]
    fn three_cards_are_centred() {
        let rects = card_rects(3, 1000, 800);

        assert_eq!(rects.len(), 3);
        // (1000 - (3 * 200 + 2 * 50)) / 2
        assert_eq!(rects[0].x, 150.0);
        assert_eq!(rects[2].x + rects[2].w, 850.0);
        assert_eq!(rects[1].y, 250.0);
    }

    #[test]
    fn picking_a_card_selects_the_profile_and_opens_the_wardrobe() {
        use crate::games::harness::Harness;

        let mut h = Harness::start(SceneId::Title);
        let card = card_rects(3, 1024, 720)[1];

        h.tap(card.x + 20.0, card.y + 20.0);

        assert_eq!(h.active(), Some(SceneId::Wardrobe));
        assert_eq!(h.state.current_slot(), "lara");
    }

    #[test]
    fn cards_follow_the_built_in_slot_order() {
        use crate::core::state::DEFAULT_SLOTS;
        use crate::games::harness::Harness;

        for (i, (key, _)) in DEFAULT_SLOTS.iter().enumerate() {
            let mut h = Harness::start(SceneId::Title);
            let card = card_rects(3, 1024, 720)[i];
            h.tap(card.x + 20.0, card.y + 20.0);
            assert_eq!(h.state.current_slot(), *key, "card {}", i);
        }
    }

    #[test]
    fn tapping_the_background_does_nothing() {
        use crate::games::harness::Harness;

        let mut h = Harness::start(SceneId::Title);
        h.tap(5.0, 5.0);

        assert_eq!(h.active(), Some(SceneId::Title));
    }

    #[test]
    fn no_slots_no_cards() {
        assert!(card_rects(0, 1000, 800).is_empty());
    }
}
