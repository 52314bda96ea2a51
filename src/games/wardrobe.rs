//=========================================================================
// Wardrobe Scene
//=========================================================================
//
// Character creator. Edits a draft of the current profile's appearance
// and name; "Come out and play!" commits the draft (one save) and opens
// the game menu.
//
// Taps closer than 300 ms to the previous accepted tap are ignored, so a
// double tap cycles an option once.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{Button, ButtonSet, EventKind, InputEvent, KeyCode, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::{AppState, Appearance, Pet};
use crate::gfx::character::{draw_character, HAIR_STYLES, OUTFITS};
use crate::gfx::{Canvas, Color};

//=== Palettes ============================================================

const HAIR_COLORS: [&str; 12] = [
    "#2c3e50", "#e74c3c", "#f1c40f", "#ecf0f1", "#9b59b6", "#e67e22",
    "#3498db", "#2ecc71", "#34495e", "#ff9ff3", "#5f27cd", "#00d2d3",
];

const OUTFIT_COLORS: [&str; 12] = [
    "#ff6b81", "#a4b0be", "#7bed9f", "#eccc68", "#ff7f50", "#70a1ff",
    "#5352ed", "#ff4757", "#2f3542", "#d63031", "#e056fd", "#686de0",
];

pub const DEBOUNCE_MS: f64 = 300.0;
pub const MAX_NAME_LEN: usize = 12;

/// Next entry of `palette` after `current`; unknown colors restart at 0.
fn next_color(palette: &[&str], current: &str) -> String {
    let next = palette
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current))
        .map_or(0, |i| (i + 1) % palette.len());
    palette[next].to_string()
}

//=== Actions =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    HairStyle,
    HairColor,
    EditName,
    Outfit,
    OutfitColor,
    Pet,
    Randomize,
    Play,
}

fn controls(width: u32, height: u32) -> ButtonSet<Action> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let grey = Color::rgb(0xcc, 0xcc, 0xcc);
    let (bw, bh) = (200.0, 50.0);

    let mut set = ButtonSet::new();
    set.push(Button::new(Rect::new(cx - 350.0, cy - 150.0, bw, bh), "Hair Style >", grey, Action::HairStyle));
    set.push(Button::new(Rect::new(cx - 350.0, cy - 70.0, bw, bh), "Hair Color >", grey, Action::HairColor));
    set.push(Button::new(Rect::new(cx - 350.0, cy + 10.0, bw, bh), "Your Name", grey, Action::EditName));
    set.push(Button::new(Rect::new(cx + 150.0, cy - 150.0, bw, bh), "Outfit >", grey, Action::Outfit));
    set.push(Button::new(Rect::new(cx + 150.0, cy - 70.0, bw, bh), "Outfit Color >", grey, Action::OutfitColor));
    set.push(Button::new(Rect::new(cx + 150.0, cy + 10.0, bw, bh), "Pet >", grey, Action::Pet));
    set.push(Button::new(
        Rect::new(cx - 150.0, height as f32 - 100.0, 300.0, 70.0),
        "COME OUT AND PLAY!",
        Color::rgb(0x2e, 0xcc, 0x71),
        Action::Play,
    ));
    set.push(Button::new(
        Rect::new(cx - 150.0, 100.0, 300.0, 50.0),
        "MAKE IT BEAUTIFUL!",
        Color::rgb(0xff, 0x9a, 0x9e),
        Action::Randomize,
    ));
    set
}

//=== WardrobeScene =======================================================

pub struct WardrobeScene {
    input: SceneInput,
    buttons: ButtonSet<Action>,
    rng: StdRng,

    draft: Appearance,
    name: String,
    editing_name: bool,

    /// Scene time, and when the last tap was accepted.
    clock_ms: f64,
    last_tap_ms: Option<f64>,
}

impl WardrobeScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            input: SceneInput::new(),
            buttons: ButtonSet::new(),
            rng,
            draft: Appearance::default(),
            name: String::new(),
            editing_name: false,
            clock_ms: 0.0,
            last_tap_ms: None,
        }
    }

    fn debounced(&mut self) -> bool {
        if let Some(last) = self.last_tap_ms {
            if self.clock_ms - last < DEBOUNCE_MS {
                return true;
            }
        }
        self.last_tap_ms = Some(self.clock_ms);
        false
    }

    fn apply(&mut self, ctx: &mut SceneContext<SceneId>, action: Action) {
        debug!(target: "scene", "Wardrobe {:?}", action);
        self.editing_name = matches!(action, Action::EditName) && !self.editing_name;

        match action {
            Action::HairStyle => self.draft.hair_style = (self.draft.hair_style + 1) % HAIR_STYLES,
            Action::HairColor => self.draft.hair_color = next_color(&HAIR_COLORS, &self.draft.hair_color),
            Action::Outfit => self.draft.outfit = (self.draft.outfit + 1) % OUTFITS,
            Action::OutfitColor => {
                self.draft.outfit_color = next_color(&OUTFIT_COLORS, &self.draft.outfit_color)
            }
            Action::Pet => self.draft.pet = self.draft.pet.next(),
            Action::Randomize => self.randomize(),
            Action::EditName => {}
            Action::Play => self.commit(ctx),
        }
    }

    fn randomize(&mut self) {
        self.draft.hair_style = self.rng.gen_range(0..HAIR_STYLES);
        self.draft.outfit = self.rng.gen_range(0..OUTFITS);
        self.draft.hair_color = HAIR_COLORS[self.rng.gen_range(0..HAIR_COLORS.len())].to_string();
        self.draft.outfit_color = OUTFIT_COLORS[self.rng.gen_range(0..OUTFIT_COLORS.len())].to_string();
        self.draft.pet = Pet::ALL[self.rng.gen_range(0..Pet::ALL.len())];
    }

    fn type_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace | KeyCode::Delete => {
                self.name.pop();
            }
            KeyCode::Enter | KeyCode::Escape => self.editing_name = false,
            _ => {
                if let Some(ch) = key.to_char() {
                    if self.name.chars().count() < MAX_NAME_LEN {
                        self.name.push(ch);
                    }
                }
            }
        }
    }

    /// Writes the draft to the profile and leaves for the game menu.
    fn commit(&mut self, ctx: &mut SceneContext<SceneId>) {
        let name = self.name.trim();
        if !name.is_empty() && name != ctx.state.profile().display_name {
            if let Err(e) = ctx.state.set_display_name(name) {
                warn!(target: "state", "Could not save name: {}", e);
            }
        }
        if let Err(e) = ctx.state.update_appearance(self.draft.clone()) {
            warn!(target: "state", "Could not save appearance: {}", e);
        }
        ctx.switch_to(SceneId::GameMenu);
    }
}

impl Default for WardrobeScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for WardrobeScene {
    fn name(&self) -> &'static str {
        "wardrobe"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        let profile = ctx.state.profile();
        self.draft = profile.appearance.clone();
        self.name = profile.display_name.clone();
        self.input.attach(ctx, &[EventKind::PointerUp, EventKind::KeyDown]);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, delta_ms: f64) {
        self.clock_ms += delta_ms;

        for event in self.input.drain() {
            match event {
                InputEvent::PointerUp { x, y } => {
                    let Some(action) = self.buttons.hit(x, y) else {
                        continue;
                    };
                    if self.debounced() {
                        continue;
                    }
                    self.apply(ctx, action);
                    if action == Action::Play {
                        return;
                    }
                }
                InputEvent::KeyDown(key) if self.editing_name => self.type_key(key),
                _ => {}
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        let (w, h) = (surface.width() as f32, surface.height() as f32);
        let (cx, cy) = (w / 2.0, h / 2.0);

        surface.fill_rect(0.0, 0.0, w, h, Color::rgb(0xf0, 0xf8, 0xff));
        surface.fill_circle(cx, cy, 220.0, Color::rgba(255, 255, 255, 0x80));
        draw_character(surface, cx, cy - 60.0, 1.6, &self.draft);

        ui::draw_buttons(surface, &self.buttons);
        ui::title(surface, "Design Your Style", 60.0, 32.0, ui::INK);

        let label = if self.editing_name {
            format!("{}_", self.name)
        } else {
            self.name.clone()
        };
        let color = if self.editing_name { Color::rgb(0xe7, 0x4c, 0x3c) } else { ui::INK };
        surface.fill_text_centered(&label, cx - 250.0, cy + 90.0, 18.0, color);
        surface.fill_text_centered(self.draft.pet.label(), cx + 250.0, cy + 90.0, 18.0, ui::INK);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.buttons = controls(width, height);
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

    fn center_of(action: Action) -> (f32, f32) {
        controls(WIDTH, HEIGHT)
            .iter()
            .find(|b| b.action == action)
            .map(|b| b.rect.center())
            .unwrap()
    }

    fn tap(h: &mut Harness, action: Action) {
        let (x, y) = center_of(action);
        h.tap(x, y);
        h.run_for(DEBOUNCE_MS);
    }

    #[test]
    fn color_cycles_wrap_and_recover_from_unknown() {
        assert_eq!(next_color(&HAIR_COLORS, "#2c3e50"), "#e74c3c");
        assert_eq!(next_color(&HAIR_COLORS, "#00d2d3"), "#2c3e50");
        assert_eq!(next_color(&HAIR_COLORS, "#ff9a9e"), "#2c3e50");
    }

    #[test]
    fn play_commits_the_draft_and_opens_the_menu() {
        let mut h = Harness::start(SceneId::Wardrobe);

        tap(&mut h, Action::HairStyle);
        tap(&mut h, Action::Pet);
        tap(&mut h, Action::Play);

        assert_eq!(h.active(), Some(SceneId::GameMenu));
        let look = &h.state.profile().appearance;
        assert_eq!(look.hair_style, 1);
        assert_eq!(look.pet, Pet::Cat);
    }

    #[test]
    fn leaving_without_play_keeps_the_old_look() {
        let mut h = Harness::start(SceneId::Wardrobe);
        tap(&mut h, Action::HairStyle);

        h.host.activate_key(SceneId::Title, &mut h.state).unwrap();

        assert_eq!(h.state.profile().appearance.hair_style, 0);
    }

    #[test]
    fn rapid_double_tap_counts_once() {
        let mut h = Harness::start(SceneId::Wardrobe);
        let (x, y) = center_of(Action::HairStyle);

        h.tap(x, y);
        h.tap(x, y);
        h.run_for(DEBOUNCE_MS);
        tap(&mut h, Action::Play);

        assert_eq!(h.state.profile().appearance.hair_style, 1);
    }

    #[test]
    fn typing_a_name() {
        let mut h = Harness::start(SceneId::Wardrobe);
        tap(&mut h, Action::EditName);

        for _ in 0..20 {
            h.send(InputEvent::KeyDown(KeyCode::Backspace));
        }
        for key in [KeyCode::KeyZ, KeyCode::KeyO, KeyCode::KeyE, KeyCode::Enter, KeyCode::KeyX] {
            h.send(InputEvent::KeyDown(key));
        }
        h.tick();
        tap(&mut h, Action::Play);

        assert_eq!(h.state.profile().display_name, "ZOE");
    }

    #[test]
    fn names_are_capped() {
        let mut scene = WardrobeScene::with_rng(StdRng::seed_from_u64(1));
        for _ in 0..30 {
            scene.type_key(KeyCode::KeyA);
        }
        assert_eq!(scene.name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn randomize_stays_in_range() {
        let mut scene = WardrobeScene::with_rng(StdRng::seed_from_u64(7));
        for _ in 0..50 {
            scene.randomize();
            assert!(scene.draft.hair_style < HAIR_STYLES);
            assert!(scene.draft.outfit < OUTFITS);
            assert!(HAIR_COLORS.contains(&scene.draft.hair_color.as_str()));
        }
    }
}
