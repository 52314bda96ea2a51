//=========================================================================
// Horse Runner
//=========================================================================
//
// Endless runner: a horse jumps rocks and bushes while the world speeds
// up. The simulation runs in fixed 16 ms steps; the score is the number
// of steps survived, shown divided by ten.
//
// A crash stops the run. Any key or press after a short cooldown starts
// again.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Internal Dependencies ===============================================

use super::jumper::{self, JumpPhysics, Jumper};
use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{EventKind, InputEvent, KeyCode, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::{Canvas, Color};

//=== Tuning ==============================================================

pub const HIGH_SCORE_KEY: &str = "horse";

const PHYSICS: JumpPhysics = JumpPhysics {
    gravity: 0.6,
    jump_velocity: -13.0,
    air_jump: None,
};

pub const START_SPEED: f32 = 7.0;
const SPEED_GAIN: f32 = 0.0015;

/// Inclusive range of steps between spawns.
const SPAWN_GAP: (u32, u32) = (90, 140);

/// Steps a crash must be on screen before input restarts.
pub const RESTART_COOLDOWN: u32 = 10;

/// Score steps per displayed point.
const SCORE_DIVISOR: u32 = 10;

const HORSE_X: f32 = 100.0;
const GROUND_OFFSET: f32 = 120.0;
const HURDLE_SIZE: f32 = 50.0;
const HURDLE_DROP: f32 = 10.0;
const OFFSCREEN: f32 = -100.0;

const CLOUDS: usize = 5;
const MOUNTAIN_PARALLAX: f32 = 0.2;

//=== Track ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HurdleKind {
    Rock,
    Bush,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hurdle {
    pub kind: HurdleKind,
    pub x: f32,
    pub y: f32,
}

impl Hurdle {
    /// Whether the horse, its top at `horse_y`, touches this hurdle.
    ///
    /// Both boxes are trimmed by 10 px so grazing an edge does not count.
    fn hits(&self, horse_y: f32) -> bool {
        HORSE_X + 50.0 > self.x + 10.0
            && HORSE_X + 10.0 < self.x + HURDLE_SIZE - 10.0
            && horse_y + 50.0 > self.y + 10.0
    }
}

#[derive(Debug, Clone)]
struct Cloud {
    x: f32,
    y: f32,
    size: f32,
    speed: f32,
}

#[derive(Debug, Clone)]
struct Mountain {
    x: f32,
    height: f32,
}

//=== HorseGame ===========================================================

pub struct HorseGame {
    rng: StdRng,
    horse: Jumper,
    hurdles: Vec<Hurdle>,
    clouds: Vec<Cloud>,
    mountains: Vec<Mountain>,
    size: (f32, f32),
    score: u32,
    speed: f32,
    steps: u64,
    since_spawn: u32,
    next_spawn: u32,
    since_crash: u32,
    running: bool,
    /// Fraction of a step carried over between frames.
    pending: f32,
}

impl HorseGame {
    pub fn new(mut rng: StdRng, width: u32, height: u32) -> Self {
        let next_spawn = rng.gen_range(SPAWN_GAP.0..=SPAWN_GAP.1);
        let mut game = Self {
            rng,
            horse: Jumper::new(PHYSICS, ground_for(height)),
            hurdles: Vec::new(),
            clouds: Vec::new(),
            mountains: Vec::new(),
            size: (width as f32, height as f32),
            score: 0,
            speed: START_SPEED,
            steps: 0,
            since_spawn: 0,
            next_spawn,
            since_crash: 0,
            running: true,
            pending: 0.0,
        };
        game.build_scenery();
        game
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score as shown to the player.
    pub fn points(&self) -> u32 {
        self.score / SCORE_DIVISOR
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn hurdles(&self) -> &[Hurdle] {
        &self.hurdles
    }

    pub fn ground_y(&self) -> f32 {
        self.horse.ground_y()
    }

    pub fn can_restart(&self) -> bool {
        !self.running && self.since_crash > RESTART_COOLDOWN
    }

    pub fn restart(&mut self) {
        self.running = true;
        self.score = 0;
        self.speed = START_SPEED;
        self.hurdles.clear();
        self.horse.land();
        self.since_spawn = 0;
        self.since_crash = 0;
    }

    pub fn jump(&mut self) -> bool {
        self.running && self.horse.jump()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let ground = ground_for(height);
        let shift = ground - self.horse.ground_y();
        self.horse.set_ground(ground);
        for hurdle in &mut self.hurdles {
            hurdle.y += shift;
        }
        self.size = (width as f32, height as f32);
        self.build_scenery();
    }

    /// Runs every whole step covered by `delta_ms`. Returns `true` if the
    /// horse crashed during them.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        self.pending += jumper::frames(delta_ms);
        let mut crashed = false;
        while self.pending >= 1.0 {
            self.pending -= 1.0;
            crashed |= self.step();
        }
        crashed
    }

    /// One fixed step. Returns `true` on the step the horse crashes.
    fn step(&mut self) -> bool {
        self.steps += 1;
        let width = self.size.0;
        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed;
            if cloud.x < OFFSCREEN {
                cloud.x = width - OFFSCREEN;
            }
        }

        if !self.running {
            self.since_crash = self.since_crash.saturating_add(1);
            return false;
        }

        self.score += 1;
        self.speed += SPEED_GAIN;
        self.horse.step(1.0);

        let drift = self.speed * MOUNTAIN_PARALLAX;
        for mountain in &mut self.mountains {
            mountain.x -= drift;
            if mountain.x < 2.0 * OFFSCREEN {
                mountain.x += width - 4.0 * OFFSCREEN;
            }
        }

        self.since_spawn += 1;
        if self.since_spawn > self.next_spawn {
            self.spawn();
        }

        let speed = self.speed;
        let horse_y = self.horse.y();
        let mut crashed = false;
        self.hurdles.retain_mut(|hurdle| {
            hurdle.x -= speed;
            crashed |= hurdle.hits(horse_y);
            hurdle.x >= OFFSCREEN
        });

        if crashed {
            self.running = false;
            self.since_crash = 0;
        }
        crashed
    }

    fn spawn(&mut self) {
        let kind = if self.rng.gen_bool(0.5) { HurdleKind::Rock } else { HurdleKind::Bush };
        self.hurdles.push(Hurdle {
            kind,
            x: self.size.0,
            y: self.horse.ground_y() + HURDLE_DROP,
        });
        self.since_spawn = 0;
        self.next_spawn = self.rng.gen_range(SPAWN_GAP.0..=SPAWN_GAP.1);
    }

    /// Clouds across the upper half, mountains along the whole width.
    fn build_scenery(&mut self) {
        let (w, h) = self.size;
        let rng = &mut self.rng;
        self.clouds = (0..CLOUDS)
            .map(|_| Cloud {
                x: rng.gen::<f32>() * w,
                y: rng.gen::<f32>() * h / 2.0,
                size: 30.0 + rng.gen::<f32>() * 40.0,
                speed: 0.5 + rng.gen::<f32>() * 0.5,
            })
            .collect();

        self.mountains.clear();
        let mut x = 0.0;
        while x < w - 2.0 * OFFSCREEN {
            self.mountains.push(Mountain {
                x,
                height: 100.0 + rng.gen::<f32>() * 150.0,
            });
            x += 80.0 + rng.gen::<f32>() * 100.0;
        }
    }
}

fn ground_for(height: u32) -> f32 {
    height as f32 - GROUND_OFFSET
}

//=== Drawing =============================================================

const SKY_TOP: Color = Color::rgb(0x87, 0xce, 0xeb);
const SKY_BOTTOM: Color = Color::rgb(0xe0, 0xf7, 0xfa);
const MOUNTAIN: Color = Color::rgb(0x6c, 0x5c, 0xe7);
const CLOUD: Color = Color::rgba(255, 255, 255, 0xcc);
const GRASS: Color = Color::rgb(0x2e, 0xcc, 0x71);
const GRASS_EDGE: Color = Color::rgb(0x27, 0xae, 0x60);
const COAT: Color = Color::rgb(0xe6, 0x7e, 0x22);
const MANE: Color = Color::rgb(0xd3, 0x54, 0x00);
const ROCK: Color = Color::rgb(0x7f, 0x8c, 0x8d);
const ROCK_SHINE: Color = Color::rgb(0x95, 0xa5, 0xa6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gait {
    Stride,
    Gather,
    Leap,
}

fn draw_horse(surface: &mut Canvas, x: f32, y: f32, gait: Gait) {
    surface.save();
    surface.translate(x, y);
    surface.scale(0.8);

    surface.fill_ellipse(30.0, 30.0, 25.0, 15.0, COAT);
    surface.fill_triangle((45.0, 25.0), (65.0, 5.0), (75.0, 15.0), COAT);
    surface.fill_triangle((45.0, 25.0), (75.0, 15.0), (65.0, 30.0), COAT);
    surface.fill_triangle((50.0, 15.0), (60.0, 0.0), (65.0, 15.0), MANE);

    let legs = match gait {
        Gait::Stride => [(10.0, 60.0), (60.0, 60.0)],
        Gait::Gather => [(30.0, 60.0), (40.0, 60.0)],
        Gait::Leap => [(5.0, 50.0), (70.0, 45.0)],
    };
    surface.stroke_line(20.0, 40.0, legs[0].0, legs[0].1, 6.0, COAT);
    surface.stroke_line(50.0, 40.0, legs[1].0, legs[1].1, 6.0, COAT);
    surface.stroke_polyline(&[(5.0, 30.0), (-8.0, 28.0), (-15.0, 40.0)], 6.0, MANE);

    surface.restore();
}

fn draw_hurdle(surface: &mut Canvas, hurdle: &Hurdle) {
    let (x, y) = (hurdle.x, hurdle.y);
    match hurdle.kind {
        HurdleKind::Rock => {
            surface.fill_triangle((x, y + 40.0), (x + 30.0, y), (x + 50.0, y + 40.0), ROCK);
            surface.fill_triangle((x, y + 40.0), (x + 10.0, y + 10.0), (x + 30.0, y), ROCK);
            surface.fill_triangle((x + 10.0, y + 15.0), (x + 15.0, y + 15.0), (x + 12.0, y + 30.0), ROCK_SHINE);
        }
        HurdleKind::Bush => {
            surface.fill_circle(x + 15.0, y + 30.0, 15.0, GRASS_EDGE);
            surface.fill_circle(x + 35.0, y + 30.0, 15.0, GRASS_EDGE);
            surface.fill_circle(x + 25.0, y + 15.0, 18.0, GRASS_EDGE);
        }
    }
}

//=== HorseRunnerScene ====================================================

pub struct HorseRunnerScene {
    input: SceneInput,
    game: HorseGame,
    size: (u32, u32),
}

impl HorseRunnerScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            input: SceneInput::new(),
            game: HorseGame::new(rng, 1, 1),
            size: (1, 1),
        }
    }

    fn back_rect(&self) -> Rect {
        ui::back_button_rect(self.size.0)
    }

    /// Jump while running, restart once the cooldown is over.
    fn press(&mut self) {
        if self.game.is_running() {
            self.game.jump();
        } else if self.game.can_restart() {
            info!(target: "scene", "Horse runner restarted");
            self.game.restart();
        }
    }

    /// Returns `true` if the scene should leave.
    fn on_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(KeyCode::Space | KeyCode::ArrowUp) => self.press(),
            InputEvent::KeyDown(_) => {
                if self.game.can_restart() {
                    self.game.restart();
                }
            }
            InputEvent::MouseDown { x, y, .. } | InputEvent::TouchStart { x, y } => {
                if !self.back_rect().contains(x, y) {
                    self.press();
                }
            }
            InputEvent::PointerUp { x, y } => return self.back_rect().contains(x, y),
            _ => {}
        }
        false
    }
}

impl Default for HorseRunnerScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for HorseRunnerScene {
    fn name(&self) -> &'static str {
        "horse_runner"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.input.attach(
            ctx,
            &[EventKind::KeyDown, EventKind::MouseDown, EventKind::TouchStart, EventKind::PointerUp],
        );
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, delta_ms: f64) {
        for event in self.input.drain() {
            if self.on_event(event) {
                ctx.switch_to(SceneId::GameMenu);
                return;
            }
        }

        if self.game.advance(delta_ms) {
            let points = self.game.points();
            info!(target: "scene", "Horse crashed at {}", points);
            if let Err(e) = ctx.state.record_high_score(HIGH_SCORE_KEY, points) {
                warn!(target: "state", "Could not save horse high score: {}", e);
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, state: &AppState) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        let game = &self.game;
        ui::vertical_gradient(surface, SKY_TOP, SKY_BOTTOM);

        let base = h - 80.0;
        for m in &game.mountains {
            surface.fill_triangle((m.x, base), (m.x + 100.0, base - m.height), (m.x + 200.0, base), MOUNTAIN);
        }
        for c in &game.clouds {
            surface.fill_circle(c.x, c.y, c.size, CLOUD);
            surface.fill_circle(c.x + c.size * 0.8, c.y + c.size * 0.2, c.size * 0.7, CLOUD);
            surface.fill_circle(c.x - c.size * 0.8, c.y + c.size * 0.2, c.size * 0.7, CLOUD);
        }

        let grass = game.ground_y() + 40.0;
        surface.fill_rect(0.0, grass, w, h - grass, GRASS);
        surface.fill_rect(0.0, grass, w, 10.0, GRASS_EDGE);

        let gait = if !game.is_running() || !game.horse.is_grounded() {
            Gait::Leap
        } else if (game.steps / 5) % 2 == 0 {
            Gait::Stride
        } else {
            Gait::Gather
        };
        draw_horse(surface, HORSE_X, game.horse.y(), gait);
        for hurdle in game.hurdles() {
            draw_hurdle(surface, hurdle);
        }

        let best = state.high_score(HIGH_SCORE_KEY).max(game.points());
        surface.fill_text(&format!("Score: {}", game.points()), 20.0, 30.0, 30.0, Color::WHITE);
        surface.fill_text(&format!("High: {}", best), 20.0, 70.0, 20.0, Color::WHITE);

        if !game.is_running() {
            surface.fill_rect(0.0, 0.0, w, h, Color::rgba(0, 0, 0, 0x80));
            ui::title(surface, "GAME OVER", h / 2.0 - 20.0, 40.0, Color::WHITE);
            ui::title(surface, "Tap to Run Again", h / 2.0 + 30.0, 24.0, Color::WHITE);
        }

        let back = ui::back_button(self.size.0, ());
        ui::draw_button(surface, &back);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.game.resize(width, height);
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

    fn game() -> HorseGame {
        HorseGame::new(StdRng::seed_from_u64(5), 1000, 700)
    }

    fn place(game: &mut HorseGame, kind: HurdleKind, x: f32) {
        let y = game.ground_y() + HURDLE_DROP;
        game.hurdles.push(Hurdle { kind, x, y });
    }

    #[test]
    fn score_and_speed_grow_every_step() {
        let mut game = game();
        for _ in 0..80 {
            assert!(!game.step());
        }
        assert_eq!(game.score(), 80);
        assert_eq!(game.points(), 8);
        assert!((game.speed() - (START_SPEED + 80.0 * SPEED_GAIN)).abs() < 1e-3);
    }

    #[test]
    fn frames_are_cut_into_fixed_steps() {
        let mut game = game();
        game.advance(8.0);
        assert_eq!(game.score(), 0);
        game.advance(8.0);
        assert_eq!(game.score(), 1);
        game.advance(40.0);
        assert_eq!(game.score(), 3);
    }

    #[test]
    fn spawns_come_every_90_to_140_steps() {
        let mut game = game();
        let mut last = 0;
        let mut gaps = Vec::new();
        for step in 1..=5000u32 {
            game.step();
            if !game.hurdles.is_empty() {
                gaps.push(step - last);
                last = step;
                game.hurdles.clear();
            }
        }
        assert!(gaps.len() > 30);
        for gap in gaps {
            assert!((91..=141).contains(&gap), "gap of {} steps", gap);
        }
    }

    #[test]
    fn hitting_a_hurdle_stops_the_run() {
        let mut game = game();
        place(&mut game, HurdleKind::Rock, HORSE_X);
        assert!(game.step());
        assert!(!game.is_running());

        let score = game.score();
        game.step();
        assert_eq!(game.score(), score);
        assert!(!game.jump());
    }

    #[test]
    fn a_timely_jump_clears_a_hurdle() {
        let mut game = game();
        place(&mut game, HurdleKind::Bush, 170.0);
        assert!(game.jump());
        for _ in 0..60 {
            assert!(!game.step());
        }
        assert!(game.is_running());
    }

    #[test]
    fn restart_waits_for_the_cooldown() {
        let mut game = game();
        place(&mut game, HurdleKind::Rock, HORSE_X);
        game.step();

        for _ in 0..RESTART_COOLDOWN {
            game.step();
            assert!(!game.can_restart());
        }
        game.step();
        assert!(game.can_restart());

        game.restart();
        assert!(game.is_running());
        assert_eq!(game.score(), 0);
        assert!(game.hurdles().is_empty());
        assert_eq!(game.speed(), START_SPEED);
    }

    #[test]
    fn presses_restart_only_after_the_cooldown() {
        let mut scene = HorseRunnerScene::with_rng(StdRng::seed_from_u64(8));
        scene.resize(WIDTH, HEIGHT);
        place(&mut scene.game, HurdleKind::Rock, HORSE_X);
        scene.game.step();

        scene.on_event(InputEvent::TouchStart { x: 300.0, y: 300.0 });
        assert!(!scene.game.is_running());

        scene.game.advance(400.0);
        scene.on_event(InputEvent::KeyDown(KeyCode::KeyR));
        assert!(scene.game.is_running());
    }

    #[test]
    fn scenery_fills_the_width() {
        let mut game = game();
        game.resize(1600, 900);
        assert_eq!(game.clouds.len(), CLOUDS);
        let last = game.mountains.last().map(|m| m.x).unwrap_or(0.0);
        assert!(last >= 1600.0 - 2.0 * OFFSCREEN - 180.0);
        assert_eq!(game.ground_y(), 780.0);
    }

    #[test]
    fn crash_records_the_high_score() {
        let mut h = Harness::start(SceneId::HorseRunner);
        let mut scene = HorseRunnerScene::with_rng(StdRng::seed_from_u64(3));
        scene.resize(WIDTH, HEIGHT);
        scene.game.score = 249;
        place(&mut scene.game, HurdleKind::Rock, HORSE_X);
        h.host.activate(Box::new(scene), &mut h.state).unwrap();

        h.tick();
        assert_eq!(h.state.high_score(HIGH_SCORE_KEY), 25);
    }

    #[test]
    fn back_returns_to_the_menu() {
        let mut h = Harness::start(SceneId::HorseRunner);
        let (cx, cy) = ui::back_button_rect(WIDTH).center();
        h.send(InputEvent::MouseDown { x: cx, y: cy, button: crate::core::input::MouseButton::Left });
        h.tap(cx, cy);
        assert_eq!(h.active(), Some(SceneId::GameMenu));
    }
}
