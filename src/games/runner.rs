//=========================================================================
// Adventure Runner
//=========================================================================
//
// Side-scrolling runner with a double jump. Friends and stars coming from
// the right add to the score, rocks cost one of three cheers. Spawns get
// more frequent and the world faster with every obstacle, up to a limit.
// Losing the last cheer records the high score and, after a short pause,
// returns to the room.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Internal Dependencies ===============================================

use super::jumper::{self, JumpPhysics, Jumper};
use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{EventKind, InputEvent, KeyCode, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::core::timer::TimerId;
use crate::gfx::{Canvas, Color};

//=== Tuning ==============================================================

pub const HIGH_SCORE_KEY: &str = "runner";

const PHYSICS: JumpPhysics = JumpPhysics {
    gravity: 0.8,
    jump_velocity: -15.0,
    air_jump: Some(0.8),
};

pub const START_CHEER: u32 = 3;
pub const START_SPEED: f32 = 5.0;
pub const MAX_SPEED: f32 = 10.0;
const SPEED_STEP: f32 = 0.02;

pub const START_SPAWN_INTERVAL_MS: f64 = 1500.0;
pub const MIN_SPAWN_INTERVAL_MS: f64 = 500.0;
const SPAWN_INTERVAL_STEP_MS: f64 = 10.0;

/// Pause between losing the last cheer and leaving for the room.
pub const RETURN_DELAY_MS: f64 = 1500.0;

const PLAYER_X: f32 = 100.0;
const PLAYER_SIZE: f32 = 50.0;
/// Distance from the bottom edge to the top of a standing player.
const GROUND_OFFSET: f32 = 150.0;
const SPAWN_MARGIN: f32 = 100.0;
const FLOAT_HEIGHT: f32 = 100.0;
const POINTS_PER_LEVEL: u32 = 500;

//=== Obstacles ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// A friend to high-five: +5.
    Friend,
    /// A rock: costs a cheer.
    Hazard,
    /// A star: +1.
    Collectible,
}

impl ObstacleKind {
    /// 30 % friends, 30 % hazards, 40 % collectibles.
    fn roll(rng: &mut StdRng) -> Self {
        let roll: f32 = rng.gen();
        if roll < 0.3 {
            ObstacleKind::Friend
        } else if roll < 0.6 {
            ObstacleKind::Hazard
        } else {
            ObstacleKind::Collectible
        }
    }

    fn size(self) -> (f32, f32) {
        match self {
            ObstacleKind::Friend => (40.0, 60.0),
            ObstacleKind::Hazard => (50.0, 30.0),
            ObstacleKind::Collectible => (30.0, 30.0),
        }
    }

    /// Vertical offset from the player's standing line.
    fn lift(self) -> f32 {
        match self {
            ObstacleKind::Friend => -10.0,
            ObstacleKind::Hazard => 20.0,
            ObstacleKind::Collectible => 0.0,
        }
    }

    fn color(self) -> Color {
        match self {
            ObstacleKind::Friend => Color::rgb(0xa1, 0x8c, 0xd1),
            ObstacleKind::Hazard => Color::rgb(0x7d, 0x7d, 0x7d),
            ObstacleKind::Collectible => Color::rgb(0xfe, 0xcf, 0xef),
        }
    }

    fn face(self) -> &'static str {
        match self {
            ObstacleKind::Friend => "^_^",
            ObstacleKind::Hazard => ">_<",
            ObstacleKind::Collectible => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
}

impl Obstacle {
    fn new(kind: ObstacleKind, x: f32, ground_y: f32, floating: bool) -> Self {
        let (w, h) = kind.size();
        let mut y = ground_y + kind.lift();
        if floating {
            y -= FLOAT_HEIGHT;
        }
        Self {
            kind,
            rect: Rect::new(x, y, w, h),
        }
    }
}

//=== RunnerGame ==========================================================

/// Simulation without input or drawing.
pub struct RunnerGame {
    rng: StdRng,
    player: Jumper,
    obstacles: Vec<Obstacle>,
    width: f32,
    score: u32,
    cheer: u32,
    speed: f32,
    spawn_elapsed_ms: f64,
    spawn_interval_ms: f64,
    running: bool,
}

impl RunnerGame {
    pub fn new(rng: StdRng, width: u32, height: u32) -> Self {
        Self {
            rng,
            player: Jumper::new(PHYSICS, ground_for(height)),
            obstacles: Vec::new(),
            width: width as f32,
            score: 0,
            cheer: START_CHEER,
            speed: START_SPEED,
            spawn_elapsed_ms: 0.0,
            spawn_interval_ms: START_SPAWN_INTERVAL_MS,
            running: true,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn cheer(&self) -> u32 {
        self.cheer
    }

    pub fn level(&self) -> u32 {
        self.score / POINTS_PER_LEVEL + 1
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn player_rect(&self) -> Rect {
        Rect::new(PLAYER_X, self.player.y(), PLAYER_SIZE, PLAYER_SIZE)
    }

    pub fn ground_y(&self) -> f32 {
        self.player.ground_y()
    }

    /// Keeps the player and everything on the track on the new ground.
    pub fn resize(&mut self, width: u32, height: u32) {
        let ground = ground_for(height);
        let shift = ground - self.player.ground_y();
        self.width = width as f32;
        self.player.set_ground(ground);
        for obstacle in &mut self.obstacles {
            obstacle.rect.y += shift;
        }
    }

    pub fn jump(&mut self) -> bool {
        self.running && self.player.jump()
    }

    /// Advances one frame. Returns `true` on the frame the run ends.
    pub fn update(&mut self, delta_ms: f64) -> bool {
        if !self.running {
            return false;
        }

        self.tick_spawner(delta_ms);

        let frames = jumper::frames(delta_ms);
        self.player.step(frames);

        let player = self.player_rect();
        let travel = self.speed * frames;
        let mut hits = Vec::new();
        self.obstacles.retain_mut(|obstacle| {
            obstacle.rect.x -= travel;
            if obstacle.rect.intersects(&player) {
                hits.push(obstacle.kind);
                return false;
            }
            obstacle.rect.x + obstacle.rect.w >= 0.0
        });

        for kind in hits {
            self.collect(kind);
        }

        if self.cheer == 0 {
            self.running = false;
            return true;
        }
        false
    }

    /// Spawns once the interval has passed, then tightens the pace.
    fn tick_spawner(&mut self, delta_ms: f64) -> bool {
        if self.spawn_elapsed_ms <= self.spawn_interval_ms {
            self.spawn_elapsed_ms += delta_ms;
            return false;
        }

        self.spawn();
        self.spawn_elapsed_ms = 0.0;
        if self.spawn_interval_ms > MIN_SPAWN_INTERVAL_MS {
            self.spawn_interval_ms -= SPAWN_INTERVAL_STEP_MS;
        }
        if self.speed < MAX_SPEED {
            self.speed += SPEED_STEP;
        }
        true
    }

    fn spawn(&mut self) {
        let kind = ObstacleKind::roll(&mut self.rng);
        let floating = kind == ObstacleKind::Collectible && self.rng.gen_bool(0.5);
        let x = self.width + SPAWN_MARGIN;
        self.obstacles.push(Obstacle::new(kind, x, self.player.ground_y(), floating));
    }

    fn collect(&mut self, kind: ObstacleKind) {
        match kind {
            ObstacleKind::Friend => self.score += 5,
            ObstacleKind::Collectible => self.score += 1,
            ObstacleKind::Hazard => self.cheer = self.cheer.saturating_sub(1),
        }
        debug!(target: "scene", "Runner hit {:?}: score {}, cheer {}", kind, self.score, self.cheer);
    }
}

fn ground_for(height: u32) -> f32 {
    height as f32 - GROUND_OFFSET
}

//=== Drawing =============================================================

const SKY_TOP: Color = Color::rgb(0xa1, 0xc4, 0xfd);
const SKY_BOTTOM: Color = Color::rgb(0xc2, 0xe9, 0xfb);
const GRASS: Color = Color::rgb(0x8d, 0xc6, 0x3f);
const GRASS_STRIPE: Color = Color::rgb(0x7d, 0xb5, 0x30);
const PLAYER: Color = Color::rgb(0xff, 0x9a, 0x9e);

fn draw_player(surface: &mut Canvas, r: Rect) {
    surface.fill_rect(r.x, r.y, r.w, r.h, PLAYER);
    surface.fill_circle(r.x + 15.0, r.y + 15.0, 5.0, Color::WHITE);
    surface.fill_circle(r.x + 35.0, r.y + 15.0, 5.0, Color::WHITE);
    surface.stroke_line(r.x + 17.0, r.y + 32.0, r.x + 33.0, r.y + 32.0, 2.0, Color::BLACK);
}

//=== RunnerScene =========================================================

pub struct RunnerScene {
    input: SceneInput,
    game: RunnerGame,
    held: HashSet<KeyCode>,
    return_timer: Option<TimerId>,
    size: (u32, u32),
}

impl RunnerScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            input: SceneInput::new(),
            game: RunnerGame::new(rng, 1, 1),
            held: HashSet::new(),
            return_timer: None,
            size: (1, 1),
        }
    }

    pub fn game(&self) -> &RunnerGame {
        &self.game
    }

    fn back_rect(&self) -> Rect {
        ui::back_button_rect(self.size.0)
    }

    /// Returns `true` if the scene should leave.
    fn on_event(&mut self, event: InputEvent) -> bool {
        match event {
            // Holding a key jumps once.
            InputEvent::KeyDown(key @ (KeyCode::Space | KeyCode::ArrowUp)) => {
                if self.held.insert(key) {
                    self.game.jump();
                }
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            InputEvent::MouseDown { x, y, .. } | InputEvent::TouchStart { x, y } => {
                if !self.back_rect().contains(x, y) {
                    self.game.jump();
                }
            }
            InputEvent::PointerUp { x, y } => return self.back_rect().contains(x, y),
            _ => {}
        }
        false
    }

    fn finish(&mut self, ctx: &mut SceneContext<SceneId>) {
        let score = self.game.score();
        info!(target: "scene", "Runner over with score {}", score);
        if let Err(e) = ctx.state.record_high_score(HIGH_SCORE_KEY, score) {
            warn!(target: "state", "Could not save runner high score: {}", e);
        }
        self.return_timer = Some(ctx.schedule(RETURN_DELAY_MS));
    }
}

impl Default for RunnerScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for RunnerScene {
    fn name(&self) -> &'static str {
        "runner"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        self.input.attach(
            ctx,
            &[
                EventKind::KeyDown,
                EventKind::KeyUp,
                EventKind::MouseDown,
                EventKind::TouchStart,
                EventKind::PointerUp,
            ],
        );
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, delta_ms: f64) {
        for event in self.input.drain() {
            if self.on_event(event) {
                ctx.switch_to(SceneId::Room);
                return;
            }
        }

        if self.game.update(delta_ms) {
            self.finish(ctx);
        }
    }

    fn on_timer(&mut self, ctx: &mut SceneContext<SceneId>, timer: TimerId) {
        if self.return_timer == Some(timer) {
            ctx.switch_to(SceneId::Room);
        }
    }

    fn draw(&self, surface: &mut Canvas, _state: &AppState) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        ui::vertical_gradient(surface, SKY_TOP, SKY_BOTTOM);

        let grass = self.game.ground_y() + PLAYER_SIZE;
        surface.fill_rect(0.0, grass, w, h - grass, GRASS);
        surface.fill_rect(0.0, grass, w, 10.0, GRASS_STRIPE);

        draw_player(surface, self.game.player_rect());
        for obstacle in self.game.obstacles() {
            let r = obstacle.rect;
            surface.fill_rect(r.x, r.y, r.w, r.h, obstacle.kind.color());
            surface.fill_text_centered(obstacle.kind.face(), r.x + r.w / 2.0, r.y + 14.0, 14.0, Color::WHITE);
        }

        surface.fill_text(&format!("Score: {}", self.game.score()), 20.0, 28.0, 24.0, Color::BLACK);
        surface.fill_text(&format!("Level: {}", self.game.level()), 20.0, 58.0, 24.0, Color::BLACK);
        surface.fill_text("Health:", 20.0, 88.0, 24.0, Color::BLACK);
        let hearts_x = 20.0 + Canvas::text_width("Health: ", 24.0);
        for i in 0..self.game.cheer() {
            surface.fill_circle(hearts_x + 14.0 + i as f32 * 30.0, 98.0, 11.0, Color::rgb(0xe7, 0x4c, 0x3c));
        }

        if !self.game.is_running() {
            surface.fill_rect(0.0, 0.0, w, h, Color::rgba(0, 0, 0, 0x80));
            ui::title(surface, "GAME OVER", h / 2.0 - 20.0, 40.0, Color::WHITE);
            let line = format!("Score: {}", self.game.score());
            ui::title(surface, &line, h / 2.0 + 30.0, 24.0, Color::WHITE);
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

    fn game() -> RunnerGame {
        RunnerGame::new(StdRng::seed_from_u64(9), 1000, 700)
    }

    /// Puts an obstacle of `kind` on the track at `x`.
    fn place(game: &mut RunnerGame, kind: ObstacleKind, x: f32, floating: bool) {
        let ground = game.ground_y();
        game.obstacles.push(Obstacle::new(kind, x, ground, floating));
    }

    #[test]
    fn first_spawn_waits_for_the_interval() {
        let mut game = game();
        for _ in 0..94 {
            game.update(16.0);
        }
        assert!(game.obstacles().is_empty());

        game.update(16.0);
        assert_eq!(game.obstacles().len(), 1);
        // Spawned just past the right edge, then moved one frame.
        assert!(game.obstacles()[0].rect.x > 1090.0);
        assert_eq!(game.spawn_interval_ms, START_SPAWN_INTERVAL_MS - 10.0);
        assert!((game.speed() - 5.02).abs() < 1e-4);
    }

    #[test]
    fn pace_is_capped() {
        let mut game = game();
        for _ in 0..1000 {
            game.tick_spawner(2000.0);
            game.obstacles.clear();
        }
        assert_eq!(game.spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
        assert!(game.speed() >= MAX_SPEED && game.speed() < MAX_SPEED + SPEED_STEP);
    }

    #[test]
    fn spawns_sit_on_the_ground() {
        let mut game = game();
        let ground = game.ground_y();
        for _ in 0..200 {
            game.spawn();
        }
        for obstacle in game.obstacles() {
            let r = obstacle.rect;
            match obstacle.kind {
                ObstacleKind::Friend => assert_eq!(r.y, ground - 10.0),
                ObstacleKind::Hazard => assert_eq!(r.y, ground + 20.0),
                ObstacleKind::Collectible => {
                    assert!(r.y == ground || r.y == ground - FLOAT_HEIGHT, "star at {}", r.y)
                }
            }
        }
        for kind in [ObstacleKind::Friend, ObstacleKind::Hazard, ObstacleKind::Collectible] {
            assert!(game.obstacles().iter().any(|o| o.kind == kind), "no {:?} in 200 spawns", kind);
        }
    }

    #[test]
    fn friends_and_stars_score() {
        let mut game = game();
        place(&mut game, ObstacleKind::Friend, PLAYER_X, false);
        assert!(!game.update(16.0));
        assert_eq!(game.score(), 5);
        assert!(game.obstacles().is_empty());

        place(&mut game, ObstacleKind::Collectible, PLAYER_X, false);
        game.update(16.0);
        assert_eq!(game.score(), 6);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn third_hazard_ends_the_run() {
        let mut game = game();
        for expected in [2, 1] {
            place(&mut game, ObstacleKind::Hazard, PLAYER_X, false);
            assert!(!game.update(16.0));
            assert_eq!(game.cheer(), expected);
        }

        place(&mut game, ObstacleKind::Hazard, PLAYER_X, false);
        assert!(game.update(16.0));
        assert!(!game.is_running());

        // Nothing moves once the run is over.
        place(&mut game, ObstacleKind::Friend, 500.0, false);
        assert!(!game.update(16.0));
        assert_eq!(game.obstacles().last().map(|o| o.rect.x), Some(500.0));
        assert!(!game.jump());
    }

    #[test]
    fn floating_stars_need_a_jump() {
        let mut game = game();
        place(&mut game, ObstacleKind::Collectible, PLAYER_X, true);
        game.update(16.0);
        assert_eq!(game.score(), 0);

        let mut game = self::game();
        place(&mut game, ObstacleKind::Collectible, 200.0, true);
        assert!(game.jump());
        for _ in 0..30 {
            game.update(16.0);
        }
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn obstacles_leave_off_the_left_edge() {
        let mut game = game();
        game.player.jump();
        place(&mut game, ObstacleKind::Hazard, -46.0, false);
        game.update(16.0);
        assert!(game.obstacles().is_empty());
        assert_eq!(game.cheer(), START_CHEER);
    }

    #[test]
    fn resize_moves_the_track() {
        let mut game = game();
        place(&mut game, ObstacleKind::Hazard, 600.0, false);
        game.resize(1000, 500);

        assert_eq!(game.ground_y(), 350.0);
        assert_eq!(game.player_rect().y, 350.0);
        assert_eq!(game.obstacles()[0].rect.y, 370.0);
    }

    #[test]
    fn held_keys_jump_once() {
        let mut scene = RunnerScene::with_rng(StdRng::seed_from_u64(1));
        scene.resize(WIDTH, HEIGHT);

        scene.on_event(InputEvent::KeyDown(KeyCode::Space));
        scene.game.update(16.0);
        let after_first = scene.game.player.velocity();

        // A repeat while held is no second jump.
        scene.on_event(InputEvent::KeyDown(KeyCode::Space));
        assert_eq!(scene.game.player.velocity(), after_first);

        scene.on_event(InputEvent::KeyUp(KeyCode::Space));
        scene.on_event(InputEvent::KeyDown(KeyCode::Space));
        assert!((scene.game.player.velocity() + 12.0).abs() < 1e-4);
    }

    #[test]
    fn pressing_back_does_not_jump() {
        let mut scene = RunnerScene::with_rng(StdRng::seed_from_u64(1));
        scene.resize(WIDTH, HEIGHT);
        let (cx, cy) = ui::back_button_rect(WIDTH).center();

        assert!(!scene.on_event(InputEvent::TouchStart { x: cx, y: cy }));
        assert!(scene.game.player.is_grounded());
        assert!(scene.on_event(InputEvent::PointerUp { x: cx, y: cy }));
    }

    #[test]
    fn game_over_records_the_score_and_returns_to_the_room() {
        let mut h = Harness::start(SceneId::Runner);
        let mut scene = RunnerScene::with_rng(StdRng::seed_from_u64(2));
        scene.resize(WIDTH, HEIGHT);
        scene.game.score = 42;
        scene.game.cheer = 1;
        place(&mut scene.game, ObstacleKind::Hazard, PLAYER_X, false);
        h.host.activate(Box::new(scene), &mut h.state).unwrap();

        h.tick();
        assert_eq!(h.state.high_score(HIGH_SCORE_KEY), 42);
        assert_eq!(h.host.active_name(), Some("runner"));

        h.run_for(RETURN_DELAY_MS - 100.0);
        assert_eq!(h.host.active_name(), Some("runner"));

        h.run_for(200.0);
        assert_eq!(h.active(), Some(SceneId::Room));
    }

    #[test]
    fn back_returns_to_the_room() {
        let mut h = Harness::start(SceneId::Runner);
        let (cx, cy) = ui::back_button_rect(WIDTH).center();
        h.tap(cx, cy);
        assert_eq!(h.active(), Some(SceneId::Room));
    }
}
