//=========================================================================
// Crystal Maze
//=========================================================================
//
// Walk the hero from the start tile to the exit through three fixed
// mazes. Arrow keys step one tile; dragging the hero onto a neighbouring
// tile steps too. Steps are rate limited to one per 100 ms. Reaching the
// exit loads the next maze; finishing the last one returns to the menu.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::ui::{self, SceneInput};
use super::SceneId;
use crate::core::input::{EventKind, InputEvent, KeyCode, Rect};
use crate::core::scene::{Scene, SceneContext, SceneError};
use crate::core::state::AppState;
use crate::gfx::character::draw_character;
use crate::gfx::{Canvas, Color};

//=== Levels ==============================================================

pub const MOVE_INTERVAL_MS: f64 = 100.0;
const TILE: f32 = 40.0;
/// Slack around the hero's tile when starting a drag.
const GRAB_SLACK: f32 = 10.0;

// `#` wall, `.` path, `S` start, `E` exit.
const LEVELS: [&str; 3] = [
    "\
############
#S..#......#
###.#.####.#
#......#...#
#.####.###.#
#...#...#E.#
############",
    "\
#############
#S....#.....#
#####.#.###.#
#...#.#...#.#
#.#.#...#.#.#
#.#.......#.#
#.........#E#
#############",
    "\
###############
#S.#..........#
#.##.##.#####.#
#....#......#.#
####.######.#.#
#.........#.#.#
#.#######.#.#.#
#...#.......#E#
###############",
];

//=== Maze ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Path,
    Exit,
}

/// Result of one attempted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    Blocked,
    ReachedExit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    tiles: Vec<Vec<Tile>>,
    start: (i32, i32),
    player: (i32, i32),
}

impl Maze {
    /// Parses a level drawn in text. A level without `S` starts at (1, 1).
    pub fn parse(text: &str) -> Self {
        let mut start = (1, 1);
        let tiles = text
            .lines()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, c)| match c {
                        '#' => Tile::Wall,
                        'E' => Tile::Exit,
                        'S' => {
                            start = (col as i32, row as i32);
                            Tile::Path
                        }
                        _ => Tile::Path,
                    })
                    .collect()
            })
            .collect();
        Self { tiles, start, player: start }
    }

    pub fn level(index: usize) -> Option<Self> {
        LEVELS.get(index).map(|text| Self::parse(text))
    }

    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, col: i32, row: i32) -> Option<Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        self.tiles.get(row as usize)?.get(col as usize).copied()
    }

    pub fn player(&self) -> (i32, i32) {
        self.player
    }

    pub fn start(&self) -> (i32, i32) {
        self.start
    }

    /// Off-grid and wall tiles refuse the step.
    pub fn step(&mut self, dx: i32, dy: i32) -> Step {
        let target = (self.player.0 + dx, self.player.1 + dy);
        match self.tile(target.0, target.1) {
            None | Some(Tile::Wall) => Step::Blocked,
            Some(Tile::Path) => {
                self.player = target;
                Step::Moved
            }
            Some(Tile::Exit) => {
                self.player = target;
                Step::ReachedExit
            }
        }
    }
}

fn arrow(key: KeyCode) -> Option<(i32, i32)> {
    match key {
        KeyCode::ArrowUp => Some((0, -1)),
        KeyCode::ArrowDown => Some((0, 1)),
        KeyCode::ArrowLeft => Some((-1, 0)),
        KeyCode::ArrowRight => Some((1, 0)),
        _ => None,
    }
}

//=== MazeScene ===========================================================

pub struct MazeScene {
    input: SceneInput,
    level: usize,
    maze: Maze,
    dragging: bool,
    clock_ms: f64,
    last_move_ms: Option<f64>,
    size: (u32, u32),
    back: Rect,
}

impl MazeScene {
    pub fn new() -> Self {
        Self {
            input: SceneInput::new(),
            level: 0,
            maze: Maze::parse(LEVELS[0]),
            dragging: false,
            clock_ms: 0.0,
            last_move_ms: None,
            size: (1, 1),
            back: ui::back_button_rect(1),
        }
    }

    /// Top-left corner of the centred maze.
    fn origin(&self) -> (f32, f32) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        (
            (w - self.maze.width() as f32 * TILE) / 2.0,
            (h - self.maze.height() as f32 * TILE) / 2.0,
        )
    }

    fn tile_at(&self, x: f32, y: f32) -> (i32, i32) {
        let (ox, oy) = self.origin();
        (((x - ox) / TILE).floor() as i32, ((y - oy) / TILE).floor() as i32)
    }

    fn hero_rect(&self) -> Rect {
        let (ox, oy) = self.origin();
        let (col, row) = self.maze.player();
        Rect::new(ox + col as f32 * TILE, oy + row as f32 * TILE, TILE, TILE)
    }

    /// Steps unless the last step was under `MOVE_INTERVAL_MS` ago.
    fn try_move(&mut self, dx: i32, dy: i32) -> Option<Step> {
        if let Some(last) = self.last_move_ms {
            if self.clock_ms - last < MOVE_INTERVAL_MS {
                return None;
            }
        }
        let step = self.maze.step(dx, dy);
        if step != Step::Blocked {
            self.last_move_ms = Some(self.clock_ms);
        }
        Some(step)
    }

    /// Loads the next maze; `false` once there are none left.
    fn next_level(&mut self) -> bool {
        self.level += 1;
        self.dragging = false;
        match Maze::level(self.level) {
            Some(maze) => {
                info!(target: "scene", "Maze level {}", self.level + 1);
                self.maze = maze;
                true
            }
            None => {
                info!(target: "scene", "Every maze solved");
                false
            }
        }
    }

    fn step_or_advance(&mut self, ctx: &mut SceneContext<SceneId>, dx: i32, dy: i32) {
        if self.try_move(dx, dy) == Some(Step::ReachedExit) && !self.next_level() {
            ctx.switch_to(SceneId::GameMenu);
        }
    }

    /// `true` if the press landed on the back button.
    fn press(&mut self, x: f32, y: f32) -> bool {
        if self.back.contains(x, y) {
            return true;
        }
        if self.hero_rect().inset(-GRAB_SLACK).contains(x, y) {
            debug!(target: "scene", "Grabbed hero");
            self.dragging = true;
        }
        false
    }

    /// Neighbouring tile under a drag, as a step.
    fn drag_step(&self, x: f32, y: f32) -> Option<(i32, i32)> {
        if !self.dragging {
            return None;
        }
        let (col, row) = self.tile_at(x, y);
        let (pc, pr) = self.maze.player();
        let (dx, dy) = (col - pc, row - pr);
        (dx.abs() + dy.abs() == 1).then_some((dx, dy))
    }
}

impl Default for MazeScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId> for MazeScene {
    fn name(&self) -> &'static str {
        "maze"
    }

    fn init(&mut self, ctx: &mut SceneContext<SceneId>) -> Result<(), SceneError> {
        let mut kinds = EventKind::DRAG.to_vec();
        kinds.push(EventKind::KeyDown);
        self.input.attach(ctx, &kinds);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<SceneId>, delta_ms: f64) {
        self.clock_ms += delta_ms;
        let level = self.level;

        for event in self.input.drain() {
            match event {
                InputEvent::KeyDown(key) => {
                    if let Some((dx, dy)) = arrow(key) {
                        self.step_or_advance(ctx, dx, dy);
                    }
                }
                InputEvent::MouseDown { x, y, .. } | InputEvent::TouchStart { x, y } => {
                    if self.press(x, y) {
                        ctx.switch_to(SceneId::GameMenu);
                        return;
                    }
                }
                InputEvent::MouseMove { x, y } | InputEvent::TouchMove { x, y } => {
                    if let Some((dx, dy)) = self.drag_step(x, y) {
                        self.step_or_advance(ctx, dx, dy);
                    }
                }
                InputEvent::MouseUp { .. } | InputEvent::TouchEnd { .. } => self.dragging = false,
                _ => {}
            }
            // The rest of the batch was aimed at the old maze.
            if self.level != level {
                return;
            }
        }
    }

    fn draw(&self, surface: &mut Canvas, state: &AppState) {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        surface.fill_rect(0.0, 0.0, w, h, Color::rgb(0x2c, 0x3e, 0x50));

        let (ox, oy) = self.origin();
        for row in 0..self.maze.height() as i32 {
            for col in 0..self.maze.width() as i32 {
                let (x, y) = (ox + col as f32 * TILE, oy + row as f32 * TILE);
                match self.maze.tile(col, row) {
                    Some(Tile::Wall) => surface.fill_rect(x, y, TILE, TILE, Color::rgb(0x34, 0x49, 0x5e)),
                    Some(Tile::Exit) => {
                        surface.fill_rect(x, y, TILE, TILE, Color::rgb(0xec, 0xf0, 0xf1));
                        surface.fill_rect(x + 10.0, y + 10.0, TILE - 20.0, TILE - 20.0, Color::rgb(0xe7, 0x4c, 0x3c));
                    }
                    Some(Tile::Path) => surface.fill_rect(x, y, TILE, TILE, Color::rgb(0xec, 0xf0, 0xf1)),
                    None => {}
                }
            }
        }

        let (cx, cy) = self.hero_rect().center();
        if self.dragging {
            surface.fill_circle(cx, cy, 30.0, Color::rgba(0xff, 0xea, 0xa7, 0x66));
        }
        draw_character(surface, cx, cy, 0.4, &state.profile().appearance);

        surface.fill_text(&format!("Level {}", self.level + 1), 20.0, 30.0, 20.0, Color::WHITE);
        surface.fill_text("Drag the hero to move!", 20.0, 60.0, 20.0, Color::WHITE);

        surface.fill_rect(self.back.x, self.back.y, self.back.w, self.back.h, ui::BACK_GREY);
        let (bx, by) = self.back.center();
        surface.fill_text_centered("Back", bx, by, 20.0, Color::WHITE);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.back = ui::back_button_rect(width);
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
    use crate::core::input::MouseButton;
    use crate::games::harness::{Harness, HEIGHT, WIDTH};
    use std::collections::{HashMap, VecDeque};

    /// Shortest list of steps from the start to the exit.
    fn solve(maze: &Maze) -> Vec<(i32, i32)> {
        let start = maze.start();
        let mut came_from = HashMap::new();
        let mut queue = VecDeque::from([start]);
        came_from.insert(start, start);

        while let Some(at) = queue.pop_front() {
            if maze.tile(at.0, at.1) == Some(Tile::Exit) {
                let mut steps = Vec::new();
                let mut cur = at;
                while cur != start {
                    let prev = came_from[&cur];
                    steps.push((cur.0 - prev.0, cur.1 - prev.1));
                    cur = prev;
                }
                steps.reverse();
                return steps;
            }
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let next = (at.0 + dx, at.1 + dy);
                let open = matches!(maze.tile(next.0, next.1), Some(Tile::Path | Tile::Exit));
                if open && !came_from.contains_key(&next) {
                    came_from.insert(next, at);
                    queue.push_back(next);
                }
            }
        }
        Vec::new()
    }

    fn key_for(step: (i32, i32)) -> KeyCode {
        match step {
            (0, -1) => KeyCode::ArrowUp,
            (0, 1) => KeyCode::ArrowDown,
            (-1, 0) => KeyCode::ArrowLeft,
            _ => KeyCode::ArrowRight,
        }
    }

    #[test]
    fn every_level_is_solvable_and_rectangular() {
        for index in 0..LEVELS.len() {
            let maze = Maze::level(index).unwrap();
            assert!(!solve(&maze).is_empty(), "level {} has no way out", index + 1);
            assert!(maze.tiles.iter().all(|row| row.len() == maze.width()));
            assert_eq!(maze.start(), (1, 1));
        }
        assert!(Maze::level(LEVELS.len()).is_none());
    }

    #[test]
    fn walls_and_edges_block() {
        let mut maze = Maze::parse("###\n#S#\n#E#");
        assert_eq!(maze.step(0, -1), Step::Blocked);
        assert_eq!(maze.step(1, 0), Step::Blocked);
        assert_eq!(maze.player(), (1, 1));
        assert_eq!(maze.step(0, 1), Step::ReachedExit);
        assert_eq!(maze.step(0, 1), Step::Blocked);
    }

    #[test]
    fn moves_are_rate_limited() {
        let mut scene = MazeScene::new();
        assert_eq!(scene.try_move(1, 0), Some(Step::Moved));
        assert_eq!(scene.try_move(1, 0), None);

        scene.clock_ms += MOVE_INTERVAL_MS - 1.0;
        assert_eq!(scene.try_move(1, 0), None);
        scene.clock_ms += 1.0;
        assert_eq!(scene.try_move(1, 0), Some(Step::Moved));
        assert_eq!(scene.maze.player(), (3, 1));
    }

    #[test]
    fn bumping_a_wall_does_not_use_up_the_move() {
        let mut scene = MazeScene::new();
        assert_eq!(scene.try_move(0, -1), Some(Step::Blocked));
        assert_eq!(scene.try_move(1, 0), Some(Step::Moved));
    }

    #[test]
    fn exits_advance_through_every_level() {
        let mut scene = MazeScene::new();
        assert!(scene.next_level());
        assert_eq!(scene.maze, Maze::level(1).unwrap());
        assert!(scene.next_level());
        assert!(!scene.next_level());
    }

    #[test]
    fn solving_every_level_returns_to_the_menu() {
        let mut h = Harness::start(SceneId::Maze);
        for index in 0..LEVELS.len() {
            for step in solve(&Maze::level(index).unwrap()) {
                h.send(InputEvent::KeyDown(key_for(step)));
                h.run_for(MOVE_INTERVAL_MS);
            }
        }
        h.tick();
        assert_eq!(h.active(), Some(SceneId::GameMenu));
    }

    #[test]
    fn dragging_needs_a_grab_and_a_neighbour() {
        let mut scene = MazeScene::new();
        scene.resize(WIDTH, HEIGHT);
        let (hx, hy) = scene.hero_rect().center();

        assert_eq!(scene.drag_step(hx + TILE, hy), None);
        assert!(!scene.press(hx + TILE / 2.0 + GRAB_SLACK - 1.0, hy));
        assert!(scene.dragging);

        assert_eq!(scene.drag_step(hx + TILE, hy), Some((1, 0)));
        assert_eq!(scene.drag_step(hx + TILE, hy + TILE), None);
        assert_eq!(scene.drag_step(hx, hy), None);
    }

    #[test]
    fn back_press_leaves() {
        let mut h = Harness::start(SceneId::Maze);
        let (bx, by) = ui::back_button_rect(WIDTH).center();
        h.send(InputEvent::MouseDown { x: bx, y: by, button: MouseButton::Left });
        h.tick();
        assert_eq!(h.active(), Some(SceneId::GameMenu));
    }
}
