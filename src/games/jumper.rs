//=========================================================================
// Jump Physics
//=========================================================================
//
// Vertical motion shared by both runners. Units are pixels per frame,
// where a frame is 16 ms; callers pass elapsed frames so motion does
// not depend on the display's refresh rate.
//
//=========================================================================

/// Milliseconds in one nominal frame.
pub const FRAME_MS: f64 = 16.0;

/// Nominal frames covered by `delta_ms`.
pub fn frames(delta_ms: f64) -> f32 {
    (delta_ms / FRAME_MS) as f32
}

//=== JumpPhysics =========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpPhysics {
    pub gravity: f32,
    /// Upward velocity of a jump from the ground; negative is up.
    pub jump_velocity: f32,
    /// Share of `jump_velocity` an air jump gets, if one is allowed.
    pub air_jump: Option<f32>,
}

//=== Jumper ==============================================================

#[derive(Debug, Clone)]
pub struct Jumper {
    physics: JumpPhysics,
    y: f32,
    vy: f32,
    ground_y: f32,
    grounded: bool,
    air_jump_ready: bool,
}

impl Jumper {
    /// A jumper standing on `ground_y`.
    pub fn new(physics: JumpPhysics, ground_y: f32) -> Self {
        Self {
            physics,
            y: ground_y,
            vy: 0.0,
            ground_y,
            grounded: true,
            air_jump_ready: false,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> f32 {
        self.vy
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Moves the ground. A jumper standing on it moves along.
    pub fn set_ground(&mut self, ground_y: f32) {
        self.ground_y = ground_y;
        if self.grounded {
            self.y = ground_y;
        }
    }

    /// Back on the ground at rest.
    pub fn land(&mut self) {
        self.y = self.ground_y;
        self.vy = 0.0;
        self.grounded = true;
        self.air_jump_ready = false;
    }

    /// Starts a jump. Returns `false` if no jump is available.
    pub fn jump(&mut self) -> bool {
        if self.grounded {
            self.vy = self.physics.jump_velocity;
            self.grounded = false;
            self.air_jump_ready = self.physics.air_jump.is_some();
            return true;
        }
        match self.physics.air_jump {
            Some(share) if self.air_jump_ready => {
                self.vy = self.physics.jump_velocity * share;
                self.air_jump_ready = false;
                true
            }
            _ => false,
        }
    }

    /// Advances by `frames` nominal frames.
    pub fn step(&mut self, frames: f32) {
        self.vy += self.physics.gravity * frames;
        self.y += self.vy * frames;
        if self.y >= self.ground_y {
            self.land();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
