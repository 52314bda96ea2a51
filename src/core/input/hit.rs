//=========================================================================
// Hit Testing
//=========================================================================
//
// Rectangles and labelled buttons shared by every scene's pointer
// handling. A scene keeps a `ButtonSet` of its own action enum and asks
// it which action a tap landed on.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::gfx::Color;

//=== Rect ================================================================

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Strict overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Same rectangle shrunk by `by` on every side.
    pub fn inset(&self, by: f32) -> Rect {
        Rect::new(self.x + by, self.y + by, self.w - 2.0 * by, self.h - 2.0 * by)
    }
}

//=== Button ==============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Button<A> {
    pub rect: Rect,
    pub label: String,
    pub fill: Color,
    pub action: A,
}

impl<A> Button<A> {
    pub fn new(rect: Rect, label: impl Into<String>, fill: Color, action: A) -> Self {
        Self {
            rect,
            label: label.into(),
            fill,
            action,
        }
    }
}

//=== ButtonSet ===========================================================

/// Ordered hit regions; earlier buttons win overlaps.
#[derive(Debug, Clone)]
pub struct ButtonSet<A> {
    buttons: Vec<Button<A>>,
}

impl<A: Copy> ButtonSet<A> {
    pub fn new() -> Self {
        Self { buttons: Vec::new() }
    }

    pub fn push(&mut self, button: Button<A>) {
        self.buttons.push(button);
    }

    pub fn clear(&mut self) {
        self.buttons.clear();
    }

    /// Action of the first button containing `(x, y)`.
    pub fn hit(&self, x: f32, y: f32) -> Option<A> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(x, y))
            .map(|button| button.action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Button<A>> {
        self.buttons.iter()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

impl<A: Copy> Default for ButtonSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
