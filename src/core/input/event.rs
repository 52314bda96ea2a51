//=========================================================================
// Input Event Types
//
// Platform-neutral representation of the inputs scenes react to.
//
// The platform layer (winit) translates its native events into these;
// the `InputRouter` fans them out to scene listeners. Positions are in
// display pixels when produced and in surface pixels once routed.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputRouter (scales + filters by EventKind)
//         ↓
//    Listener (drained by the scene in update)
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,

    /// Side, thumb and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Any key the platform layer does not map.
    Unidentified,
}

impl KeyCode {
    /// Character this key types in a name field, if any.
    ///
    /// Letters come out uppercase; the built-in font has no lowercase.
    pub fn to_char(self) -> Option<char> {
        use KeyCode::*;
        let c = match self {
            Digit0 => '0', Digit1 => '1', Digit2 => '2', Digit3 => '3', Digit4 => '4',
            Digit5 => '5', Digit6 => '6', Digit7 => '7', Digit8 => '8', Digit9 => '9',
            KeyA => 'A', KeyB => 'B', KeyC => 'C', KeyD => 'D', KeyE => 'E', KeyF => 'F',
            KeyG => 'G', KeyH => 'H', KeyI => 'I', KeyJ => 'J', KeyK => 'K', KeyL => 'L',
            KeyM => 'M', KeyN => 'N', KeyO => 'O', KeyP => 'P', KeyQ => 'Q', KeyR => 'R',
            KeyS => 'S', KeyT => 'T', KeyU => 'U', KeyV => 'V', KeyW => 'W', KeyX => 'X',
            KeyY => 'Y', KeyZ => 'Z',
            Space => ' ',
            _ => return None,
        };
        Some(c)
    }
}

//=== EventKind ===========================================================

/// Discriminant of an [`InputEvent`]; listeners subscribe by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
    PointerUp,
}

impl EventKind {
    /// Every pointer-ish kind a drag gesture needs.
    pub const DRAG: [EventKind; 6] = [
        EventKind::MouseDown,
        EventKind::MouseMove,
        EventKind::MouseUp,
        EventKind::TouchStart,
        EventKind::TouchMove,
        EventKind::TouchEnd,
    ];
}

//=== InputEvent ==========================================================

/// Input delivered to scenes.
///
/// `PointerUp` is emitted alongside `MouseUp` and `TouchEnd`, for scenes
/// that only care about "something was tapped here".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown { x: f32, y: f32, button: MouseButton },
    MouseMove { x: f32, y: f32 },
    MouseUp { x: f32, y: f32, button: MouseButton },
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::MouseDown { .. } => EventKind::MouseDown,
            InputEvent::MouseMove { .. } => EventKind::MouseMove,
            InputEvent::MouseUp { .. } => EventKind::MouseUp,
            InputEvent::TouchStart { .. } => EventKind::TouchStart,
            InputEvent::TouchMove { .. } => EventKind::TouchMove,
            InputEvent::TouchEnd { .. } => EventKind::TouchEnd,
            InputEvent::PointerUp { .. } => EventKind::PointerUp,
        }
    }

    /// Pointer position, for every event that has one.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => None,
            InputEvent::MouseDown { x, y, .. }
            | InputEvent::MouseMove { x, y }
            | InputEvent::MouseUp { x, y, .. }
            | InputEvent::TouchStart { x, y }
            | InputEvent::TouchMove { x, y }
            | InputEvent::TouchEnd { x, y }
            | InputEvent::PointerUp { x, y } => Some((x, y)),
        }
    }

    /// Same event with its position passed through `f`.
    pub fn map_position(self, f: impl Fn(f32, f32) -> (f32, f32)) -> InputEvent {
        match self {
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => self,
            InputEvent::MouseDown { x, y, button } => {
                let (x, y) = f(x, y);
                InputEvent::MouseDown { x, y, button }
            }
            InputEvent::MouseMove { x, y } => {
                let (x, y) = f(x, y);
                InputEvent::MouseMove { x, y }
            }
            InputEvent::MouseUp { x, y, button } => {
                let (x, y) = f(x, y);
                InputEvent::MouseUp { x, y, button }
            }
            InputEvent::TouchStart { x, y } => {
                let (x, y) = f(x, y);
                InputEvent::TouchStart { x, y }
            }
            InputEvent::TouchMove { x, y } => {
                let (x, y) = f(x, y);
                InputEvent::TouchMove { x, y }
            }
            InputEvent::TouchEnd { x, y } => {
                let (x, y) = f(x, y);
                InputEvent::TouchEnd { x, y }
            }
            InputEvent::PointerUp { x, y } => {
                let (x, y) = f(x, y);
                InputEvent::PointerUp { x, y }
            }
        }
    }

    /// `true` for pointer-move events, which the platform may coalesce.
    pub fn is_motion(&self) -> bool {
        matches!(self, InputEvent::MouseMove { .. } | InputEvent::TouchMove { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(InputEvent::KeyDown(KeyCode::Space).kind(), EventKind::KeyDown);
        assert_eq!(InputEvent::PointerUp { x: 0.0, y: 0.0 }.kind(), EventKind::PointerUp);
        assert_eq!(InputEvent::TouchMove { x: 0.0, y: 0.0 }.kind(), EventKind::TouchMove);
    }

    #[test]
    fn keys_have_no_position() {
        assert_eq!(InputEvent::KeyUp(KeyCode::Enter).position(), None);
        assert_eq!(
            InputEvent::MouseUp { x: 3.0, y: 4.0, button: MouseButton::Left }.position(),
            Some((3.0, 4.0))
        );
    }

    #[test]
    fn map_position_keeps_payload() {
        let event = InputEvent::MouseDown { x: 10.0, y: 20.0, button: MouseButton::Right };
        let mapped = event.map_position(|x, y| (x / 2.0, y / 2.0));

        assert_eq!(mapped, InputEvent::MouseDown { x: 5.0, y: 10.0, button: MouseButton::Right });
        assert_eq!(
            InputEvent::KeyDown(KeyCode::KeyA).map_position(|_, _| (1.0, 1.0)),
            InputEvent::KeyDown(KeyCode::KeyA)
        );
    }

    #[test]
    fn only_moves_are_motion() {
        assert!(InputEvent::MouseMove { x: 0.0, y: 0.0 }.is_motion());
        assert!(InputEvent::TouchMove { x: 0.0, y: 0.0 }.is_motion());
        assert!(!InputEvent::TouchStart { x: 0.0, y: 0.0 }.is_motion());
    }

    #[test]
    fn typed_characters() {
        assert_eq!(KeyCode::KeyQ.to_char(), Some('Q'));
        assert_eq!(KeyCode::Digit7.to_char(), Some('7'));
        assert_eq!(KeyCode::Space.to_char(), Some(' '));
        assert_eq!(KeyCode::Enter.to_char(), None);
    }
}
