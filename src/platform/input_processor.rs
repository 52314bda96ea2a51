//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into playroom InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent → InputBuffer
//
// Stateful cursor tracking: winit reports button presses without a
// position, so the last `CursorMoved` location is cached and attached to
// mouse button events. Releases (mouse or touch) additionally emit a
// `PointerUp` at the same spot. Unmapped keys are filtered out.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, TouchPhase},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use super::input_buffer::InputBuffer;
use crate::core::input::{InputEvent, KeyCode, MouseButton};

//=== InputProcessor ======================================================

/// Converts Winit events to InputEvents with cursor tracking.
pub(crate) struct InputProcessor {
    cursor: (f32, f32),
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self { cursor: (0.0, 0.0) }
    }

    pub(crate) fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit KeyEvent (filters unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let key_code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key_code, KeyCode::Unidentified) {
            return None;
        }

        Some(Self::key_input_event(key_code, key_event.state))
    }

    /// Records the cursor and produces a move event (display space).
    pub(crate) fn process_cursor_moved(&mut self, x: f32, y: f32, out: &mut InputBuffer) {
        self.cursor = (x, y);
        out.push(InputEvent::MouseMove { x, y });
    }

    /// Converts a mouse button change at the cached cursor position.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
        out: &mut InputBuffer,
    ) {
        let (x, y) = self.cursor;
        let button = MouseButton::from(button);

        match state {
            ElementState::Pressed => out.push(InputEvent::MouseDown { x, y, button }),
            ElementState::Released => {
                out.push(InputEvent::MouseUp { x, y, button });
                out.push(InputEvent::PointerUp { x, y });
            }
        }
    }

    /// Converts one touch contact update.
    pub(crate) fn process_touch(&self, phase: TouchPhase, x: f32, y: f32, out: &mut InputBuffer) {
        match phase {
            TouchPhase::Started => out.push(InputEvent::TouchStart { x, y }),
            TouchPhase::Moved => out.push(InputEvent::TouchMove { x, y }),
            TouchPhase::Ended => {
                out.push(InputEvent::TouchEnd { x, y });
                out.push(InputEvent::PointerUp { x, y });
            }
            // A cancelled touch ends the gesture without counting as a tap.
            TouchPhase::Cancelled => out.push(InputEvent::TouchEnd { x, y }),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_input_event(key: KeyCode, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyDown(key),
            ElementState::Released => InputEvent::KeyUp(key),
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to playroom key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Everything else
/// returns `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            //--- Unmapped -----------------------------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn drained(buffer: &mut InputBuffer) -> Vec<InputEvent> {
        buffer.drain().collect()
    }

    #[test]
    fn starts_with_cursor_at_origin() {
        assert_eq!(InputProcessor::new().cursor(), (0.0, 0.0));
    }

    #[test]
    fn mouse_press_uses_last_cursor_position() {
        let mut processor = InputProcessor::new();
        let mut buffer = InputBuffer::new();

        processor.process_cursor_moved(40.0, 25.0, &mut buffer);
        processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed, &mut buffer);

        assert_eq!(
            drained(&mut buffer),
            vec![
                InputEvent::MouseMove { x: 40.0, y: 25.0 },
                InputEvent::MouseDown { x: 40.0, y: 25.0, button: MouseButton::Left },
            ]
        );
    }

    #[test]
    fn mouse_release_also_emits_pointer_up() {
        let mut processor = InputProcessor::new();
        let mut buffer = InputBuffer::new();
        processor.process_cursor_moved(7.0, 8.0, &mut buffer);
        buffer.clear();

        processor.process_mouse_button(WinitMouseButton::Right, ElementState::Released, &mut buffer);

        assert_eq!(
            drained(&mut buffer),
            vec![
                InputEvent::MouseUp { x: 7.0, y: 8.0, button: MouseButton::Right },
                InputEvent::PointerUp { x: 7.0, y: 8.0 },
            ]
        );
    }

    #[test]
    fn touch_lifecycle() {
        let processor = InputProcessor::new();
        let mut buffer = InputBuffer::new();

        processor.process_touch(TouchPhase::Started, 1.0, 2.0, &mut buffer);
        processor.process_touch(TouchPhase::Moved, 3.0, 4.0, &mut buffer);
        processor.process_touch(TouchPhase::Ended, 3.0, 4.0, &mut buffer);

        assert_eq!(
            drained(&mut buffer),
            vec![
                InputEvent::TouchStart { x: 1.0, y: 2.0 },
                InputEvent::TouchMove { x: 3.0, y: 4.0 },
                InputEvent::TouchEnd { x: 3.0, y: 4.0 },
                InputEvent::PointerUp { x: 3.0, y: 4.0 },
            ]
        );
    }

    #[test]
    fn cancelled_touch_is_not_a_tap() {
        let processor = InputProcessor::new();
        let mut buffer = InputBuffer::new();

        processor.process_touch(TouchPhase::Cancelled, 1.0, 1.0, &mut buffer);

        assert_eq!(drained(&mut buffer), vec![InputEvent::TouchEnd { x: 1.0, y: 1.0 }]);
    }

    #[test]
    fn key_events_map_state() {
        assert_eq!(
            InputProcessor::key_input_event(KeyCode::KeyS, ElementState::Pressed),
            InputEvent::KeyDown(KeyCode::KeyS)
        );
        assert_eq!(
            InputProcessor::key_input_event(KeyCode::Enter, ElementState::Released),
            InputEvent::KeyUp(KeyCode::Enter)
        );
    }

    #[test]
    fn keycode_conversion_filters_unidentified() {
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
    }

    #[test]
    fn keycode_conversion_letters_and_arrows() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowLeft), KeyCode::ArrowLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
