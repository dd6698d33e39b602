use cgmath::*;

/// An input or window event delivered by a `Document`.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    KeyDown(Key),
    KeyUp(Key),
    CharEntered(char),
    MouseDown(MouseButton, Point2<i32>),
    MouseUp(MouseButton, Point2<i32>),
    MouseMove {
        pos: Point2<i32>,
        movement: Vector2<i32>,
    },
    MouseEnter,
    MouseLeave,
    FocusGained,
    FocusLost,
    /// The framebuffer was resized; callers usually follow with a `viewport` call.
    Resized(Vector2<u32>),
    /// Vertical scroll direction: -1 or 1.
    Scroll(f64),
    /// The user asked to close the window.
    Close,
}

/// A key, named by its DOM `KeyboardEvent.code` value.
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    pub code: &'static str,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Key {
    pub fn is_modifier(&self) -> bool {
        matches!(
            self.code,
            "ShiftLeft"
                | "ShiftRight"
                | "ControlLeft"
                | "ControlRight"
                | "AltLeft"
                | "AltRight"
                | "MetaLeft"
                | "MetaRight"
        )
    }

    pub(crate) fn from_glfw(key: glfw::Key, modifiers: glfw::Modifiers) -> Option<Self> {
        Some(Self {
            code: dom_code(key)?,
            shift: modifiers.contains(glfw::Modifiers::Shift),
            ctrl: modifiers.contains(glfw::Modifiers::Control),
            alt: modifiers.contains(glfw::Modifiers::Alt),
            meta: modifiers.contains(glfw::Modifiers::Super),
        })
    }
}

/// Maps a GLFW key to the `code` a browser would report for the same physical key.
pub fn dom_code(key: glfw::Key) -> Option<&'static str> {
    use glfw::Key::*;
    let code = match key {
        Space => "Space",
        Apostrophe => "Quote",
        Comma => "Comma",
        Minus => "Minus",
        Period => "Period",
        Slash => "Slash",
        Num0 => "Digit0",
        Num1 => "Digit1",
        Num2 => "Digit2",
        Num3 => "Digit3",
        Num4 => "Digit4",
        Num5 => "Digit5",
        Num6 => "Digit6",
        Num7 => "Digit7",
        Num8 => "Digit8",
        Num9 => "Digit9",
        Semicolon => "Semicolon",
        Equal => "Equal",
        A => "KeyA",
        B => "KeyB",
        C => "KeyC",
        D => "KeyD",
        E => "KeyE",
        F => "KeyF",
        G => "KeyG",
        H => "KeyH",
        I => "KeyI",
        J => "KeyJ",
        K => "KeyK",
        L => "KeyL",
        M => "KeyM",
        N => "KeyN",
        O => "KeyO",
        P => "KeyP",
        Q => "KeyQ",
        R => "KeyR",
        S => "KeyS",
        T => "KeyT",
        U => "KeyU",
        V => "KeyV",
        W => "KeyW",
        X => "KeyX",
        Y => "KeyY",
        Z => "KeyZ",
        LeftBracket => "BracketLeft",
        Backslash => "Backslash",
        RightBracket => "BracketRight",
        GraveAccent => "Backquote",
        Escape => "Escape",
        Enter => "Enter",
        Tab => "Tab",
        Backspace => "Backspace",
        Insert => "Insert",
        Delete => "Delete",
        Right => "ArrowRight",
        Left => "ArrowLeft",
        Down => "ArrowDown",
        Up => "ArrowUp",
        PageUp => "PageUp",
        PageDown => "PageDown",
        Home => "Home",
        End => "End",
        CapsLock => "CapsLock",
        ScrollLock => "ScrollLock",
        NumLock => "NumLock",
        PrintScreen => "PrintScreen",
        Pause => "Pause",
        F1 => "F1",
        F2 => "F2",
        F3 => "F3",
        F4 => "F4",
        F5 => "F5",
        F6 => "F6",
        F7 => "F7",
        F8 => "F8",
        F9 => "F9",
        F10 => "F10",
        F11 => "F11",
        F12 => "F12",
        Kp0 => "Numpad0",
        Kp1 => "Numpad1",
        Kp2 => "Numpad2",
        Kp3 => "Numpad3",
        Kp4 => "Numpad4",
        Kp5 => "Numpad5",
        Kp6 => "Numpad6",
        Kp7 => "Numpad7",
        Kp8 => "Numpad8",
        Kp9 => "Numpad9",
        KpDecimal => "NumpadDecimal",
        KpDivide => "NumpadDivide",
        KpMultiply => "NumpadMultiply",
        KpSubtract => "NumpadSubtract",
        KpAdd => "NumpadAdd",
        KpEnter => "NumpadEnter",
        KpEqual => "NumpadEqual",
        LeftShift => "ShiftLeft",
        LeftControl => "ControlLeft",
        LeftAlt => "AltLeft",
        LeftSuper => "MetaLeft",
        RightShift => "ShiftRight",
        RightControl => "ControlRight",
        RightAlt => "AltRight",
        RightSuper => "MetaRight",
        Menu => "ContextMenu",
        _ => return None,
    };
    Some(code)
}

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl MouseButton {
    pub(crate) fn from_glfw(button: glfw::MouseButton) -> Option<Self> {
        match button {
            glfw::MouseButton::Button1 => Some(MouseButton::Left),
            glfw::MouseButton::Button2 => Some(MouseButton::Right),
            glfw::MouseButton::Button3 => Some(MouseButton::Middle),
            glfw::MouseButton::Button4 => Some(MouseButton::Back),
            glfw::MouseButton::Button5 => Some(MouseButton::Forward),
            _ => None,
        }
    }
}

/// Translates a GLFW window event. `cursor_pos` is the current cursor position, used for
/// button events; `prev_cursor_pos` tracks the last position so moves carry a delta.
pub(crate) fn event_from_glfw(
    event: &glfw::WindowEvent,
    cursor_pos: (f64, f64),
    prev_cursor_pos: &mut Option<Point2<i32>>,
) -> Option<Event> {
    match *event {
        glfw::WindowEvent::MouseButton(button, action, _) => {
            let pos = point2(cursor_pos.0 as i32, cursor_pos.1 as i32);
            let button = MouseButton::from_glfw(button)?;
            if action == glfw::Action::Release {
                Some(Event::MouseUp(button, pos))
            } else {
                Some(Event::MouseDown(button, pos))
            }
        }
        glfw::WindowEvent::CursorPos(x, y) => {
            let pos = point2(x as i32, y as i32);
            // The first position only seeds the delta.
            let res = prev_cursor_pos.map(|prev| Event::MouseMove { pos, movement: pos - prev });
            *prev_cursor_pos = Some(pos);
            res
        }
        glfw::WindowEvent::Key(key, _, action, modifiers) => {
            let key = Key::from_glfw(key, modifiers)?;
            if action == glfw::Action::Release {
                Some(Event::KeyUp(key))
            } else {
                Some(Event::KeyDown(key))
            }
        }
        glfw::WindowEvent::Char(c) => Some(Event::CharEntered(c)),
        glfw::WindowEvent::CursorEnter(true) => Some(Event::MouseEnter),
        glfw::WindowEvent::CursorEnter(false) => {
            *prev_cursor_pos = None;
            Some(Event::MouseLeave)
        }
        glfw::WindowEvent::FramebufferSize(width, height) => {
            Some(Event::Resized(vec2(width.max(0) as u32, height.max(0) as u32)))
        }
        glfw::WindowEvent::Scroll(_x, y) if y != 0.0 => Some(Event::Scroll(-y.signum())),
        glfw::WindowEvent::Focus(true) => Some(Event::FocusGained),
        glfw::WindowEvent::Focus(false) => Some(Event::FocusLost),
        glfw::WindowEvent::Close => Some(Event::Close),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_dom_codes() {
        assert_eq!(dom_code(glfw::Key::A), Some("KeyA"));
        assert_eq!(dom_code(glfw::Key::Num7), Some("Digit7"));
        assert_eq!(dom_code(glfw::Key::Kp7), Some("Numpad7"));
        assert_eq!(dom_code(glfw::Key::GraveAccent), Some("Backquote"));
        assert_eq!(dom_code(glfw::Key::Unknown), None);
    }

    #[test]
    fn modifiers_are_carried() {
        let key =
            Key::from_glfw(glfw::Key::S, glfw::Modifiers::Control | glfw::Modifiers::Shift).unwrap();
        assert_eq!(key.code, "KeyS");
        assert!(key.ctrl && key.shift && !key.alt && !key.meta);
        assert!(!key.is_modifier());
        assert!(Key::from_glfw(glfw::Key::RightAlt, glfw::Modifiers::empty())
            .unwrap()
            .is_modifier());
    }

    #[test]
    fn first_cursor_position_only_seeds_movement() {
        let mut prev = None;
        let first = event_from_glfw(&glfw::WindowEvent::CursorPos(10.0, 20.0), (0.0, 0.0), &mut prev);
        assert_eq!(first, None);
        let second = event_from_glfw(&glfw::WindowEvent::CursorPos(13.0, 18.0), (0.0, 0.0), &mut prev);
        assert_eq!(
            second,
            Some(Event::MouseMove { pos: point2(13, 18), movement: vec2(3, -2) })
        );
    }

    #[test]
    fn key_release_is_key_up() {
        let event = glfw::WindowEvent::Key(
            glfw::Key::Escape,
            0,
            glfw::Action::Release,
            glfw::Modifiers::empty(),
        );
        let mut prev = None;
        match event_from_glfw(&event, (0.0, 0.0), &mut prev) {
            Some(Event::KeyUp(key)) => assert_eq!(key.code, "Escape"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            event_from_glfw(&glfw::WindowEvent::Close, (0.0, 0.0), &mut prev),
            Some(Event::Close)
        );
    }
}
