//! Events.

use crate::rect::Point;
use std::collections::HashMap;

/// Mouse buttons.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Left = 0,
    Middle = 1,
    Right = 2,
}

/// A mouse button press or release, or a drag while a button is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButton {
    /// True for a press (and for drags), false for a release.
    pub down: bool,

    /// Number of consecutive clicks, for double clicks and the like.
    pub num_clicks: u32,

    pub kind: ButtonKind,

    pub modifiers: KeyModifiers,

    /// Pointer location in view coordinates.
    pub pos: Point,
}

impl MouseButton {
    /// A left button press at `pos`.
    pub fn press(pos: Point) -> MouseButton {
        MouseButton {
            down: true,
            num_clicks: 1,
            kind: ButtonKind::Left,
            modifiers: KeyModifiers::default(),
            pos,
        }
    }

    /// A left button release at `pos`.
    pub fn release(pos: Point) -> MouseButton {
        MouseButton {
            down: false,
            ..MouseButton::press(pos)
        }
    }

    pub fn with_modifiers(self, modifiers: KeyModifiers) -> MouseButton {
        MouseButton { modifiers, ..self }
    }

    pub fn at(self, pos: Point) -> MouseButton {
        MouseButton { pos, ..self }
    }
}

/// Modifier key state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    /// Whether any shift key is pressed.
    pub shift: bool,

    /// Whether any control key is pressed.
    pub control: bool,

    /// Whether any option key or alt key is pressed.
    pub option: bool,

    /// Whether any command key or meta key is pressed.
    pub command: bool,
}

impl KeyModifiers {
    pub const SHIFT: KeyModifiers = KeyModifiers {
        shift: true,
        control: false,
        option: false,
        command: false,
    };

    pub const COMMAND: KeyModifiers = KeyModifiers {
        shift: false,
        control: false,
        option: false,
        command: true,
    };

    /// The platform's "action" modifier: command on macOS, control elsewhere.
    pub fn action(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.command
        } else {
            self.control || self.command
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

/// A key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    pub code: KeyCode,
    pub action: KeyAction,
    pub modifiers: KeyModifiers,
}

impl KeyInfo {
    pub fn press(code: KeyCode) -> KeyInfo {
        KeyInfo {
            code,
            action: KeyAction::Press,
            modifiers: KeyModifiers::default(),
        }
    }

    pub fn with_modifiers(self, modifiers: KeyModifiers) -> KeyInfo {
        KeyInfo { modifiers, ..self }
    }

    /// True for presses and auto-repeats.
    pub fn is_down(&self) -> bool {
        matches!(self.action, KeyAction::Press | KeyAction::Repeat)
    }
}

/// Text input, after keyboard layout and input methods have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextInfo {
    pub codepoint: char,
    pub modifiers: KeyModifiers,
}

/// Hover state reported with cursor and drop tracking events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTracking {
    Entering,
    Hovering,
    Leaving,
}

/// Drag-and-drop data keyed by MIME type.
pub type Payload = HashMap<String, Vec<u8>>;

/// A drag-and-drop payload together with the current pointer location.
#[derive(Debug, Clone, PartialEq)]
pub struct DropInfo {
    pub data: Payload,

    /// Pointer location in view coordinates.
    pub location: Point,
}

impl DropInfo {
    pub fn new(location: Point) -> DropInfo {
        DropInfo {
            data: Payload::new(),
            location,
        }
    }

    /// Adds data for a MIME type.
    pub fn with(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> DropInfo {
        self.data.insert(mime_type.into(), data);
        self
    }

    pub fn has(&self, mime_type: &str) -> bool {
        self.data.contains_key(mime_type)
    }
}

/// Keyboard layout-independent identifiers for keyboard keys.
///
/// Some obscure keys may be missing.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    A = 0x1,
    B = 0x2,
    C = 0x3,
    D = 0x4,
    E = 0x5,
    F = 0x6,
    G = 0x7,
    H = 0x8,
    I = 0x9,
    J = 0xA,
    K = 0xB,
    L = 0xC,
    M = 0xD,
    N = 0xE,
    O = 0xF,
    P = 0x10,
    Q = 0x11,
    R = 0x12,
    S = 0x13,
    T = 0x14,
    U = 0x15,
    V = 0x16,
    W = 0x17,
    X = 0x18,
    Y = 0x19,
    Z = 0x1A,
    Return = 0x35,
    Tab = 0x36,
    Space = 0x37,
    /// Backspace on most keyboards.
    Delete = 0x38,
    Escape = 0x39,
    LeftArrow = 0x44,
    DownArrow = 0x45,
    UpArrow = 0x46,
    RightArrow = 0x47,
    ForwardDelete = 0x48,
    Home = 0x4A,
    End = 0x4B,
    PageUp = 0x4C,
    PageDown = 0x4D,
}
