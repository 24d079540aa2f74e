//! Normalized pointer and keyboard events.

use crate::camera::Camera;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer event.
///
/// `position` is in canvas space (already corrected for pan and zoom);
/// `screen` is the raw viewport position, used for panning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub screen: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Event at a canvas position, assuming an identity viewport.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            screen: position,
            modifiers: Modifiers::NONE,
        }
    }

    /// Event at a screen position, converted through the camera.
    pub fn from_screen(camera: &Camera, screen: Point) -> Self {
        Self {
            position: camera.screen_to_canvas(screen),
            screen,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Keys the board reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// A printable key, lowercase for letters.
    Char(char),
}

impl Key {
    /// Build a key from a character, folding letters to lowercase.
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_lowercase())
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
