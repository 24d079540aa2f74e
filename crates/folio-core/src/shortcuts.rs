//! Keyboard shortcut registry.

use crate::input::{Key, KeyEvent};

/// An action a key press maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Delete,
    Copy,
    Cut,
    Undo,
    Redo,
    SelectAll,
    Duplicate,
    Group,
    Ungroup,
    Lock,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Escape,
    /// Move the selection one step; `large` uses the grid step.
    Nudge { dx: i8, dy: i8, large: bool },
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: Key,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+G").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Key::Delete => "Delete".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::ArrowUp => "Up".to_string(),
            Key::ArrowDown => "Down".to_string(),
            Key::ArrowLeft => "Left".to_string(),
            Key::ArrowRight => "Right".to_string(),
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
        });
        parts.join("+")
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.key
            && self.ctrl == event.modifiers.command()
            && self.shift == event.modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        use Command::*;
        vec![
            Shortcut::new(Key::Char('a'), true, false, SelectAll, "Select all elements"),
            Shortcut::new(Key::Char('c'), true, false, Copy, "Copy elements"),
            Shortcut::new(Key::Char('x'), true, false, Cut, "Cut elements"),
            Shortcut::new(Key::Char('d'), true, false, Duplicate, "Duplicate elements"),
            Shortcut::new(Key::Char('z'), true, false, Undo, "Undo"),
            Shortcut::new(Key::Char('z'), true, true, Redo, "Redo"),
            Shortcut::new(Key::Char('y'), true, false, Redo, "Redo"),
            Shortcut::new(Key::Char('g'), true, false, Group, "Group selected elements"),
            Shortcut::new(Key::Char('g'), true, true, Ungroup, "Ungroup selected elements"),
            Shortcut::new(Key::Char('l'), true, false, Lock, "Lock selected elements"),
            Shortcut::new(Key::Char('='), true, false, ZoomIn, "Zoom in"),
            Shortcut::new(Key::Char('-'), true, false, ZoomOut, "Zoom out"),
            Shortcut::new(Key::Char('0'), true, false, ZoomReset, "Reset zoom"),
            Shortcut::new(Key::Delete, false, false, Delete, "Delete selected elements"),
            Shortcut::new(Key::Backspace, false, false, Delete, "Delete selected elements"),
            Shortcut::new(Key::Escape, false, false, Escape, "Clear selection or finish editing"),
        ]
    }

    /// Map a key press to a command.
    ///
    /// Arrow keys nudge regardless of Shift, which selects the grid step.
    pub fn resolve(event: &KeyEvent) -> Option<Command> {
        let large = event.modifiers.shift;
        let nudge = |dx, dy| Some(Command::Nudge { dx, dy, large });
        match event.key {
            Key::ArrowUp => return nudge(0, -1),
            Key::ArrowDown => return nudge(0, 1),
            Key::ArrowLeft => return nudge(-1, 0),
            Key::ArrowRight => return nudge(1, 0),
            Key::Escape => return Some(Command::Escape),
            _ => {}
        }
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| shortcut.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn press(key: Key, modifiers: Modifiers) -> Option<Command> {
        ShortcutRegistry::resolve(&KeyEvent::new(key).with_modifiers(modifiers))
    }

    #[test]
    fn test_undo_redo_bindings() {
        let ctrl_shift = Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(press(Key::Char('z'), Modifiers::CTRL), Some(Command::Undo));
        assert_eq!(press(Key::Char('z'), ctrl_shift), Some(Command::Redo));
        assert_eq!(press(Key::Char('y'), Modifiers::CTRL), Some(Command::Redo));
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(press(Key::Char('z'), cmd), Some(Command::Undo));
    }

    #[test]
    fn test_plain_letters_are_unbound() {
        assert_eq!(press(Key::Char('z'), Modifiers::NONE), None);
    }

    #[test]
    fn test_arrows_nudge() {
        assert_eq!(
            press(Key::ArrowLeft, Modifiers::SHIFT),
            Some(Command::Nudge {
                dx: -1,
                dy: 0,
                large: true
            })
        );
    }

    #[test]
    fn test_format() {
        let ungroup = ShortcutRegistry::all()
            .into_iter()
            .find(|s| s.command == Command::Ungroup)
            .unwrap();
        assert_eq!(ungroup.format(), "Ctrl+Shift+G");
    }
}
