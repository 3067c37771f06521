// tfm-core/src/controller/keymap.rs
// Key bindings for browse mode

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use crate::controller::actions::Action;

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn arrow_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn tab_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)
}

pub fn enter_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
}

pub fn escape_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyEvent, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap {
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(32);

        // Arrow keys
        bindings.insert(arrow_key(KeyCode::Up), Action::MoveSelectionUp);
        bindings.insert(arrow_key(KeyCode::Down), Action::MoveSelectionDown);
        bindings.insert(arrow_key(KeyCode::Left), Action::GoToParent);
        bindings.insert(arrow_key(KeyCode::Right), Action::Activate);
        bindings.insert(enter_key(), Action::Activate);
        bindings.insert(tab_key(), Action::CycleFocus);

        // File operations
        bindings.insert(key('d'), Action::Delete);
        bindings.insert(key('n'), Action::CreateEntry);
        bindings.insert(key('e'), Action::Edit);
        bindings.insert(key('c'), Action::Copy);
        bindings.insert(key('x'), Action::Cut);
        bindings.insert(key('v'), Action::Paste);
        bindings.insert(key('r'), Action::Rename);
        bindings.insert(key(':'), Action::RunCommand);

        // Listing
        bindings.insert(key('/'), Action::Search);
        bindings.insert(escape_key(), Action::ClearSearch);
        bindings.insert(key('h'), Action::ToggleHidden);

        // Drives and session
        bindings.insert(key('u'), Action::Unmount);
        bindings.insert(key('U'), Action::CheckForUpdate);
        bindings.insert(key('q'), Action::Quit);
        bindings.insert(ctrl('c'), Action::Quit);

        Self { bindings }
    }

    /// Action bound to `event`. Shift is folded into the character itself
    /// and key releases are ignored.
    pub fn lookup(&self, event: &KeyEvent) -> Option<Action> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        let mut modifiers = event.modifiers;
        if matches!(event.code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        let normalized = KeyEvent::new(event.code, modifiers);

        let action = self.bindings.get(&normalized).copied();
        trace!("key {:?} -> {:?}", normalized, action);
        action
    }

    /// Action for a clicked status-bar hint.
    pub fn for_char(&self, c: char) -> Option<Action> {
        self.bindings.get(&key(c)).copied()
    }
}
