use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::types::{Action, Direction};

/// What a recognised key asks the router to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NavCommand {
    Move(Direction),
    Act(Action),
}

impl NavCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            NavCommand::Move(direction) => direction.as_str(),
            NavCommand::Act(action) => action.as_str(),
        }
    }
}

impl fmt::Display for NavCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavCommand {
    type Err = NavError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "up" => Ok(NavCommand::Move(Direction::Up)),
            "down" => Ok(NavCommand::Move(Direction::Down)),
            "left" => Ok(NavCommand::Move(Direction::Left)),
            "right" => Ok(NavCommand::Move(Direction::Right)),
            "confirm" => Ok(NavCommand::Act(Action::Confirm)),
            "back" => Ok(NavCommand::Act(Action::Back)),
            "menu" => Ok(NavCommand::Act(Action::Menu)),
            _ => Err(NavError::UnknownCommand(value.to_string())),
        }
    }
}

impl TryFrom<String> for NavCommand {
    type Error = NavError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NavCommand> for String {
    fn from(command: NavCommand) -> Self {
        command.as_str().to_string()
    }
}

const NAMED_KEYS: &[&str] = &[
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Enter",
    "Escape",
    "Tab",
    "Backspace",
    "Delete",
    "Insert",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    " ",
];

/// Key-name to command table. Key names follow the DOM `KeyboardEvent.key`
/// vocabulary so browser and terminal hosts share one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMap {
    bindings: HashMap<String, NavCommand>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        keymap.insert("ArrowUp", NavCommand::Move(Direction::Up));
        keymap.insert("ArrowDown", NavCommand::Move(Direction::Down));
        keymap.insert("ArrowLeft", NavCommand::Move(Direction::Left));
        keymap.insert("ArrowRight", NavCommand::Move(Direction::Right));
        keymap.insert("Enter", NavCommand::Act(Action::Confirm));
        keymap.insert("Escape", NavCommand::Act(Action::Back));
        keymap.insert("Tab", NavCommand::Act(Action::Menu));
        keymap
    }
}

impl KeyMap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `command`, replacing any previous binding.
    pub fn bind(&mut self, key: &str, command: NavCommand) -> Result<()> {
        if !is_valid_key_name(key) {
            return Err(NavError::UnknownKey(key.to_string()));
        }
        self.insert(key, command);
        Ok(())
    }

    pub fn unbind(&mut self, key: &str) -> Option<NavCommand> {
        self.bindings.remove(key)
    }

    pub fn resolve_dom(&self, key: &str) -> Option<NavCommand> {
        self.bindings.get(key).copied()
    }

    /// Resolve a terminal key event. Releases and chords with Ctrl/Alt are
    /// never navigation keys.
    pub fn resolve(&self, event: &KeyEvent) -> Option<NavCommand> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        if event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        key_name(event.code).and_then(|name| self.resolve_dom(&name))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn insert(&mut self, key: &str, command: NavCommand) {
        self.bindings.insert(key.to_string(), command);
    }
}

/// DOM-style name for a terminal key code.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Char(ch) => return Some(ch.to_string()),
        KeyCode::F(n) => return Some(format!("F{n}")),
        _ => return None,
    };
    Some(name.to_string())
}

fn is_valid_key_name(key: &str) -> bool {
    if NAMED_KEYS.contains(&key) || key.chars().count() == 1 {
        return true;
    }
    key.strip_prefix('F')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=24).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_cover_remote_keys() {
        let keymap = KeyMap::default();
        assert_eq!(
            keymap.resolve_dom("ArrowLeft"),
            Some(NavCommand::Move(Direction::Left))
        );
        assert_eq!(
            keymap.resolve_dom("Enter"),
            Some(NavCommand::Act(Action::Confirm))
        );
        assert_eq!(keymap.resolve_dom("Escape"), Some(NavCommand::Act(Action::Back)));
        assert_eq!(keymap.resolve_dom("Tab"), Some(NavCommand::Act(Action::Menu)));
        assert_eq!(keymap.resolve_dom("a"), None);
    }

    #[test]
    fn terminal_events_map_through_dom_names() {
        let keymap = KeyMap::default();
        assert_eq!(
            keymap.resolve(&press(KeyCode::Down)),
            Some(NavCommand::Move(Direction::Down))
        );
        assert_eq!(
            keymap.resolve(&press(KeyCode::Esc)),
            Some(NavCommand::Act(Action::Back))
        );
        let ctrl = KeyEvent::new(KeyCode::Up, KeyModifiers::CONTROL);
        assert_eq!(keymap.resolve(&ctrl), None);
        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(keymap.resolve(&release), None);
    }

    #[test]
    fn bind_validates_key_names() {
        let mut keymap = KeyMap::default();
        keymap.bind("m", NavCommand::Act(Action::Menu)).unwrap();
        keymap.bind("F12", NavCommand::Act(Action::Back)).unwrap();
        assert!(matches!(
            keymap.bind("Hyper", NavCommand::Act(Action::Menu)),
            Err(NavError::UnknownKey(_))
        ));
        assert_eq!(
            keymap.resolve(&press(KeyCode::Char('m'))),
            Some(NavCommand::Act(Action::Menu))
        );
    }

    #[test]
    fn commands_parse_from_strings() {
        assert_eq!("Up".parse::<NavCommand>().unwrap(), NavCommand::Move(Direction::Up));
        assert!("jump".parse::<NavCommand>().is_err());
        let json = serde_json::to_string(&NavCommand::Act(Action::Back)).unwrap();
        assert_eq!(json, "\"back\"");
    }
}
