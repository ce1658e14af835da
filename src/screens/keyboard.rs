//! On-screen email keyboard.
//!
//! Seven rows: digits, three letter rows, mail domain shortcuts, punctuation
//! and the clear/confirm action row. Ids are the key prefixed with `kb_`.

use std::sync::Arc;

use crate::layout::{EdgeOverride, MapCache, NavigationMap, apply_overrides, compile_grid_with_prefix, link_row};
use crate::types::{Action, NodeId};

pub const KEYBOARD_PREFIX: &str = "kb_";

/// First key focused when the keyboard opens.
pub const KEYBOARD_ENTRY: &str = "kb_1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardKey {
    /// Text inserted on confirm, or the action name for the last row.
    pub key: &'static str,
    pub label: &'static str,
}

const fn plain(key: &'static str) -> KeyboardKey {
    KeyboardKey { key, label: key }
}

const fn labelled(key: &'static str, label: &'static str) -> KeyboardKey {
    KeyboardKey { key, label }
}

pub static KEYBOARD_LAYOUT: &[&[KeyboardKey]] = &[
    &[
        plain("1"), plain("2"), plain("3"), plain("4"), plain("5"),
        plain("6"), plain("7"), plain("8"), plain("9"), plain("0"),
    ],
    &[
        plain("q"), plain("w"), plain("e"), plain("r"), plain("t"),
        plain("y"), plain("u"), plain("i"), plain("o"), plain("p"),
    ],
    &[
        plain("a"), plain("s"), plain("d"), plain("f"), plain("g"),
        plain("h"), plain("j"), plain("k"), plain("l"),
    ],
    &[
        plain("z"), plain("x"), plain("c"), plain("v"), plain("b"),
        plain("n"), plain("m"),
    ],
    &[plain("@gmail.com"), plain("@yahoo.com"), plain("@hotmail.com")],
    &[
        plain("."), plain("_"), plain("-"), plain("@"), plain(".com"), plain(".br"),
    ],
    &[labelled("clear", "Clear"), labelled("confirm", "Confirm")],
];

// Domain, punctuation and action rows are chained explicitly on top of the
// generated grid.
const LINKED_ROWS: std::ops::Range<usize> = 4..7;

/// What a keyboard key asks its owner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardCommand {
    Input(String),
    Clear,
    Confirm,
    Backspace,
    /// Close the keyboard; the owner must pick the next focus itself.
    Escape,
}

impl KeyboardKey {
    pub fn id(&self) -> NodeId {
        key_id(self.key)
    }

    pub fn command(&self, action: Action) -> Option<KeyboardCommand> {
        match action {
            Action::Confirm => Some(match self.key {
                "confirm" => KeyboardCommand::Confirm,
                "clear" => KeyboardCommand::Clear,
                "backspace" => KeyboardCommand::Backspace,
                text => KeyboardCommand::Input(text.to_string()),
            }),
            Action::Back => Some(KeyboardCommand::Escape),
            Action::Menu => None,
        }
    }
}

pub fn key_id(key: &str) -> NodeId {
    format!("{KEYBOARD_PREFIX}{key}")
}

/// Key behind a `kb_` id.
pub fn find_key(id: &str) -> Option<&'static KeyboardKey> {
    let key = id.strip_prefix(KEYBOARD_PREFIX)?;
    KEYBOARD_LAYOUT
        .iter()
        .flat_map(|row| row.iter())
        .find(|candidate| candidate.key == key)
}

fn key_rows() -> Vec<Vec<&'static str>> {
    KEYBOARD_LAYOUT
        .iter()
        .map(|row| row.iter().map(|key| key.key).collect())
        .collect()
}

fn row_links() -> Vec<EdgeOverride> {
    KEYBOARD_LAYOUT[LINKED_ROWS]
        .iter()
        .flat_map(|row| {
            let ids: Vec<NodeId> = row.iter().map(KeyboardKey::id).collect();
            link_row(&ids)
        })
        .collect()
}

pub fn keyboard_map() -> NavigationMap {
    apply_overrides(
        compile_grid_with_prefix(&key_rows(), KEYBOARD_PREFIX),
        &row_links(),
    )
}

pub fn keyboard_map_cached(cache: &mut MapCache) -> Arc<NavigationMap> {
    cache.get_or_compile(&key_rows(), KEYBOARD_PREFIX, &row_links())
}
