//! Shared vocabulary: directions, actions and per-node edge sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a navigable node, unique within its scope.
pub type NodeId = String;

/// Name of a navigation scope.
pub type ScopeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-directional input dispatched to the focused node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Confirm,
    Back,
    Menu,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Confirm => "confirm",
            Action::Back => "back",
            Action::Menu => "menu",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing edges of one node. `None` means the key is swallowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<NodeId>,
}

impl Edges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, direction: Direction) -> Option<&str> {
        self.slot(direction).as_deref()
    }

    pub fn set(&mut self, direction: Direction, target: impl Into<NodeId>) {
        *self.slot_mut(direction) = Some(target.into());
    }

    pub fn clear(&mut self, direction: Direction) {
        *self.slot_mut(direction) = None;
    }

    /// Builder form of [`Edges::set`].
    pub fn with(mut self, direction: Direction, target: impl Into<NodeId>) -> Self {
        self.set(direction, target);
        self
    }

    pub fn up(self, target: impl Into<NodeId>) -> Self {
        self.with(Direction::Up, target)
    }

    pub fn down(self, target: impl Into<NodeId>) -> Self {
        self.with(Direction::Down, target)
    }

    pub fn left(self, target: impl Into<NodeId>) -> Self {
        self.with(Direction::Left, target)
    }

    pub fn right(self, target: impl Into<NodeId>) -> Self {
        self.with(Direction::Right, target)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Present edges in `Direction::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &str)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.get(direction).map(|target| (direction, target)))
    }

    fn slot(&self, direction: Direction) -> &Option<NodeId> {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    fn slot_mut(&mut self, direction: Direction) -> &mut Option<NodeId> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}
