use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{Direction, Edges, NodeId};

/// Sparse adjacency map: `id -> {up, down, left, right}`.
///
/// Ids without any edge are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationMap {
    entries: BTreeMap<NodeId, Edges>,
}

/// An edge whose target is not a known id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEdge {
    pub from: NodeId,
    pub direction: Direction,
    pub to: NodeId,
}

impl NavigationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edges of `id`, or `None` when the id has none.
    pub fn edges(&self, id: &str) -> Option<&Edges> {
        self.entries.get(id)
    }

    /// Owned edges of `id`, empty when absent. Convenient when binding a node.
    pub fn edges_or_default(&self, id: &str) -> Edges {
        self.entries.get(id).cloned().unwrap_or_default()
    }

    pub fn target(&self, id: &str, direction: Direction) -> Option<&str> {
        self.entries.get(id).and_then(|edges| edges.get(direction))
    }

    pub fn set_edge(&mut self, from: &str, direction: Direction, to: impl Into<NodeId>) {
        self.entries
            .entry(from.to_string())
            .or_default()
            .set(direction, to);
    }

    pub fn clear_edge(&mut self, from: &str, direction: Direction) {
        if let Some(edges) = self.entries.get_mut(from) {
            edges.clear(direction);
            if edges.is_empty() {
                self.entries.remove(from);
            }
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Edges)> + '_ {
        self.entries.iter().map(|(id, edges)| (id.as_str(), edges))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Edges pointing at ids that are neither keys of this map nor listed in
    /// `extra_ids`. At runtime such edges simply do not move focus; this is
    /// for authoring checks.
    pub fn dangling_edges(&self, extra_ids: &[&str]) -> Vec<DanglingEdge> {
        let known: HashSet<&str> = self
            .entries
            .keys()
            .map(String::as_str)
            .chain(extra_ids.iter().copied())
            .collect();

        let mut dangling = Vec::new();
        for (from, edges) in &self.entries {
            for (direction, to) in edges.iter() {
                if !known.contains(to) {
                    dangling.push(DanglingEdge {
                        from: from.clone(),
                        direction,
                        to: to.to_string(),
                    });
                }
            }
        }
        dangling
    }
}

impl FromIterator<(NodeId, Edges)> for NavigationMap {
    fn from_iter<T: IntoIterator<Item = (NodeId, Edges)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .filter(|(_, edges)| !edges.is_empty())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_last_edge_drops_entry() {
        let mut map = NavigationMap::new();
        map.set_edge("a", Direction::Right, "b");
        assert_eq!(map.target("a", Direction::Right), Some("b"));
        map.clear_edge("a", Direction::Right);
        assert!(map.is_empty());
        assert_eq!(map.edges_or_default("a"), Edges::default());
    }

    #[test]
    fn dangling_edges_respect_extra_ids() {
        let mut map = NavigationMap::new();
        map.set_edge("home", Direction::Right, "close-menu");
        map.set_edge("home", Direction::Down, "movies");
        map.set_edge("movies", Direction::Up, "home");

        let dangling = map.dangling_edges(&[]);
        assert_eq!(
            dangling,
            vec![DanglingEdge {
                from: "home".into(),
                direction: Direction::Right,
                to: "close-menu".into(),
            }]
        );
        assert!(map.dangling_edges(&["close-menu"]).is_empty());
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut map = NavigationMap::new();
        map.set_edge("a", Direction::Down, "c");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":{"down":"c"}}"#);
        let back: NavigationMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
