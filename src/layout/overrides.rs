//! Manual edge patches applied after grid compilation.
//!
//! Used where index clamping picks the wrong neighbour, e.g. a wide button
//! that should be reachable from several columns above it.

use serde::{Deserialize, Serialize};

use crate::types::{Direction, NodeId};

use super::map::NavigationMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeOverride {
    pub from: NodeId,
    pub direction: Direction,
    pub to: NodeId,
}

impl EdgeOverride {
    pub fn new(from: impl Into<NodeId>, direction: Direction, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            direction,
            to: to.into(),
        }
    }
}

/// Apply `overrides` in order. Later entries win for the same
/// `(from, direction)`.
pub fn apply_overrides(mut map: NavigationMap, overrides: &[EdgeOverride]) -> NavigationMap {
    for patch in overrides {
        map.set_edge(&patch.from, patch.direction, patch.to.clone());
    }
    map
}

/// Overrides chaining `ids` left-to-right in both directions.
pub fn link_row<S: AsRef<str>>(ids: &[S]) -> Vec<EdgeOverride> {
    ids.windows(2)
        .flat_map(|pair| {
            let (left, right) = (pair[0].as_ref(), pair[1].as_ref());
            [
                EdgeOverride::new(left, Direction::Right, right),
                EdgeOverride::new(right, Direction::Left, left),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::grid::compile_grid;

    #[test]
    fn overrides_win_over_generated_edges() {
        let map = compile_grid(&[vec!["a", "b", "c"], vec!["wide"]]);
        assert_eq!(map.target("wide", Direction::Up), Some("a"));

        let patched = apply_overrides(map, &[EdgeOverride::new("wide", Direction::Up, "b")]);
        assert_eq!(patched.target("wide", Direction::Up), Some("b"));
        assert_eq!(patched.target("c", Direction::Down), Some("wide"));
    }

    #[test]
    fn later_overrides_overwrite_earlier_ones() {
        let patched = apply_overrides(
            NavigationMap::new(),
            &[
                EdgeOverride::new("x", Direction::Left, "first"),
                EdgeOverride::new("x", Direction::Left, "second"),
            ],
        );
        assert_eq!(patched.target("x", Direction::Left), Some("second"));
    }

    #[test]
    fn link_row_chains_both_ways() {
        let patches = link_row(&["a", "b", "c"]);
        assert_eq!(patches.len(), 4);
        let map = apply_overrides(NavigationMap::new(), &patches);
        assert_eq!(map.target("a", Direction::Right), Some("b"));
        assert_eq!(map.target("b", Direction::Left), Some("a"));
        assert_eq!(map.target("b", Direction::Right), Some("c"));
        assert_eq!(map.target("c", Direction::Left), Some("b"));
        assert!(link_row(&["solo"]).is_empty());
    }
}
