//! Profile picker: one row of profiles plus an "add" tile, and a manage
//! button underneath that returns to whichever top tile was last focused.

use std::sync::Arc;

use crate::layout::{EdgeOverride, MapCache, NavigationMap, apply_overrides, compile_grid};
use crate::runtime::focus::FocusState;
use crate::types::{Direction, NodeId};

pub const MAX_PROFILES: usize = 5;
pub const ADD_PROFILE_ID: &str = "add_profile";
pub const MANAGE_PROFILES_ID: &str = "manage_profiles";

pub fn profile_id(index: usize) -> NodeId {
    format!("profile_{index}")
}

/// Top-row ids for `count` profiles; counts above the limit are capped.
pub fn top_row(count: usize) -> Vec<NodeId> {
    let count = count.min(MAX_PROFILES);
    let mut ids: Vec<NodeId> = (0..count).map(profile_id).collect();
    if count < MAX_PROFILES {
        ids.push(ADD_PROFILE_ID.to_string());
    }
    ids
}

/// Where focus lands when the screen opens.
pub fn entry_focus(count: usize) -> NodeId {
    if count > 0 {
        profile_id(0)
    } else {
        ADD_PROFILE_ID.to_string()
    }
}

fn rows_and_patches(count: usize, last_top: Option<&str>) -> (Vec<Vec<NodeId>>, Vec<EdgeOverride>) {
    let top = top_row(count);
    let up = last_top
        .filter(|id| top.iter().any(|candidate| candidate.as_str() == *id))
        .map(str::to_string)
        .unwrap_or_else(|| entry_focus(count));
    let patches = vec![EdgeOverride::new(MANAGE_PROFILES_ID, Direction::Up, up)];
    (vec![top, vec![MANAGE_PROFILES_ID.to_string()]], patches)
}

/// A `last_top` that is no longer in the row falls back to the entry tile.
pub fn profiles_map(count: usize, last_top: Option<&str>) -> NavigationMap {
    let (rows, patches) = rows_and_patches(count, last_top);
    apply_overrides(compile_grid(&rows), &patches)
}

pub fn profiles_map_cached(
    cache: &mut MapCache,
    count: usize,
    last_top: Option<&str>,
) -> Arc<NavigationMap> {
    let (rows, patches) = rows_and_patches(count, last_top);
    cache.get_or_compile(&rows, "", &patches)
}

/// Remembers the last top-row tile focused in the profiles scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilesFocusMemory {
    scope: String,
    last_top: Option<NodeId>,
}

impl ProfilesFocusMemory {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            last_top: None,
        }
    }

    /// Returns true when the remembered tile changed.
    pub fn observe(&mut self, state: &FocusState) -> bool {
        if state.active_scope.as_deref() != Some(self.scope.as_str()) {
            return false;
        }
        let Some(focused) = state.focused_id.as_deref() else {
            return false;
        };
        let is_top = focused.starts_with("profile_") || focused == ADD_PROFILE_ID;
        if !is_top || self.last_top.as_deref() == Some(focused) {
            return false;
        }
        self.last_top = Some(focused.to_string());
        true
    }

    pub fn last_top(&self) -> Option<&str> {
        self.last_top.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(scope: &str, id: &str) -> FocusState {
        FocusState {
            active_scope: Some(scope.into()),
            focused_id: Some(id.into()),
        }
    }

    #[test]
    fn row_includes_add_tile_below_limit() {
        assert_eq!(top_row(0), vec!["add_profile"]);
        assert_eq!(top_row(2), vec!["profile_0", "profile_1", "add_profile"]);
        assert_eq!(top_row(5).len(), 5);
        assert!(!top_row(7).contains(&ADD_PROFILE_ID.to_string()));
    }

    #[test]
    fn top_row_links_down_to_manage() {
        let map = profiles_map(3, None);
        for id in top_row(3) {
            assert_eq!(map.target(&id, Direction::Down), Some(MANAGE_PROFILES_ID));
        }
        assert_eq!(map.target("profile_2", Direction::Right), Some(ADD_PROFILE_ID));
        assert_eq!(map.target(ADD_PROFILE_ID, Direction::Left), Some("profile_2"));
        assert_eq!(map.target(MANAGE_PROFILES_ID, Direction::Up), Some("profile_0"));
    }

    #[test]
    fn manage_returns_to_last_top_tile() {
        let map = profiles_map(3, Some("profile_2"));
        assert_eq!(map.target(MANAGE_PROFILES_ID, Direction::Up), Some("profile_2"));

        let stale = profiles_map(1, Some("profile_4"));
        assert_eq!(stale.target(MANAGE_PROFILES_ID, Direction::Up), Some("profile_0"));

        let empty = profiles_map(0, None);
        assert_eq!(empty.target(MANAGE_PROFILES_ID, Direction::Up), Some(ADD_PROFILE_ID));
        assert_eq!(empty.target(ADD_PROFILE_ID, Direction::Down), Some(MANAGE_PROFILES_ID));
    }

    #[test]
    fn memory_tracks_top_row_in_its_scope() {
        let mut memory = ProfilesFocusMemory::new("profiles");
        assert!(memory.observe(&state("profiles", "profile_1")));
        assert!(!memory.observe(&state("profiles", "profile_1")));
        assert!(!memory.observe(&state("profiles", MANAGE_PROFILES_ID)));
        assert!(!memory.observe(&state("modal_add", "profile_3")));
        assert_eq!(memory.last_top(), Some("profile_1"));
        assert!(memory.observe(&state("profiles", ADD_PROFILE_ID)));
        assert_eq!(memory.last_top(), Some(ADD_PROFILE_ID));
    }

    #[test]
    fn cache_reuses_identical_layouts() {
        let mut cache = MapCache::new();
        let first = profiles_map_cached(&mut cache, 2, Some("profile_1"));
        let second = profiles_map_cached(&mut cache, 2, Some("profile_1"));
        assert!(Arc::ptr_eq(&first, &second));
        let moved = profiles_map_cached(&mut cache, 2, Some("profile_0"));
        assert_eq!(moved.target(MANAGE_PROFILES_ID, Direction::Up), Some("profile_0"));
        assert_eq!(cache.len(), 2);
    }
}
