//! New-profile form: an avatar carousel, the name field and a save/cancel
//! pair.
//!
//! The name field is a native input. It sits in the graph so arrows out of
//! the carousel land on it, and it only leads back to the first avatar.

use crate::layout::{EdgeOverride, NavigationMap, apply_overrides, compile_grid, link_row};
use crate::types::{Action, Direction, NodeId};

pub const ADD_PROFILE_SCOPE: &str = "add_profile";
pub const ADD_NAME_ID: &str = "add_name";
pub const ADD_SAVE_ID: &str = "add_save";
pub const ADD_CANCEL_ID: &str = "add_cancel";

pub static AVATAR_STYLES: [&str; 8] = [
    "adventurer",
    "avataaars",
    "big-ears",
    "big-smile",
    "bottts",
    "croodles",
    "identicon",
    "micah",
];

pub fn avatar_id(index: usize) -> NodeId {
    format!("avatar_{index}")
}

/// Where focus lands when the form opens.
pub fn entry_focus() -> NodeId {
    avatar_id(0)
}

/// Every id the form registers, in reading order.
pub fn add_profile_ids() -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = (0..AVATAR_STYLES.len()).map(avatar_id).collect();
    ids.extend([ADD_NAME_ID, ADD_SAVE_ID, ADD_CANCEL_ID].map(str::to_string));
    ids
}

/// Avatars chain left/right and all drop to the name field. The buttons
/// only link to each other.
pub fn add_profile_map() -> NavigationMap {
    let avatars: Vec<NodeId> = (0..AVATAR_STYLES.len()).map(avatar_id).collect();
    let mut patches: Vec<EdgeOverride> = avatars
        .iter()
        .map(|id| EdgeOverride::new(id.as_str(), Direction::Down, ADD_NAME_ID))
        .collect();
    patches.push(EdgeOverride::new(ADD_NAME_ID, Direction::Up, avatar_id(0)));
    patches.push(EdgeOverride::new(ADD_NAME_ID, Direction::Left, avatar_id(0)));
    patches.extend(link_row(&[ADD_SAVE_ID, ADD_CANCEL_ID]));
    apply_overrides(compile_grid(&[avatars]), &patches)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddProfileCommand {
    /// Pick the avatar and move on to the name field.
    ChooseAvatar(&'static str),
    Save,
    Cancel,
}

pub fn add_profile_command(id: &str, action: Action) -> Option<AddProfileCommand> {
    match (id, action) {
        (ADD_SAVE_ID, Action::Confirm) => Some(AddProfileCommand::Save),
        (ADD_CANCEL_ID, Action::Confirm) | (_, Action::Back) => Some(AddProfileCommand::Cancel),
        (_, Action::Confirm) => {
            let index: usize = id.strip_prefix("avatar_")?.parse().ok()?;
            AVATAR_STYLES
                .get(index)
                .copied()
                .map(AddProfileCommand::ChooseAvatar)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carousel_drops_to_the_name_field() {
        let map = add_profile_map();
        for index in 0..AVATAR_STYLES.len() {
            assert_eq!(map.target(&avatar_id(index), Direction::Down), Some(ADD_NAME_ID));
        }
        assert_eq!(map.target("avatar_0", Direction::Left), None);
        assert_eq!(map.target("avatar_0", Direction::Right), Some("avatar_1"));
        assert_eq!(map.target("avatar_7", Direction::Right), None);
        assert_eq!(map.target("avatar_7", Direction::Left), Some("avatar_6"));
        assert_eq!(map.target(ADD_NAME_ID, Direction::Up), Some("avatar_0"));
    }

    #[test]
    fn buttons_link_only_to_each_other() {
        let map = add_profile_map();
        assert_eq!(map.target(ADD_SAVE_ID, Direction::Right), Some(ADD_CANCEL_ID));
        assert_eq!(map.target(ADD_CANCEL_ID, Direction::Left), Some(ADD_SAVE_ID));
        assert_eq!(map.target(ADD_SAVE_ID, Direction::Up), None);
        assert_eq!(map.target(ADD_NAME_ID, Direction::Down), None);
    }

    #[test]
    fn form_has_no_dangling_edges() {
        let map = add_profile_map();
        assert!(map.dangling_edges(&[]).is_empty());
        let ids = add_profile_ids();
        assert_eq!(ids.len(), map.len());
        assert!(map.ids().all(|id| ids.iter().any(|known| known == id)));
        assert_eq!(entry_focus(), "avatar_0");
    }

    #[test]
    fn commands_per_node() {
        assert_eq!(
            add_profile_command("avatar_3", Action::Confirm),
            Some(AddProfileCommand::ChooseAvatar("big-smile"))
        );
        assert_eq!(add_profile_command("avatar_9", Action::Confirm), None);
        assert_eq!(add_profile_command(ADD_SAVE_ID, Action::Confirm), Some(AddProfileCommand::Save));
        assert_eq!(
            add_profile_command(ADD_CANCEL_ID, Action::Confirm),
            Some(AddProfileCommand::Cancel)
        );
        assert_eq!(add_profile_command("avatar_1", Action::Back), Some(AddProfileCommand::Cancel));
        assert_eq!(add_profile_command(ADD_SAVE_ID, Action::Menu), None);
    }
}
