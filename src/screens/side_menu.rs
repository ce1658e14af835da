use crate::layout::{EdgeOverride, NavigationMap, apply_overrides, compile_column};
use crate::types::{Action, Direction};

pub const CLOSE_MENU_ID: &str = "close-menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
}

pub static SIDE_MENU_ITEMS: [MenuItem; 9] = [
    MenuItem { id: "home", label: "Home" },
    MenuItem { id: "movies", label: "Movies" },
    MenuItem { id: "series", label: "Series" },
    MenuItem { id: "documentaries", label: "Documentaries" },
    MenuItem { id: "kids", label: "Kids" },
    MenuItem { id: "my-list", label: "My List" },
    MenuItem { id: "downloads", label: "Downloads" },
    MenuItem { id: "settings", label: "Settings" },
    MenuItem { id: "help", label: "Help" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideMenuCommand {
    Select(&'static str),
    Close,
}

/// Vertical item list. `right` from any entry reaches the close button,
/// which leads back to the first entry.
pub fn side_menu_map() -> NavigationMap {
    let ids: Vec<&str> = SIDE_MENU_ITEMS.iter().map(|item| item.id).collect();
    let mut patches: Vec<EdgeOverride> = ids
        .iter()
        .map(|id| EdgeOverride::new(*id, Direction::Right, CLOSE_MENU_ID))
        .collect();
    patches.push(EdgeOverride::new(CLOSE_MENU_ID, Direction::Left, SIDE_MENU_ITEMS[0].id));
    apply_overrides(compile_column(&ids), &patches)
}

/// Only confirm does anything inside the menu.
pub fn side_menu_command(id: &str, action: Action) -> Option<SideMenuCommand> {
    if action != Action::Confirm {
        return None;
    }
    if id == CLOSE_MENU_ID {
        return Some(SideMenuCommand::Close);
    }
    SIDE_MENU_ITEMS
        .iter()
        .find(|item| item.id == id)
        .map(|item| SideMenuCommand::Select(item.id))
}
