//! Confirmation dialogs opened over the profile picker.
//!
//! Each dialog owns its own scope, so opening one parks the picker's focus
//! and arrows can never leak back behind the overlay.

use crate::layout::{NavigationMap, apply_overrides, link_row};
use crate::runtime::NavEngine;
use crate::types::Action;

pub const MODAL_ADD_CONFIRM: &str = "modal_add_confirm";
pub const MODAL_ADD_CANCEL: &str = "modal_add_cancel";
pub const MODAL_DELETE_CANCEL: &str = "modal_delete_cancel";
pub const MODAL_DELETE_CONFIRM: &str = "modal_delete_confirm";
pub const MODAL_MANAGE_CLOSE: &str = "modal_manage_close";

/// Two buttons side by side, linked left/right.
pub fn modal_pair(first: &str, second: &str) -> NavigationMap {
    apply_overrides(NavigationMap::new(), &link_row(&[first, second]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileModal {
    Add,
    Delete,
    Manage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalCommand {
    Confirm,
    Dismiss,
}

impl ProfileModal {
    pub fn scope(self) -> &'static str {
        match self {
            Self::Add => "modal_add",
            Self::Delete => "modal_delete",
            Self::Manage => "modal_manage",
        }
    }

    /// Button ids in visual order, left to right.
    pub fn buttons(self) -> &'static [&'static str] {
        match self {
            Self::Add => &[MODAL_ADD_CONFIRM, MODAL_ADD_CANCEL],
            Self::Delete => &[MODAL_DELETE_CANCEL, MODAL_DELETE_CONFIRM],
            Self::Manage => &[MODAL_MANAGE_CLOSE],
        }
    }

    /// The leftmost button. For deletion that is the harmless one.
    pub fn entry(self) -> &'static str {
        self.buttons()[0]
    }

    /// A single-button dialog compiles to an empty map.
    pub fn map(self) -> NavigationMap {
        match self.buttons() {
            [first, second] => modal_pair(first, second),
            _ => NavigationMap::new(),
        }
    }

    /// Back dismisses from anywhere in the dialog; confirm does whatever the
    /// focused button says.
    pub fn command(self, id: &str, action: Action) -> Option<ModalCommand> {
        if !self.buttons().contains(&id) {
            return None;
        }
        match action {
            Action::Back => Some(ModalCommand::Dismiss),
            Action::Confirm => match id {
                MODAL_ADD_CONFIRM | MODAL_DELETE_CONFIRM => Some(ModalCommand::Confirm),
                _ => Some(ModalCommand::Dismiss),
            },
            Action::Menu => None,
        }
    }

    /// Switch the engine into this dialog's scope and focus its entry
    /// button. The caller registers the buttons.
    pub fn open(self, engine: &NavEngine) {
        engine.set_active_scope(Some(self.scope()));
        engine.set_focus(self.entry());
    }
}
