pub mod add_profile;
pub mod keyboard;
pub mod modal;
pub mod profiles;
pub mod side_menu;
