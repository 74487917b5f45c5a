//! Custom widgets for the character sheet

pub mod hp_bar;
pub mod input;
pub mod modal;
pub mod panel;
pub mod status_bar;

pub use hp_bar::HpBarWidget;
pub use input::InputWidget;
pub use status_bar::StatusBarWidget;
