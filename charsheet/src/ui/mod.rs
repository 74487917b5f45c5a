//! UI module for the character sheet

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;

pub use render::render;
