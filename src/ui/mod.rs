//! Control surface: view model and keyboard bindings

pub mod control_bar;
pub mod keymap;

pub use control_bar::ControlBar;
pub use keymap::{map_key, UiAction};
