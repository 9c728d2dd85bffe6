//! Lunaris - an interactive 3D moon phase viewer

pub mod core;
pub mod config;
pub mod phase;
pub mod scene;
pub mod render;
pub mod ui;
pub mod app;
