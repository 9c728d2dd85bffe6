//! Render targets and textures

pub mod moon_texture;
pub mod targets;

pub use moon_texture::{load_surface, procedural_surface, MoonTexture};
pub use targets::{RenderTargets, DEPTH_FORMAT, HDR_FORMAT};
