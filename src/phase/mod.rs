//! Lunar phase model and playback control.
//!
//! [`light`] maps a scalar (clock time or phase value) to a light direction,
//! [`catalog`] holds the named phases, and [`PlaybackController`] decides each
//! frame which scalar drives the light.

pub mod catalog;
pub mod clock;
pub mod light;
pub mod playback;

pub use catalog::{catalog, PhaseDefinition, PhaseId};
pub use clock::PlaybackClock;
pub use light::{compute_light_direction, LightModel};
pub use playback::{Effect, FrameOutput, Panel, PlaybackController, PlaybackEvent, PlaybackMode};
