//! Render pipelines

pub mod bloom;
pub mod display;
pub mod moon;
pub mod stars;

pub use bloom::{BloomParams, BloomPipeline};
pub use display::{DisplayParams, DisplayPipeline};
pub use moon::{MoonParams, MoonPipeline};
pub use stars::StarsPipeline;
