//! Scene geometry: the moon sphere and the star backdrop

pub mod sphere;
pub mod starfield;

pub use sphere::{SphereMesh, SphereVertex};
pub use starfield::Starfield;
