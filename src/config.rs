//! Viewer configuration.
//!
//! Every field has a default matching the classic moon scene, so a config
//! file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::phase::{LightModel, PhaseId};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full viewer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    /// Orbit of the light around the moon.
    pub light: LightModel,
    /// Bounds of the animation speed control.
    pub speed: SpeedRange,
    pub bloom: BloomConfig,
    /// Tone mapping exposure.
    pub exposure: f32,
    pub starfield: StarfieldConfig,
    pub sphere: SphereConfig,
    /// Moon albedo texture. A procedural texture is used when unset.
    pub texture_path: Option<PathBuf>,
    /// Start locked to this phase instead of animating.
    pub initial_phase: Option<PhaseId>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            light: LightModel::default(),
            speed: SpeedRange::default(),
            bloom: BloomConfig::default(),
            exposure: 1.0,
            starfield: StarfieldConfig::default(),
            sphere: SphereConfig::default(),
            texture_path: None,
            initial_phase: None,
        }
    }
}

impl ViewerConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Reject values the viewer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(Error::Config(format!("camera fov {} out of (0, 180)", cam.fov_degrees)));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(Error::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got {} / {}",
                cam.near, cam.far
            )));
        }
        if self.light.is_degenerate() {
            return Err(Error::Config("light orbit passes through the body center".to_string()));
        }
        self.speed.validate()?;
        if !(self.exposure.is_finite() && self.exposure > 0.0) {
            return Err(Error::Config(format!("exposure must be positive, got {}", self.exposure)));
        }
        let bloom = &self.bloom;
        if !(bloom.strength >= 0.0 && bloom.radius >= 0.0 && bloom.threshold >= 0.0) {
            return Err(Error::Config("bloom parameters must be non-negative".to_string()));
        }
        let segments = (self.sphere.width_segments, self.sphere.height_segments);
        if segments.0 < 3 || segments.1 < 2 {
            return Err(Error::Config(format!(
                "sphere needs at least 3x2 segments, got {}x{}",
                segments.0, segments.1
            )));
        }
        if segments.0 > MAX_SPHERE_SEGMENTS || segments.1 > MAX_SPHERE_SEGMENTS {
            return Err(Error::Config(format!(
                "sphere segments limited to {}, got {}x{}",
                MAX_SPHERE_SEGMENTS, segments.0, segments.1
            )));
        }
        if !(self.sphere.radius > 0.0) {
            return Err(Error::Config(format!("sphere radius must be positive, got {}", self.sphere.radius)));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Window configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lunaris".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Camera placement and projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-25.0, 0.0, 40.0],
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Allowed animation speeds, mirroring a slider widget.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    /// Speed at startup.
    pub initial: f32,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 10.0,
            step: 1.0,
            initial: 4.0,
        }
    }
}

impl SpeedRange {
    /// Clamp a requested speed into the range.
    pub fn clamp(&self, speed: f32) -> f32 {
        speed.clamp(self.min, self.max)
    }

    /// Speed one step above `current`, clamped.
    pub fn step_up(&self, current: f32) -> f32 {
        self.clamp(current + self.step)
    }

    /// Speed one step below `current`, clamped.
    pub fn step_down(&self, current: f32) -> f32 {
        self.clamp(current - self.step)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.min, self.max, self.step, self.initial]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min <= 0.0 || self.max < self.min || self.step <= 0.0 {
            return Err(Error::Config(format!(
                "speed range must satisfy 0 < min <= max and step > 0, got {:?}",
                self
            )));
        }
        if !(self.min..=self.max).contains(&self.initial) {
            return Err(Error::Config(format!(
                "initial speed {} outside [{}, {}]",
                self.initial, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Bloom post-process parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    /// Weight of the blurred highlights in the final image.
    pub strength: f32,
    /// Blur spread, as a fraction of the kernel reach.
    pub radius: f32,
    /// Luminance above which a pixel contributes to bloom.
    pub threshold: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            strength: 0.05,
            radius: 0.1,
            threshold: 0.1,
        }
    }
}

/// Random star backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: u32,
    /// Stars spread over [-extent / 2, extent / 2) in x and y.
    pub extent: f32,
    /// Stars sit between z = -depth and z = 0.
    pub depth: f32,
    pub seed: u64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 100,
            extent: 2000.0,
            depth: 1000.0,
            seed: 0x5EED_1DEA,
        }
    }
}

/// Upper bound on sphere segments per axis; keeps vertex and index counts
/// well inside `u32`.
pub const MAX_SPHERE_SEGMENTS: u32 = 1024;

/// Moon mesh tessellation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            width_segments: 50,
            height_segments: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
