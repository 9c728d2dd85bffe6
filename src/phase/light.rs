//! Light direction model.
//!
//! A single scalar drives the light angle: either the free-running playback
//! clock (continuous sweep) or a fixed phase value (snapped angle).

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

/// Geometry of the orbiting light relative to the lit body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightModel {
    /// Distance of the light from the orbit axis.
    pub radius: f32,
    /// Fixed height of the light above the orbit plane.
    pub height: f32,
    /// Center of the lit body.
    pub body_center: [f32; 3],
    /// Scale applied to the input value.
    pub time_scale: f32,
    /// Scale applied to the animation speed.
    pub speed_scale: f32,
}

impl Default for LightModel {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 0.0,
            body_center: [0.0; 3],
            time_scale: 0.2,
            speed_scale: 0.05,
        }
    }
}

impl LightModel {
    /// Orbit angle in radians for a value and speed, wrapped to `[0, 2π)`.
    ///
    /// `value` is `f64` because it is usually elapsed playback time; the
    /// product is reduced before narrowing so long sessions stay smooth.
    #[inline]
    pub fn angle(&self, value: f64, speed: f32) -> f32 {
        let scale = f64::from(self.time_scale) * f64::from(speed) * f64::from(self.speed_scale);
        (value * scale).rem_euclid(TAU) as f32
    }

    /// World-space light position for a value and speed.
    pub fn light_position(&self, value: f64, speed: f32) -> Vec3 {
        let (sin, cos) = self.angle(value, speed).sin_cos();
        Vec3::new(cos * self.radius, self.height, sin * self.radius)
    }

    /// Unit vector from the body center toward the light.
    ///
    /// Falls back to +X if the light sits on the body center.
    pub fn direction(&self, value: f64, speed: f32) -> Vec3 {
        (self.light_position(value, speed) - Vec3::from(self.body_center))
            .try_normalize()
            .unwrap_or(Vec3::X)
    }

    /// Whether the model cannot yield a usable direction: a non-finite
    /// parameter, or an orbit that passes through the body center.
    pub fn is_degenerate(&self) -> bool {
        let center = Vec3::from(self.body_center);
        let all_finite = self.radius.is_finite()
            && self.height.is_finite()
            && center.is_finite()
            && self.time_scale.is_finite()
            && self.speed_scale.is_finite();
        if !all_finite {
            return true;
        }
        // The orbit circle passes through the center only if the center lies
        // on it; the closest approach is |dist_in_plane - radius| in xz.
        let planar = glam::Vec2::new(center.x, center.z).length();
        let dy = self.height - center.y;
        (planar - self.radius.abs()).abs() < 1e-6 && dy.abs() < 1e-6
    }
}

/// Light direction under the default model.
#[inline]
pub fn compute_light_direction(value: f32, speed: f32) -> Vec3 {
    LightModel::default().direction(f64::from(value), speed)
}
