//! Directional lighting for wireframe edges.
//!
//! Wireframes have no surfaces, so the renderer feeds the normalized world-space
//! edge direction in where a surface normal would normally go. An edge pointing
//! toward a light is bright; one perpendicular to it is dark.

use serde::{Deserialize, Serialize};

use crate::math::Vector3;

/// Intensity returned by [`total_lighting_intensity`] when no lights are given
pub const AMBIENT_INTENSITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Directional,
}

/// A light source
///
/// For directional lights `direction` points *toward* the light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub direction: Vector3,
}

impl Light {
    /// Directional light toward `direction`, normalized on construction
    pub fn directional(direction: Vector3) -> Self {
        Light {
            kind: LightKind::Directional,
            direction: direction.normalized(),
        }
    }
}

/// Lambertian term `max(0, normal · light_direction)` for unit inputs
pub fn lambertian_intensity(normal: &Vector3, light_direction: &Vector3) -> f32 {
    normal.dot(light_direction).max(0.0)
}

/// Sum of the Lambertian terms of every directional light, clamped to [0, 1]
///
/// An empty slice yields [`AMBIENT_INTENSITY`].
pub fn total_lighting_intensity(normal: &Vector3, lights: &[Light]) -> f32 {
    if lights.is_empty() {
        return AMBIENT_INTENSITY;
    }

    lights
        .iter()
        .map(|light| match light.kind {
            LightKind::Directional => lambertian_intensity(normal, &light.direction),
        })
        .sum::<f32>()
        .clamp(0.0, 1.0)
}
