//! # Animated Scene Description
//!
//! A [`SceneConfig`] holds everything needed to render an animation loop: the
//! canvas, camera, lights, and a list of objects that spin about their own
//! axis while travelling around a circle (or along a Bézier path).
//!
//! ## Defaults
//!
//! `SceneConfig::default()` is the two-ball demo: a 900×900 canvas, 90 frames
//! over 3 seconds, a 60° camera at `(0, 0, 7.5)` looking down -Z, one light
//! toward `(0.7, 0.7, -0.7)`, and two soccer balls on opposite sides of their
//! orbits. Every field may be omitted from JSON and falls back to this default.
//!
//! ## Model matrix
//!
//! For an object at loop time `t`:
//!
//! ```text
//! model = translate(orbit(t) or path(t)) * rotation(t) * scale
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use tiny3d::scene::SceneConfig;
//!
//! let scene = SceneConfig::from_json_str(r#"{ "width": 320, "height": 240, "frames": 12 }"#).unwrap();
//! assert_eq!(scene.width, 320);
//! assert_eq!(scene.objects.len(), 2);
//! assert!((scene.time_step() - 0.25).abs() < 1e-6);
//! ```

use std::f32::consts::{PI, TAU};
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::animation::{animated_model_matrix, BezierPath, RotationTrack};
use crate::canvas::Canvas;
use crate::math::{Matrix4, Quaternion, Vector3};
use crate::render::{render_wireframe, Light, LightKind, Model, RenderStats, Transforms};
use crate::{Result, Tiny3dError};

/// One animated instance of the scene's model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// Uniform scale applied before any rotation
    pub scale: f32,
    /// Axis of self-rotation; normalized before use
    pub spin_axis: Vector3,
    /// Full self-rotations per animation loop
    pub spins: f32,
    /// Radius of the circular path in the XZ plane
    pub orbit_radius: f32,
    /// Starting angle on the circular path, radians
    pub orbit_phase: f32,
    /// Replaces the circular orbit when present
    pub path: Option<BezierPath>,
    /// Replaces the spin when present
    pub rotation: Option<RotationTrack>,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        ObjectConfig {
            scale: 1.0,
            spin_axis: Vector3::from_cartesian(0.0, 1.0, 0.0),
            spins: 0.0,
            orbit_radius: 0.0,
            orbit_phase: 0.0,
            path: None,
            rotation: None,
        }
    }
}

impl ObjectConfig {
    /// Orientation at `time` within a loop of `loop_duration` seconds
    pub fn orientation_at(&self, time: f32, loop_duration: f32) -> Quaternion {
        if let Some(track) = &self.rotation {
            return track.rotation_at(time);
        }
        if loop_duration <= 0.0 {
            return Quaternion::IDENTITY;
        }
        let speed = self.spins * TAU / loop_duration;
        let angle = (time * speed).rem_euclid(TAU);
        Quaternion::from_axis_angle(&self.spin_axis.normalized(), angle)
    }

    /// Position on the circular orbit at `time`
    pub fn orbit_position_at(&self, time: f32, loop_duration: f32) -> Vector3 {
        let progress = if loop_duration > 0.0 {
            time / loop_duration
        } else {
            0.0
        };
        let angle = (self.orbit_phase + progress * TAU).rem_euclid(TAU);
        Vector3::from_cartesian(
            self.orbit_radius * angle.cos(),
            0.0,
            self.orbit_radius * angle.sin(),
        )
    }

    /// Local → world matrix at `time`
    pub fn model_matrix(&self, time: f32, loop_duration: f32) -> Matrix4 {
        let base = self.orientation_at(time, loop_duration).to_matrix()
            * Matrix4::scale(self.scale, self.scale, self.scale);

        if self.path.is_some() {
            return animated_model_matrix(&base, self.path.as_ref(), time);
        }

        let p = self.orbit_position_at(time, loop_duration);
        Matrix4::translate(p.x(), p.y(), p.z()) * base
    }
}

/// Complete description of an animation loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    /// Length of one loop in seconds
    pub duration: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position; the camera looks down -Z
    pub eye: Vector3,
    pub background: f32,
    pub line_thickness: f32,
    /// Viewport radius as a fraction of half the smaller canvas side
    pub viewport_fraction: f32,
    pub lights: Vec<Light>,
    pub objects: Vec<ObjectConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            width: 900,
            height: 900,
            frames: 90,
            duration: 3.0,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            eye: Vector3::from_cartesian(0.0, 0.0, 7.5),
            background: 0.02,
            line_thickness: 1.0,
            viewport_fraction: 0.98,
            lights: vec![Light::directional(Vector3::from_cartesian(0.7, 0.7, -0.7))],
            objects: vec![
                ObjectConfig {
                    scale: 1.2,
                    spin_axis: Vector3::from_cartesian(0.1, 1.0, 0.05),
                    spins: 2.0,
                    orbit_radius: 2.0,
                    orbit_phase: 0.0,
                    ..ObjectConfig::default()
                },
                ObjectConfig {
                    scale: 0.9,
                    spin_axis: Vector3::from_cartesian(1.0, 0.5, -0.1),
                    spins: 1.0,
                    orbit_radius: 1.2,
                    orbit_phase: PI,
                    ..ObjectConfig::default()
                },
            ],
        }
    }
}

impl SceneConfig {
    /// Parses and validates a JSON scene
    ///
    /// Light directions are normalized after parsing.
    ///
    /// # Errors
    ///
    /// [`Tiny3dError::Json`] for malformed JSON, [`Tiny3dError::Config`] when
    /// [`SceneConfig::validate`] rejects the result.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: SceneConfig = serde_json::from_str(json)?;
        config.lights = config.normalized_lights();
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Checks the values a render loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Tiny3dError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.frames == 0 {
            return Err(Tiny3dError::Config("frame count must be positive".to_string()));
        }
        if !(self.duration > 0.0) {
            return Err(Tiny3dError::Config(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(Tiny3dError::Config(format!(
                "vertical field of view must be in (0, 180) degrees, got {}",
                self.fov_y_degrees
            )));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(Tiny3dError::Config(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.line_thickness >= 0.0) {
            return Err(Tiny3dError::Config(format!(
                "line thickness must be non-negative, got {}",
                self.line_thickness
            )));
        }
        Ok(())
    }

    /// Lights with unit-length directions
    pub fn normalized_lights(&self) -> Vec<Light> {
        self.lights
            .iter()
            .map(|light| match light.kind {
                LightKind::Directional => Light::directional(light.direction),
            })
            .collect()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn projection_matrix(&self) -> Matrix4 {
        Matrix4::perspective(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio(),
            self.near,
            self.far,
        )
    }

    /// World → camera: moves the eye to the origin
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::translate(-self.eye.x(), -self.eye.y(), -self.eye.z())
    }

    pub fn viewport_radius(&self) -> f32 {
        self.width.min(self.height) as f32 / 2.0 * self.viewport_fraction
    }

    pub fn time_step(&self) -> f32 {
        if self.frames == 0 {
            return 0.0;
        }
        self.duration / self.frames as f32
    }

    pub fn frame_time(&self, frame: usize) -> f32 {
        frame as f32 * self.time_step()
    }

    /// Matrices for every object at `frame`
    pub fn frame_transforms(&self, frame: usize) -> Vec<Transforms> {
        let time = self.frame_time(frame);
        let view = self.view_matrix();
        let projection = self.projection_matrix();
        self.objects
            .iter()
            .map(|object| Transforms::new(object.model_matrix(time, self.duration), view, projection))
            .collect()
    }

    /// Canvas sized and cleared for this scene
    pub fn create_canvas(&self) -> Result<Canvas> {
        let mut canvas = Canvas::new(self.width, self.height)?;
        canvas.clear(self.background);
        Ok(canvas)
    }

    /// Clears `canvas` and draws every object at `frame`
    pub fn render_frame(&self, canvas: &mut Canvas, model: &Model, frame: usize) -> RenderStats {
        canvas.clear(self.background);

        let lights = self.normalized_lights();
        let radius = self.viewport_radius();
        let mut stats = RenderStats::default();

        for transforms in self.frame_transforms(frame) {
            stats += render_wireframe(canvas, model, &transforms, &lights, radius, self.line_thickness);
        }

        debug!("Frame {frame}: {} edges drawn", stats.edges_drawn);
        stats
    }
}
