//! Tiny3d: a software wireframe renderer
//!
//! This crate projects polyhedral models through model, view and perspective
//! transforms and draws their edges as anti-aliased grayscale lines on a
//! floating-point canvas, optionally clipped to a circle.
//!
//! The pieces, leaves first:
//!
//! - [`math`]: dual Cartesian/spherical vectors, quaternions, 4×4 matrices
//! - [`canvas`]: sub-pixel plotting, thick lines, circular viewport, PGM export
//! - [`render`]: vertex projection, depth ordering, edge lighting
//! - [`loader`]: OBJ-subset model input
//! - [`animation`] and [`scene`]: time-driven transforms and scene files

use thiserror::Error;

pub mod animation;
pub mod canvas;
pub mod loader;
pub mod math;
pub mod render;
pub mod scene;

// Re-export commonly used types
pub use canvas::Canvas;
pub use math::{Matrix4, Quaternion, Vector3};
pub use render::{render_wireframe, Light, Model, RenderStats, Transforms};
pub use scene::SceneConfig;

/// Main error type for the tiny3d library
#[derive(Debug, Error)]
pub enum Tiny3dError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Model contains no vertices")]
    EmptyModel,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tiny3d operations
pub type Result<T> = std::result::Result<T, Tiny3dError>;
