//! Vector, quaternion and matrix kernel.
//!
//! All math runs in `f32`. Degenerate inputs (zero-length vectors, collinear
//! interpolation endpoints, vanishing homogeneous `w`) never produce errors;
//! each operation documents the fallback value it returns instead.

pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use matrix::Matrix4;
pub use quaternion::Quaternion;
pub use vector::Vector3;

/// Tolerance used for every near-zero test in the kernel
pub const EPSILON: f32 = f32::EPSILON;
