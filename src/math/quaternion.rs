//! Unit quaternions for rotations and rotation interpolation.
//!
//! Component order is `(x, y, z, w)`: vector part first, scalar part last.

use serde::{Deserialize, Serialize};

use super::matrix::Matrix4;
use super::vector::Vector3;
use super::EPSILON;

/// Dot products above this are treated as "the same rotation" by [`Quaternion::slerp`]
pub const SLERP_DOT_THRESHOLD: f32 = 0.9995;

/// Rotation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Quaternion { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis`
    ///
    /// The axis is assumed to be unit length; it is not renormalized.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tiny3d::math::{Quaternion, Vector3};
    /// use std::f32::consts::PI;
    ///
    /// let z = Vector3::from_cartesian(0.0, 0.0, 1.0);
    /// let q = Quaternion::from_axis_angle(&z, PI);
    /// assert!(q.w.abs() < 1e-6);
    /// assert!((q.z - 1.0).abs() < 1e-6);
    /// ```
    pub fn from_axis_angle(axis: &Vector3, angle: f32) -> Self {
        let half = angle * 0.5;
        let s = half.sin();
        Quaternion {
            x: axis.x() * s,
            y: axis.y() * s,
            z: axis.z() * s,
            w: half.cos(),
        }
    }

    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit quaternion in the same direction; degenerate input yields the identity
    pub fn normalized(&self) -> Quaternion {
        let magnitude = self.magnitude();
        if magnitude > EPSILON {
            Quaternion {
                x: self.x / magnitude,
                y: self.y / magnitude,
                z: self.z / magnitude,
                w: self.w / magnitude,
            }
        } else {
            Quaternion::IDENTITY
        }
    }

    /// Closed-form rotation matrix embedded in the top-left 3×3 of a [`Matrix4`]
    pub fn to_matrix(&self) -> Matrix4 {
        let Quaternion { x, y, z, w } = *self;
        let (x2, y2, z2) = (x * x, y * y, z * z);

        let mut m = Matrix4::identity();
        m.set(0, 0, 1.0 - 2.0 * y2 - 2.0 * z2);
        m.set(1, 0, 2.0 * x * y + 2.0 * z * w);
        m.set(2, 0, 2.0 * x * z - 2.0 * y * w);

        m.set(0, 1, 2.0 * x * y - 2.0 * z * w);
        m.set(1, 1, 1.0 - 2.0 * x2 - 2.0 * z2);
        m.set(2, 1, 2.0 * y * z + 2.0 * x * w);

        m.set(0, 2, 2.0 * x * z + 2.0 * y * w);
        m.set(1, 2, 2.0 * y * z - 2.0 * x * w);
        m.set(2, 2, 1.0 - 2.0 * x2 - 2.0 * y2);
        m
    }

    /// Spherical linear interpolation along the shorter 4D arc
    ///
    /// `t` is clamped to [0, 1]. When the inputs are within
    /// [`SLERP_DOT_THRESHOLD`] of each other the result is a normalized lerp,
    /// which avoids dividing by a vanishing `sin`. The result is always
    /// renormalized.
    pub fn slerp(qa: &Quaternion, qb: &Quaternion, t: f32) -> Quaternion {
        let t = t.clamp(0.0, 1.0);
        let mut dot = qa.dot(qb);

        let qb = if dot < 0.0 {
            dot = -dot;
            -*qb
        } else {
            *qb
        };

        let result = if dot > SLERP_DOT_THRESHOLD {
            Quaternion {
                x: qa.x + t * (qb.x - qa.x),
                y: qa.y + t * (qb.y - qa.y),
                z: qa.z + t * (qb.z - qa.z),
                w: qa.w + t * (qb.w - qa.w),
            }
        } else {
            let theta_0 = dot.acos();
            let theta = theta_0 * t;
            let sin_theta = theta.sin();
            let sin_theta_0 = theta_0.sin();

            let scale_a = theta.cos() - dot * sin_theta / sin_theta_0;
            let scale_b = sin_theta / sin_theta_0;

            Quaternion {
                x: scale_a * qa.x + scale_b * qb.x,
                y: scale_a * qa.y + scale_b * qb.y,
                z: scale_a * qa.z + scale_b * qb.z,
                w: scale_a * qa.w + scale_b * qb.w,
            }
        };

        result.normalized()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}

/// Hands a rotation to nalgebra, e.g. to compose it with
/// [`nalgebra::UnitQuaternion`] maths
impl From<Quaternion> for nalgebra::Quaternion<f32> {
    fn from(q: Quaternion) -> Self {
        nalgebra::Quaternion::new(q.w, q.x, q.y, q.z)
    }
}
