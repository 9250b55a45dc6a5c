//! # Dual-Representation Vector Module
//!
//! This module provides a 3D vector that carries both its Cartesian and its
//! spherical form at all times.
//!
//! ## Synchronization Invariant
//!
//! The `Vector3` struct stores `(x, y, z)` and `(r, theta, phi)` side by side.
//! Fields are private; every constructor and mutator goes through either the
//! Cartesian path or the spherical path, and each path recomputes the other
//! half before returning. An observer can therefore never see one half patched
//! without the other.
//!
//! ## Spherical Convention
//!
//! ISO physics convention:
//! - **r**: distance from the origin
//! - **theta**: polar angle measured from +Z, in [0, π]
//! - **phi**: azimuth measured from +X in the XY plane, in [0, 2π)
//!
//! A zero-length vector has `theta = 0` and `phi = 0`.
//!
//! ## Examples
//!
//! ```rust
//! use tiny3d::math::Vector3;
//! use std::f32::consts::PI;
//!
//! let up = Vector3::from_spherical(1.0, 0.0, 0.0);
//! assert!((up.z() - 1.0).abs() < 1e-6);
//!
//! let v = Vector3::from_cartesian(0.0, 2.0, 0.0);
//! assert!((v.r() - 2.0).abs() < 1e-6);
//! assert!((v.theta() - PI / 2.0).abs() < 1e-6);
//! assert!((v.phi() - PI / 2.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::EPSILON;

const TWO_PI: f32 = 2.0 * PI;

/// Three-dimensional vector kept in Cartesian and spherical form at once
///
/// Serializes as a plain `[x, y, z]` array; the spherical half is rebuilt on
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vector3 {
    x: f32,
    y: f32,
    z: f32,
    r: f32,
    theta: f32,
    phi: f32,
}

impl Vector3 {
    /// The zero vector; its angles are zero by convention
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        r: 0.0,
        theta: 0.0,
        phi: 0.0,
    };

    /// Creates a vector from Cartesian components, computing the spherical form
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tiny3d::math::Vector3;
    ///
    /// let v = Vector3::from_cartesian(3.0, 4.0, 0.0);
    /// assert_eq!(v.r(), 5.0);
    /// ```
    pub fn from_cartesian(x: f32, y: f32, z: f32) -> Self {
        let mut v = Vector3::ZERO;
        v.set_cartesian(x, y, z);
        v
    }

    /// Creates a vector from spherical components, computing the Cartesian form
    ///
    /// # Arguments
    ///
    /// * `r` - Radius
    /// * `theta` - Polar angle from +Z in radians
    /// * `phi` - Azimuth from +X in radians
    ///
    /// # Mathematical Conversion
    ///
    /// - `x = r * sin(theta) * cos(phi)`
    /// - `y = r * sin(theta) * sin(phi)`
    /// - `z = r * cos(theta)`
    pub fn from_spherical(r: f32, theta: f32, phi: f32) -> Self {
        let mut v = Vector3::ZERO;
        v.set_spherical(r, theta, phi);
        v
    }

    /// Replaces the Cartesian components and resynchronizes the spherical ones
    pub fn set_cartesian(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;

        self.r = (x * x + y * y + z * z).sqrt();
        if self.r == 0.0 {
            self.theta = 0.0;
            self.phi = 0.0;
        } else {
            self.theta = (z / self.r).clamp(-1.0, 1.0).acos();
            self.phi = wrap_azimuth(y.atan2(x));
        }
    }

    /// Replaces the spherical components and resynchronizes the Cartesian ones
    ///
    /// Canonical input (`r >= 0`, `theta` in [0, π]) is stored as given, with
    /// `phi` wrapped into [0, 2π). Anything else is re-derived from the
    /// resulting Cartesian triple so that the stored angles stay canonical.
    pub fn set_spherical(&mut self, r: f32, theta: f32, phi: f32) {
        let sin_theta = theta.sin();
        let x = r * sin_theta * phi.cos();
        let y = r * sin_theta * phi.sin();
        let z = r * theta.cos();

        if r == 0.0 {
            *self = Vector3::ZERO;
        } else if r > 0.0 && (0.0..=PI).contains(&theta) {
            self.x = x;
            self.y = y;
            self.z = z;
            self.r = r;
            self.theta = theta;
            self.phi = wrap_azimuth(phi);
        } else {
            self.set_cartesian(x, y, z);
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    /// Radius (spherical)
    pub fn r(&self) -> f32 {
        self.r
    }

    /// Polar angle from +Z (spherical)
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Azimuth from +X (spherical)
    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// Euclidean length recomputed from the Cartesian components
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product `self × other`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tiny3d::math::Vector3;
    ///
    /// let x = Vector3::from_cartesian(1.0, 0.0, 0.0);
    /// let y = Vector3::from_cartesian(0.0, 1.0, 0.0);
    /// let z = x.cross(&y);
    /// assert_eq!(z.z(), 1.0);
    /// ```
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::from_cartesian(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the unit vector in the same direction
    ///
    /// A vector shorter than `f32::EPSILON` normalizes to [`Vector3::ZERO`]
    /// instead of failing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tiny3d::math::Vector3;
    ///
    /// let unit = Vector3::from_cartesian(3.0, 4.0, 0.0).normalized();
    /// assert!((unit.x() - 0.6).abs() < 1e-6);
    /// assert_eq!(unit.r(), 1.0);
    ///
    /// assert_eq!(Vector3::ZERO.normalized(), Vector3::ZERO);
    /// ```
    pub fn normalized(&self) -> Vector3 {
        let magnitude = self.magnitude();
        if magnitude < EPSILON {
            return Vector3::ZERO;
        }
        Vector3::unit_from_cartesian(self.x / magnitude, self.y / magnitude, self.z / magnitude)
    }

    /// Approximate normalization using [`fast_inv_sqrt`]
    ///
    /// Relative error stays below roughly 2e-3. The near-zero cutoff is the
    /// same as [`Vector3::normalized`]: the squared length is compared against
    /// `EPSILON²`.
    pub fn normalized_fast(&self) -> Vector3 {
        let magnitude_sq = self.x * self.x + self.y * self.y + self.z * self.z;
        if magnitude_sq < EPSILON * EPSILON {
            return Vector3::ZERO;
        }
        let inv = fast_inv_sqrt(magnitude_sq);
        Vector3::unit_from_cartesian(self.x * inv, self.y * inv, self.z * inv)
    }

    /// Spherical linear interpolation between two unit vectors
    ///
    /// `t` is clamped to [0, 1]. Nearly identical inputs return `a`.
    /// Collinear inputs, including exactly opposite ones, have no unique great
    /// circle; they return `a` for `t <= 0.5` and `b` otherwise. All other
    /// results are renormalized.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tiny3d::math::Vector3;
    ///
    /// let x = Vector3::from_cartesian(1.0, 0.0, 0.0);
    /// let y = Vector3::from_cartesian(0.0, 1.0, 0.0);
    /// let mid = Vector3::slerp(&x, &y, 0.5);
    /// assert!((mid.x() - mid.y()).abs() < 1e-6);
    /// assert!((mid.magnitude() - 1.0).abs() < 1e-6);
    /// ```
    pub fn slerp(a: &Vector3, b: &Vector3, t: f32) -> Vector3 {
        let t = t.clamp(0.0, 1.0);
        let dot = a.dot(b).clamp(-1.0, 1.0);
        let angle = dot.acos();

        if angle.abs() < EPSILON || (dot - 1.0).abs() < EPSILON {
            return *a;
        }

        let sin_angle = angle.sin();
        if sin_angle.abs() < EPSILON || (dot + 1.0).abs() < EPSILON {
            return if t > 0.5 { *b } else { *a };
        }

        let scale_a = ((1.0 - t) * angle).sin() / sin_angle;
        let scale_b = (t * angle).sin() / sin_angle;

        Vector3::from_cartesian(
            scale_a * a.x + scale_b * b.x,
            scale_a * a.y + scale_b * b.y,
            scale_a * a.z + scale_b * b.z,
        )
        .normalized()
    }

    /// Converts to nalgebra for linear algebra interop
    pub fn to_nalgebra(&self) -> nalgebra::Vector3<f32> {
        nalgebra::Vector3::new(self.x, self.y, self.z)
    }

    // Unit-length input only: stores r = 1 exactly.
    fn unit_from_cartesian(x: f32, y: f32, z: f32) -> Vector3 {
        Vector3 {
            x,
            y,
            z,
            r: 1.0,
            theta: z.clamp(-1.0, 1.0).acos(),
            phi: wrap_azimuth(y.atan2(x)),
        }
    }
}

/// Bit-level reciprocal square root approximation for 32-bit floats
///
/// One Newton-Raphson step after the magic-constant initial guess.
#[inline]
pub fn fast_inv_sqrt(number: f32) -> f32 {
    let half = number * 0.5;
    let bits = 0x5f37_59df - (number.to_bits() >> 1);
    let y = f32::from_bits(bits);
    y * (1.5 - half * y * y)
}

fn wrap_azimuth(phi: f32) -> f32 {
    let wrapped = phi.rem_euclid(TWO_PI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Vector3::ZERO
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Vector3::from_cartesian(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl From<nalgebra::Vector3<f32>> for Vector3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Vector3::from_cartesian(v.x, v.y, v.z)
    }
}

impl std::ops::Add for Vector3 {
    type Output = Vector3;

    fn add(self, other: Vector3) -> Vector3 {
        Vector3::from_cartesian(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, other: Vector3) -> Vector3 {
        Vector3::from_cartesian(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, scalar: f32) -> Vector3 {
        Vector3::from_cartesian(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::from_cartesian(-self.x, -self.y, -self.z)
    }
}
