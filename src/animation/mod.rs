//! # Keyframe-free Animation Helpers
//!
//! Time-driven transforms for scene objects:
//!
//! - [`bezier_cubic`] evaluates one cubic Bézier segment
//! - [`BezierPath`] loops a translation along a segment with a fixed period
//! - [`RotationTrack`] swings between two orientations with quaternion slerp,
//!   going `from → to → from` once per two periods
//!
//! Times are in seconds and may be any finite value; negative times wrap the
//! same way positive ones do.

use serde::{Deserialize, Serialize};

use crate::math::{Matrix4, Quaternion, Vector3};

/// Point on the cubic Bézier curve through control points `p0..p3`
///
/// `P(t) = (1-t)³ P0 + 3(1-t)² t P1 + 3(1-t) t² P2 + t³ P3`, with `t` clamped
/// to [0, 1].
///
/// # Examples
///
/// ```rust
/// use tiny3d::animation::bezier_cubic;
/// use tiny3d::math::Vector3;
///
/// let p0 = Vector3::from_cartesian(0.0, 0.0, 0.0);
/// let p3 = Vector3::from_cartesian(3.0, 0.0, 0.0);
/// let p1 = Vector3::from_cartesian(1.0, 0.0, 0.0);
/// let p2 = Vector3::from_cartesian(2.0, 0.0, 0.0);
/// let mid = bezier_cubic(&p0, &p1, &p2, &p3, 0.5);
/// assert!((mid.x() - 1.5).abs() < 1e-6);
/// ```
pub fn bezier_cubic(p0: &Vector3, p1: &Vector3, p2: &Vector3, p3: &Vector3, t: f32) -> Vector3 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;

    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;

    Vector3::from_cartesian(
        b0 * p0.x() + b1 * p1.x() + b2 * p2.x() + b3 * p3.x(),
        b0 * p0.y() + b1 * p1.y() + b2 * p2.y() + b3 * p3.y(),
        b0 * p0.z() + b1 * p1.z() + b2 * p2.z() + b3 * p3.z(),
    )
}

/// Fraction of the way through the current loop of length `period`
///
/// A non-positive period pins the fraction at 0.
fn loop_fraction(time: f32, period: f32) -> f32 {
    if period <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    (time.rem_euclid(period) / period).clamp(0.0, 1.0)
}

/// A translation that runs along one Bézier segment every `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierPath {
    pub control_points: [Vector3; 4],
    pub duration: f32,
}

impl BezierPath {
    pub fn new(control_points: [Vector3; 4], duration: f32) -> Self {
        BezierPath {
            control_points,
            duration,
        }
    }

    /// Position at `time`, restarting from the first control point each loop
    pub fn position_at(&self, time: f32) -> Vector3 {
        let [p0, p1, p2, p3] = &self.control_points;
        bezier_cubic(p0, p1, p2, p3, loop_fraction(time, self.duration))
    }
}

/// Orientation that swings from `from` to `to` over `duration` seconds and back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationTrack {
    pub from: Quaternion,
    pub to: Quaternion,
    pub duration: f32,
}

impl RotationTrack {
    pub fn new(from: Quaternion, to: Quaternion, duration: f32) -> Self {
        RotationTrack { from, to, duration }
    }

    /// Slerp parameter at `time`: rises 0 → 1 over one period, then falls back
    pub fn progress_at(&self, time: f32) -> f32 {
        let phase = 2.0 * loop_fraction(time, 2.0 * self.duration);
        if phase <= 1.0 {
            phase
        } else {
            2.0 - phase
        }
    }

    pub fn rotation_at(&self, time: f32) -> Quaternion {
        Quaternion::slerp(&self.from, &self.to, self.progress_at(time))
    }
}

/// Model matrix of an object whose base transform rides along `path`
///
/// Returns `translate(path(time)) * base`, or `base` when there is no path.
pub fn animated_model_matrix(base: &Matrix4, path: Option<&BezierPath>, time: f32) -> Matrix4 {
    match path {
        Some(path) => {
            let p = path.position_at(time);
            Matrix4::translate(p.x(), p.y(), p.z()) * *base
        }
        None => *base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::f32::consts::PI;

    fn v(x: f32, y: f32, z: f32) -> Vector3 {
        Vector3::from_cartesian(x, y, z)
    }

    fn arc() -> [Vector3; 4] {
        [v(0.0, 0.0, 0.0), v(0.0, 2.0, 0.0), v(4.0, 2.0, 0.0), v(4.0, 0.0, 1.0)]
    }

    #[test]
    fn test_bezier_endpoints() {
        let [p0, p1, p2, p3] = arc();
        assert_eq!(bezier_cubic(&p0, &p1, &p2, &p3, 0.0), p0);
        assert_eq!(bezier_cubic(&p0, &p1, &p2, &p3, 1.0), p3);
    }

    #[test]
    fn test_bezier_clamps_parameter() {
        let [p0, p1, p2, p3] = arc();
        assert_eq!(bezier_cubic(&p0, &p1, &p2, &p3, -3.0), p0);
        assert_eq!(bezier_cubic(&p0, &p1, &p2, &p3, 7.0), p3);
    }

    #[test]
    fn test_bezier_midpoint() {
        let [p0, p1, p2, p3] = arc();
        let mid = bezier_cubic(&p0, &p1, &p2, &p3, 0.5);
        // (P0 + 3 P1 + 3 P2 + P3) / 8
        assert_abs_diff_eq!(mid.x(), 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mid.y(), 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(mid.z(), 0.125, epsilon = 1e-6);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(1.0, 0.5)]
    #[case(2.0, 0.0)]
    #[case(5.0, 0.5)]
    #[case(-0.5, 0.75)]
    fn test_loop_fraction(#[case] time: f32, #[case] expected: f32) {
        assert_abs_diff_eq!(loop_fraction(time, 2.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_loop_fraction_degenerate_period() {
        assert_eq!(loop_fraction(3.0, 0.0), 0.0);
        assert_eq!(loop_fraction(3.0, -1.0), 0.0);
        assert_eq!(loop_fraction(f32::NAN, 1.0), 0.0);
    }

    #[test]
    fn test_path_loops() {
        let path = BezierPath::new(arc(), 4.0);
        let start = path.position_at(0.0);
        let again = path.position_at(8.0);
        assert_abs_diff_eq!(start.x(), again.x(), epsilon = 1e-5);
        assert_abs_diff_eq!(start.y(), again.y(), epsilon = 1e-5);

        let half = path.position_at(2.0);
        assert_abs_diff_eq!(half.x(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_path_with_zero_duration_stays_at_start() {
        let path = BezierPath::new(arc(), 0.0);
        assert_eq!(path.position_at(12.3), arc()[0]);
    }

    #[test]
    fn test_rotation_track_ping_pong() {
        let z = v(0.0, 0.0, 1.0);
        let track = RotationTrack::new(Quaternion::IDENTITY, Quaternion::from_axis_angle(&z, PI / 2.0), 1.0);

        assert_abs_diff_eq!(track.progress_at(0.0), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(track.progress_at(0.5), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(track.progress_at(1.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(track.progress_at(1.5), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(track.progress_at(2.0), 0.0, epsilon = 1e-6);

        let there = track.rotation_at(1.0);
        let expected = Quaternion::from_axis_angle(&z, PI / 2.0);
        assert_abs_diff_eq!(there.dot(&expected).abs(), 1.0, epsilon = 1e-5);

        // Quarter of the swing is a 22.5 degree turn
        let q = track.rotation_at(0.25);
        let quarter = Quaternion::from_axis_angle(&z, PI / 8.0);
        assert_abs_diff_eq!(q.dot(&quarter).abs(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(q.magnitude(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_animated_model_matrix() {
        let base = Matrix4::scale(2.0, 2.0, 2.0);
        assert_eq!(animated_model_matrix(&base, None, 3.0), base);

        let path = BezierPath::new([v(1.0, 0.0, 0.0); 4], 1.0);
        let m = animated_model_matrix(&base, Some(&path), 0.3);
        let p = m.transform_point(&v(1.0, 1.0, 1.0));
        assert_abs_diff_eq!(p.x(), 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.y(), 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.z(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_path_serde() {
        let json = r#"{"control_points":[[0,0,0],[1,0,0],[2,0,0],[3,0,0]],"duration":2.5}"#;
        let path: BezierPath = serde_json::from_str(json).unwrap();
        assert_eq!(path.duration, 2.5);
        assert_eq!(path.control_points[3].x(), 3.0);
    }
}
