//! # 4×4 Homogeneous Transform Module
//!
//! `Matrix4` stores sixteen `f32` values in column-major order: element
//! `(row, col)` lives at index `col * 4 + row`, so the translation of an affine
//! transform sits in indices 12, 13 and 14. This is the same layout nalgebra
//! and OpenGL use, which makes conversion a straight copy.
//!
//! ## Composition
//!
//! `a * b` applies `b` first and `a` last. A model-view-projection chain is
//! therefore written `projection * view * model`.
//!
//! ## Examples
//!
//! ```rust
//! use tiny3d::math::{Matrix4, Vector3};
//!
//! let m = Matrix4::translate(1.0, 2.0, 3.0) * Matrix4::scale(2.0, 2.0, 2.0);
//! let p = m.transform_point(&Vector3::from_cartesian(1.0, 1.0, 1.0));
//! assert_eq!((p.x(), p.y(), p.z()), (3.0, 4.0, 5.0));
//! ```

use serde::{Deserialize, Serialize};

use super::vector::Vector3;
use super::EPSILON;

/// Column-major 4×4 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    m: [f32; 16],
}

impl Matrix4 {
    /// Wraps sixteen values already in column-major order
    pub fn from_column_major(m: [f32; 16]) -> Self {
        Matrix4 { m }
    }

    pub fn zero() -> Self {
        Matrix4 { m: [0.0; 16] }
    }

    pub fn identity() -> Self {
        let mut mat = Matrix4::zero();
        mat.m[0] = 1.0;
        mat.m[5] = 1.0;
        mat.m[10] = 1.0;
        mat.m[15] = 1.0;
        mat
    }

    pub fn translate(tx: f32, ty: f32, tz: f32) -> Self {
        let mut mat = Matrix4::identity();
        mat.m[12] = tx;
        mat.m[13] = ty;
        mat.m[14] = tz;
        mat
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut mat = Matrix4::identity();
        mat.m[0] = sx;
        mat.m[5] = sy;
        mat.m[10] = sz;
        mat
    }

    /// Right-handed rotation about +X by `angle` radians
    pub fn rotate_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut mat = Matrix4::identity();
        mat.m[5] = c;
        mat.m[6] = s;
        mat.m[9] = -s;
        mat.m[10] = c;
        mat
    }

    /// Right-handed rotation about +Y by `angle` radians
    pub fn rotate_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut mat = Matrix4::identity();
        mat.m[0] = c;
        mat.m[2] = -s;
        mat.m[8] = s;
        mat.m[10] = c;
        mat
    }

    /// Right-handed rotation about +Z by `angle` radians
    pub fn rotate_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut mat = Matrix4::identity();
        mat.m[0] = c;
        mat.m[1] = s;
        mat.m[4] = -s;
        mat.m[5] = c;
        mat
    }

    /// Fixed-axis Euler rotation `Rx * Ry * Rz`
    ///
    /// Z is applied first and X last.
    pub fn rotate_xyz(rx: f32, ry: f32, rz: f32) -> Self {
        Matrix4::rotate_x(rx) * (Matrix4::rotate_y(ry) * Matrix4::rotate_z(rz))
    }

    /// OpenGL-style asymmetric perspective frustum
    ///
    /// `near` and `far` are positive distances in front of the eye, which looks
    /// down -Z. Row 3 is `[0, 0, -1, 0]`, so clip-space `w` equals the
    /// camera-space distance `-z`.
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut mat = Matrix4::zero();
        mat.m[0] = (2.0 * near) / (right - left);
        mat.m[5] = (2.0 * near) / (top - bottom);
        mat.m[8] = (right + left) / (right - left);
        mat.m[9] = (top + bottom) / (top - bottom);
        mat.m[10] = -(far + near) / (far - near);
        mat.m[11] = -1.0;
        mat.m[14] = -(2.0 * far * near) / (far - near);
        mat
    }

    /// Symmetric perspective projection from a vertical field of view
    ///
    /// # Arguments
    ///
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect` - Width divided by height
    /// * `near`, `far` - Positive clip plane distances
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let top = near * (fov_y / 2.0).tan();
        let right = top * aspect;
        Matrix4::frustum(-right, right, -top, top, near, far)
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[col * 4 + row] = value;
    }

    pub fn as_slice(&self) -> &[f32; 16] {
        &self.m
    }

    /// Standard matrix product `self * rhs`
    ///
    /// Both operands share nalgebra's column-major layout, so the product is
    /// delegated to it.
    pub fn multiply(&self, rhs: &Matrix4) -> Matrix4 {
        Matrix4::from(self.to_nalgebra() * rhs.to_nalgebra())
    }

    /// Full 4-component product with `(x, y, z, w)`, no division
    pub fn transform_homogeneous(&self, x: f32, y: f32, z: f32, w: f32) -> [f32; 4] {
        let m = &self.m;
        [
            m[0] * x + m[4] * y + m[8] * z + m[12] * w,
            m[1] * x + m[5] * y + m[9] * z + m[13] * w,
            m[2] * x + m[6] * y + m[10] * z + m[14] * w,
            m[3] * x + m[7] * y + m[11] * z + m[15] * w,
        ]
    }

    /// Transforms a point (implicit `w = 1`)
    ///
    /// When the resulting `w` is neither 0 nor 1 (beyond epsilon) the
    /// components are divided by it, so both affine and projective matrices
    /// can be used.
    pub fn transform_point(&self, p: &Vector3) -> Vector3 {
        let [x, y, z, w] = self.transform_homogeneous(p.x(), p.y(), p.z(), 1.0);
        if w.abs() > EPSILON && (w - 1.0).abs() > EPSILON {
            Vector3::from_cartesian(x / w, y / w, z / w)
        } else {
            Vector3::from_cartesian(x, y, z)
        }
    }

    /// Transforms a direction (implicit `w = 0`); translation is ignored
    ///
    /// Only meaningful for affine matrices.
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        let [x, y, z, _] = self.transform_homogeneous(v.x(), v.y(), v.z(), 0.0);
        Vector3::from_cartesian(x, y, z)
    }

    /// Same column-major storage as an nalgebra matrix
    pub fn to_nalgebra(&self) -> nalgebra::Matrix4<f32> {
        nalgebra::Matrix4::from_column_slice(&self.m)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Matrix4::identity()
    }
}

impl std::ops::Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl From<nalgebra::Matrix4<f32>> for Matrix4 {
    fn from(mat: nalgebra::Matrix4<f32>) -> Self {
        let mut m = [0.0; 16];
        m.copy_from_slice(mat.as_slice());
        Matrix4 { m }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::f32::consts::PI;

    fn sample() -> Matrix4 {
        let mut m = [0.0; 16];
        for (i, v) in m.iter_mut().enumerate() {
            *v = (i as f32) * 0.5 - 3.0;
        }
        Matrix4::from_column_major(m)
    }

    fn assert_matrix_eq(a: &Matrix4, b: &Matrix4, epsilon: f32) {
        for (x, y) in a.as_slice().iter().zip(b.as_slice().iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = epsilon);
        }
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = sample();
        assert_eq!(Matrix4::identity() * m, m);
        assert_eq!(m * Matrix4::identity(), m);
    }

    #[test]
    fn test_multiply_matches_row_column_sums() {
        let a = sample();
        let b = Matrix4::rotate_xyz(0.3, -1.1, 2.0) * Matrix4::translate(1.0, 2.0, 3.0);

        let mut expected = Matrix4::zero();
        for row in 0..4 {
            for col in 0..4 {
                let sum = (0..4).map(|k| a.get(row, k) * b.get(k, col)).sum();
                expected.set(row, col, sum);
            }
        }
        assert_matrix_eq(&a.multiply(&b), &expected, 1e-5);
    }

    #[test]
    fn test_multiply_known_product() {
        // Scale first, then translate
        let m = Matrix4::translate(1.0, 2.0, 3.0) * Matrix4::scale(2.0, 3.0, 4.0);
        #[rustfmt::skip]
        let expected = Matrix4::from_column_major([
            2.0, 0.0, 0.0, 0.0,
            0.0, 3.0, 0.0, 0.0,
            0.0, 0.0, 4.0, 0.0,
            1.0, 2.0, 3.0, 1.0,
        ]);
        assert_eq!(m, expected);
    }

    #[test]
    fn test_multiply_is_not_commutative() {
        let t = Matrix4::translate(1.0, 0.0, 0.0);
        let r = Matrix4::rotate_z(PI / 2.0);
        let origin = Vector3::ZERO;

        // Rotate then translate: origin lands on (1, 0, 0)
        let p = (t * r).transform_point(&origin);
        assert_abs_diff_eq!(p.x(), 1.0, epsilon = 1e-6);

        // Translate then rotate: origin lands on (0, 1, 0)
        let q = (r * t).transform_point(&origin);
        assert_abs_diff_eq!(q.x(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.y(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_translate_origin() {
        let p = Matrix4::translate(4.0, -2.0, 7.5).transform_point(&Vector3::ZERO);
        assert_eq!((p.x(), p.y(), p.z()), (4.0, -2.0, 7.5));
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let v = Vector3::from_cartesian(1.0, 2.0, 3.0);
        let out = Matrix4::translate(10.0, 10.0, 10.0).transform_vector(&v);
        assert_eq!(out, v);
    }

    #[rstest]
    #[case(Matrix4::rotate_x(PI / 2.0), [0.0, 1.0, 0.0], [0.0, 0.0, 1.0])]
    #[case(Matrix4::rotate_y(PI / 2.0), [0.0, 0.0, 1.0], [1.0, 0.0, 0.0])]
    #[case(Matrix4::rotate_z(PI / 2.0), [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])]
    fn test_axis_rotations_right_handed(
        #[case] m: Matrix4,
        #[case] input: [f32; 3],
        #[case] expected: [f32; 3],
    ) {
        let out = m.transform_vector(&Vector3::from(input));
        assert_abs_diff_eq!(out.x(), expected[0], epsilon = 1e-6);
        assert_abs_diff_eq!(out.y(), expected[1], epsilon = 1e-6);
        assert_abs_diff_eq!(out.z(), expected[2], epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_xyz_order() {
        let (rx, ry, rz) = (0.4, -0.7, 1.3);
        let expected = Matrix4::rotate_x(rx) * Matrix4::rotate_y(ry) * Matrix4::rotate_z(rz);
        assert_matrix_eq(&Matrix4::rotate_xyz(rx, ry, rz), &expected, 1e-6);
    }

    #[test]
    fn test_frustum_layout() {
        let p = Matrix4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);
        assert_eq!(p.get(3, 0), 0.0);
        assert_eq!(p.get(3, 1), 0.0);
        assert_eq!(p.get(3, 2), -1.0);
        assert_eq!(p.get(3, 3), 0.0);
        assert_abs_diff_eq!(p.get(2, 2), -11.0 / 9.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.get(2, 3), -20.0 / 9.0, epsilon = 1e-6);
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = Matrix4::perspective(PI / 3.0, 1.5, 0.1, 100.0);
        let theirs = nalgebra::Perspective3::new(1.5, PI / 3.0, 0.1, 100.0).to_homogeneous();
        assert_matrix_eq(&ours, &Matrix4::from(theirs), 1e-4);
    }

    #[test]
    fn test_perspective_maps_depth_range() {
        let p = Matrix4::perspective(PI / 2.0, 1.0, 1.0, 10.0);
        let near = p.transform_point(&Vector3::from_cartesian(0.0, 0.0, -1.0));
        let far = p.transform_point(&Vector3::from_cartesian(0.0, 0.0, -10.0));
        assert_abs_diff_eq!(near.z(), -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_point_skips_divide_for_affine() {
        let m = Matrix4::scale(2.0, 3.0, 4.0);
        let p = m.transform_point(&Vector3::from_cartesian(1.0, 1.0, 1.0));
        assert_eq!((p.x(), p.y(), p.z()), (2.0, 3.0, 4.0));
    }
}
