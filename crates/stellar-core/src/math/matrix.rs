// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Mat4` type and associated operations.

use super::{Vec3, Vec4, EPSILON};
use std::ops::{Index, Mul};

/// A 4x4 column-major matrix, used for 3D transformations.
///
/// Matrices multiply column vectors (`m * v`), so a product `a * b` applies
/// `b` first and `a` second. The memory layout is column-major, which is what
/// the shader constant packing in [`crate::renderer::shader`] uploads.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a matrix from 16 floats laid out column after column.
    #[inline]
    pub fn from_cols_array(a: &[f32; 16]) -> Self {
        Self::from_cols(
            Vec4::new(a[0], a[1], a[2], a[3]),
            Vec4::new(a[4], a[5], a[6], a[7]),
            Vec4::new(a[8], a[9], a[10], a[11]),
            Vec4::new(a[12], a[13], a[14], a[15]),
        )
    }

    /// Returns the 16 elements of the matrix, column after column.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        bytemuck::cast(*self)
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
            self.cols[3][index],
        )
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::from_vec3(v, 1.0))
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::X * scale.x,
            Vec4::Y * scale.y,
            Vec4::Z * scale.z,
            Vec4::W,
        )
    }

    /// Creates a matrix for a right-handed rotation around the Y-axis.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a rotation around the Z-axis.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Creates a right-handed perspective projection matrix with a [0, 1] depth range.
    ///
    /// # Panics
    /// Panics unless `0 < z_near < z_far`.
    #[inline]
    pub fn perspective_rh_zo(fov_y_radians: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        assert!(z_near > 0.0 && z_far > z_near);
        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let range = z_far / (z_near - z_far);
        Self::from_cols(
            Vec4::new(f / aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, range, -1.0),
            Vec4::new(0.0, 0.0, range * z_near, 0.0),
        )
    }

    /// Creates a right-handed view matrix for a camera at `eye` looking at `target`.
    ///
    /// Returns `None` if `eye` and `target` coincide or `up` is parallel to the
    /// view direction.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let forward = target - eye;
        if forward.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let f = forward.normalize();
        let s = f.cross(up);
        if s.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let s = s.normalize();
        let u = s.cross(f);

        Some(Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        ))
    }

    /// Returns the translation part (fourth column) of the matrix.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Returns the transpose of the matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            self.get_row(0),
            self.get_row(1),
            self.get_row(2),
            self.get_row(3),
        )
    }

    /// Computes the determinant of the matrix.
    pub fn determinant(&self) -> f32 {
        let f = SubFactors::new(&self.to_cols_array());
        f.determinant()
    }

    /// Computes the general inverse of the matrix.
    ///
    /// Returns `None` only when the determinant is exactly zero or not finite.
    /// Nearly singular matrices produce a numerically poor result instead.
    pub fn inverse(&self) -> Option<Self> {
        let a = self.to_cols_array();
        let f = SubFactors::new(&a);
        let det = f.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] = a;
        let b = f.b;

        let out = [
            a11 * b[11] - a12 * b[10] + a13 * b[9],
            a02 * b[10] - a01 * b[11] - a03 * b[9],
            a31 * b[5] - a32 * b[4] + a33 * b[3],
            a22 * b[4] - a21 * b[5] - a23 * b[3],
            a12 * b[8] - a10 * b[11] - a13 * b[7],
            a00 * b[11] - a02 * b[8] + a03 * b[7],
            a32 * b[2] - a30 * b[5] - a33 * b[1],
            a20 * b[5] - a22 * b[2] + a23 * b[1],
            a10 * b[10] - a11 * b[8] + a13 * b[6],
            a01 * b[8] - a00 * b[10] - a03 * b[6],
            a30 * b[4] - a31 * b[2] + a33 * b[0],
            a21 * b[2] - a20 * b[4] - a23 * b[0],
            a11 * b[7] - a10 * b[9] - a12 * b[6],
            a00 * b[9] - a01 * b[7] + a02 * b[6],
            a31 * b[1] - a30 * b[3] - a32 * b[0],
            a20 * b[3] - a21 * b[1] + a22 * b[0],
        ];
        Some(Self::from_cols_array(&out.map(|v| v * inv_det)))
    }

    /// Compares two matrices element by element with an absolute tolerance.
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.to_cols_array()
            .iter()
            .zip(other.to_cols_array().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

/// The twelve 2x2 sub-determinants shared by the determinant and the inverse.
struct SubFactors {
    b: [f32; 12],
}

impl SubFactors {
    fn new(a: &[f32; 16]) -> Self {
        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] = *a;
        Self {
            b: [
                a00 * a11 - a01 * a10,
                a00 * a12 - a02 * a10,
                a00 * a13 - a03 * a10,
                a01 * a12 - a02 * a11,
                a01 * a13 - a03 * a11,
                a02 * a13 - a03 * a12,
                a20 * a31 - a21 * a30,
                a20 * a32 - a22 * a30,
                a20 * a33 - a23 * a30,
                a21 * a32 - a22 * a31,
                a21 * a33 - a23 * a31,
                a22 * a33 - a23 * a32,
            ],
        }
    }

    fn determinant(&self) -> f32 {
        let b = &self.b;
        b[0] * b[11] - b[1] * b[10] + b[2] * b[9] + b[3] * b[8] - b[4] * b[7] + b[5] * b[6]
    }
}

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`. `rhs` is applied first.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    /// Allows accessing a matrix column by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, FRAC_PI_4, PI};

    fn mat4_approx_eq(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(&b, EPSILON)
    }

    #[test]
    fn test_identity() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert!(mat4_approx_eq(m * Mat4::IDENTITY, m));
        assert!(mat4_approx_eq(Mat4::IDENTITY * m, m));
    }

    #[test]
    fn test_cols_array_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0));
        let a = m.to_cols_array();
        assert_eq!(&a[12..15], &[4.0, 5.0, 6.0]);
        assert_eq!(Mat4::from_cols_array(&a), m);
    }

    #[test]
    fn test_multiplication_applies_rhs_first() {
        let t = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let r = Mat4::from_rotation_z(PI / 2.0);
        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);

        // Rotate (1,0,0) to (0,1,0), then translate.
        let moved = (t * r) * p;
        assert!(approx_eq(moved.x, 10.0));
        assert!(approx_eq(moved.y, 1.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::from_rotation_y(FRAC_PI_4)
            * Mat4::from_scale(Vec3::new(2.0, 0.5, 4.0));
        let inv = m.inverse().expect("matrix should be invertible");
        assert!(mat4_approx_eq(m * inv, Mat4::IDENTITY));
        assert!(mat4_approx_eq(inv * m, Mat4::IDENTITY));
    }

    #[test]
    fn test_inverse_of_small_scale_is_not_rejected() {
        let m = Mat4::from_scale(Vec3::new(0.01, 0.01, 0.01));
        let inv = m.inverse().expect("small but regular matrix");
        assert!((inv.cols[0].x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_inverse_singular_is_none() {
        assert!(Mat4::ZERO.inverse().is_none());
        assert!(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)).inverse().is_none());
    }

    #[test]
    fn test_determinant() {
        assert!(approx_eq(Mat4::IDENTITY.determinant(), 1.0));
        let s = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        assert!(approx_eq(s.determinant(), 24.0));
    }

    #[test]
    fn test_transpose() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let t = m.transpose();
        assert_eq!(t.get_row(3), Vec4::W);
        assert_eq!(t.cols[0].w, 1.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_look_at_rejects_degenerate_input() {
        assert!(Mat4::look_at_rh(Vec3::ZERO, Vec3::ZERO, Vec3::Y).is_none());
        assert!(Mat4::look_at_rh(Vec3::ZERO, Vec3::Y, Vec3::Y).is_none());
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap();
        let origin = view * Vec4::W;
        assert!(approx_eq(origin.z, -5.0));
    }
}
