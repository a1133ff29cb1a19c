/// 4x4 homogeneous matrices for the fixed-function pipeline
///
/// Points are treated as row vectors `[x, y, z, 1]` and multiplied on the
/// left (`v * M`), so translation lives in row 3 and the perspective `w`
/// comes out of column 3.
use std::ops::{Index, IndexMut};

use nalgebra::{Matrix4, Point3, Vector4};

use crate::error::PipelineError;

/// Dense 4x4 matrix addressed as `m[(row, col)]`.
///
/// `Default` is all zeros; nothing becomes the identity implicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(Matrix4<f32>);

impl Mat4 {
    pub fn zeros() -> Self {
        Self(Matrix4::zeros())
    }

    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Build the perspective projection matrix.
    ///
    /// `aspect_ratio` is height over width. Fails when `far == near`.
    pub fn perspective(
        aspect_ratio: f32,
        fov_degrees: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, PipelineError> {
        if far == near {
            return Err(PipelineError::DegenerateFrustum { near, far });
        }

        let fov_rad = 1.0 / (fov_degrees * 0.5).to_radians().tan();

        let mut m = Self::zeros();
        m[(0, 0)] = aspect_ratio * fov_rad;
        m[(1, 1)] = fov_rad;
        m[(2, 2)] = far / (far - near);
        m[(3, 2)] = (-far * near) / (far - near);
        m[(2, 3)] = 1.0;
        m[(3, 3)] = 0.0;
        Ok(m)
    }

    /// Rotation about the Z axis by `theta`.
    pub fn rotation_z(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();

        let mut m = Self::zeros();
        m[(0, 0)] = cos;
        m[(0, 1)] = sin;
        m[(1, 0)] = -sin;
        m[(1, 1)] = cos;
        m[(2, 2)] = 1.0;
        m[(3, 3)] = 1.0;
        m
    }

    /// Rotation about the X axis by `theta / 2`.
    ///
    /// The X axis deliberately turns at half the rate of the Z axis so the
    /// animation tumbles instead of spinning in a plane.
    pub fn rotation_x(theta: f32) -> Self {
        let (sin, cos) = (theta * 0.5).sin_cos();

        let mut m = Self::zeros();
        m[(0, 0)] = 1.0;
        m[(1, 1)] = cos;
        m[(1, 2)] = sin;
        m[(2, 1)] = -sin;
        m[(2, 2)] = cos;
        m[(3, 3)] = 1.0;
        m
    }

    /// Multiply `[x, y, z, 1]` by this matrix and divide by `w` unless it is zero.
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let o = Vector4::new(point.x, point.y, point.z, 1.0).transpose() * self.0;
        let w = o[3];

        if w != 0.0 {
            Point3::new(o[0] / w, o[1] / w, o[2] / w)
        } else {
            Point3::new(o[0], o[1], o[2])
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f32;

    fn index(&self, index: (usize, usize)) -> &f32 {
        &self.0[index]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f32 {
        &mut self.0[index]
    }
}
