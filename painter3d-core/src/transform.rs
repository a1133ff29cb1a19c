/// Model-to-world transform and the animated rotation state
use std::f32::consts::TAU;

use log::warn;
use nalgebra::{Point3, Vector3};

use crate::matrix::Mat4;

/// Animated rotation angle and the two matrices derived from it.
///
/// The matrices are always rebuilt from the angle, never composed
/// incrementally, so advancing by `dt` is the same as building at the
/// accumulated angle.
#[derive(Debug, Clone)]
pub struct Animation {
    angle: f32,
    rate: f32,
    rotation_z: Mat4,
    rotation_x: Mat4,
}

impl Animation {
    /// Zero angle with zeroed matrices; call [`advance`](Self::advance) or
    /// [`set_angle`](Self::set_angle) before the first frame.
    pub fn new(rate: f32) -> Self {
        Self {
            angle: 0.0,
            rate,
            rotation_z: Mat4::zeros(),
            rotation_x: Mat4::zeros(),
        }
    }

    /// Advance by `rate * dt` seconds and rebuild both rotations.
    ///
    /// Negative or non-finite `dt` is treated as zero. The angle wraps into `[0, 2pi)`.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 {
            dt
        } else {
            if dt < 0.0 {
                warn!("negative frame time {dt}s clamped to zero");
            }
            0.0
        };

        self.set_angle(self.angle + self.rate * dt);
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle.rem_euclid(TAU);
        self.rotation_z = Mat4::rotation_z(self.angle);
        self.rotation_x = Mat4::rotation_x(self.angle);
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn rotation_z(&self) -> &Mat4 {
        &self.rotation_z
    }

    pub fn rotation_x(&self) -> &Mat4 {
        &self.rotation_x
    }

    /// Rotate about Z, then about X, then move by `translation`.
    pub fn to_world(&self, points: &[Point3<f32>; 3], translation: &Vector3<f32>) -> [Point3<f32>; 3] {
        points.map(|p| {
            let rotated = self.rotation_x.transform_point(&self.rotation_z.transform_point(&p));
            rotated + *translation
        })
    }
}
