/// Back-face culling and flat diffuse shading
use nalgebra::{Point3, Vector3};

use crate::geometry::Color;

/// Unit face normal `(p1 - p0) x (p2 - p0)`.
///
/// Returns `None` for degenerate (zero-area) or non-finite triangles, which
/// the pipeline treats as invisible.
pub fn face_normal(points: &[Point3<f32>; 3]) -> Option<Vector3<f32>> {
    let line1 = points[1] - points[0];
    let line2 = points[2] - points[0];

    line1
        .cross(&line2)
        .try_normalize(f32::MIN_POSITIVE)
        .filter(|n| n.iter().all(|c| c.is_finite()))
}

/// A face is visible when its normal points back toward the camera.
pub fn is_visible(normal: &Vector3<f32>, p0: &Point3<f32>, camera: &Point3<f32>) -> bool {
    normal.dot(&(p0 - camera)) < 0.0
}

/// Greyscale diffuse colour for a unit `light` and unit `normal`.
pub fn diffuse(light: &Vector3<f32>, normal: &Vector3<f32>) -> Color {
    Color::grey(light.dot(normal))
}
