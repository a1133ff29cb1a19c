/// Perspective projection and screen mapping
use nalgebra::Point3;

use crate::error::PipelineError;
use crate::geometry::Color;
use crate::matrix::Mat4;

/// Screen size in pixels (or character cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Height over width, as the projection matrix expects.
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Map normalised `[-1, 1]` x/y to `[0, width]` x `[0, height]`; z passes through.
    pub fn to_screen(&self, ndc: &Point3<f32>) -> Point3<f32> {
        Point3::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (ndc.y + 1.0) * 0.5 * self.height as f32,
            ndc.z,
        )
    }

    /// Project a world-space point and map it onto this viewport.
    pub fn project(&self, projection: &Mat4, point: &Point3<f32>) -> Point3<f32> {
        self.to_screen(&projection.transform_point(point))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000, 800)
    }
}

/// A visible triangle in screen space, ready for a rasterizer.
///
/// `x`/`y` are screen coordinates; `z` is the post-projection depth and is
/// only used for ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTriangle {
    pub points: [Point3<f32>; 3],
    pub color: Color,
}

impl DrawTriangle {
    pub fn average_depth(&self) -> f32 {
        (self.points[0].z + self.points[1].z + self.points[2].z) / 3.0
    }

    pub fn screen_points(&self) -> [(f32, f32); 3] {
        self.points.map(|p| (p.x, p.y))
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.iter().all(|c| c.is_finite()))
    }
}
