/// Geometry primitives for the flat-shaded pipeline
use nalgebra::Point3;

/// Flat RGB colour shared by a whole face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Greyscale colour for a diffuse intensity.
    ///
    /// The intensity is scaled to `[0, 255]`, truncated toward zero and then
    /// clamped on both ends. NaN maps to black.
    pub fn grey(intensity: f32) -> Self {
        let level = ((intensity * 255.0) as i32).clamp(0, 255) as u8;
        Self::new(level, level, level)
    }

    /// Mean of the three channels, in `[0, 255]`.
    pub fn luminance(&self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }
}

/// A triangle face: three ordered points plus one flat colour.
///
/// Winding matters: the face normal is `(p1 - p0) x (p2 - p0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Point3<f32>; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self {
            points: [p0, p1, p2],
            color: Color::WHITE,
        }
    }
}

/// A 3D mesh composed of triangles, kept in load order
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Create a cube centred on the origin with outward-facing windings
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let p = Point3::new;

        let faces = [
            // Front (+z)
            [p(-h, -h, h), p(h, -h, h), p(h, h, h), p(-h, h, h)],
            // Back (-z)
            [p(-h, -h, -h), p(-h, h, -h), p(h, h, -h), p(h, -h, -h)],
            // Top (+y)
            [p(-h, h, -h), p(-h, h, h), p(h, h, h), p(h, h, -h)],
            // Bottom (-y)
            [p(-h, -h, -h), p(h, -h, -h), p(h, -h, h), p(-h, -h, h)],
            // Right (+x)
            [p(h, -h, -h), p(h, h, -h), p(h, h, h), p(h, -h, h)],
            // Left (-x)
            [p(-h, -h, -h), p(-h, -h, h), p(-h, h, h), p(-h, h, -h)],
        ];

        let mut mesh = Self::with_capacity(faces.len() * 2);
        for [a, b, c, d] in faces {
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }
        mesh
    }
}
