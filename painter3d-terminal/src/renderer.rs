/// ASCII rasterizer for terminal rendering
///
/// There is no depth buffer: triangles are filled in the order given and
/// later ones overwrite earlier ones, so callers pass a back-to-front list.
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use painter3d_core::{Color, DrawTriangle};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Character-cell framebuffer holding one flat colour per cell
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    /// Fill every triangle of a draw list in order.
    pub fn render(&mut self, triangles: &[DrawTriangle]) {
        for triangle in triangles {
            self.fill_triangle(triangle);
        }
    }

    /// Fill the cells whose centres fall inside the triangle's screen projection.
    pub fn fill_triangle(&mut self, triangle: &DrawTriangle) {
        let [v0, v1, v2] = triangle.screen_points();

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let idx = y as usize * self.width + x as usize;
                        self.cells[idx] = Some(triangle.color);
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Color> = None;

        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            // No break after the last row, or the screen scrolls.
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for cell in row {
                match cell {
                    Some(color) => {
                        if current != Some(*color) {
                            writer.queue(SetForegroundColor(TermColor::Rgb {
                                r: color.r,
                                g: color.g,
                                b: color.b,
                            }))?;
                            current = Some(*color);
                        }
                        writer.queue(Print(shade_char(color)))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Ramp character for a colour's brightness; black still draws as '.'.
fn shade_char(color: &Color) -> char {
    let idx = color.luminance() as usize * (LUMINOSITY_RAMP.len() - 1) / 255;
    LUMINOSITY_RAMP[idx]
}

/// Barycentric coordinates of `p`, or `None` for a degenerate triangle.
///
/// The weights are normalised by the signed area, so either winding yields
/// non-negative weights inside the triangle.
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn tri(points: [(f32, f32); 3], level: u8) -> DrawTriangle {
        DrawTriangle {
            points: points.map(|(x, y)| Point3::new(x, y, 0.5)),
            color: Color::new(level, level, level),
        }
    }

    #[test]
    fn test_fill_covers_interior() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.fill_triangle(&tri([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 200));

        assert_eq!(renderer.cell(1, 1), Some(Color::new(200, 200, 200)));
        assert_eq!(renderer.cell(9, 9), None);
    }

    #[test]
    fn test_either_winding_fills() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.fill_triangle(&tri([(0.0, 0.0), (0.0, 10.0), (10.0, 0.0)], 90));
        assert!(renderer.cell(2, 2).is_some());
    }

    #[test]
    fn test_later_triangles_overwrite() {
        let mut renderer = AsciiRenderer::new(8, 8);
        let far = tri([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)], 50);
        let near = tri([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)], 250);

        renderer.render(&[far, near]);
        assert_eq!(renderer.cell(1, 1), Some(near.color));
        assert_eq!(renderer.cell(5, 1), Some(far.color));
    }

    #[test]
    fn test_offscreen_and_degenerate_are_ignored() {
        let mut renderer = AsciiRenderer::new(4, 4);
        renderer.fill_triangle(&tri([(-50.0, -50.0), (-40.0, -50.0), (-50.0, -40.0)], 255));
        renderer.fill_triangle(&tri([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)], 255));
        assert!((0..4).all(|y| (0..4).all(|x| renderer.cell(x, y).is_none())));
    }

    #[test]
    fn test_clear() {
        let mut renderer = AsciiRenderer::new(4, 4);
        renderer.fill_triangle(&tri([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)], 255));
        renderer.clear();
        assert_eq!(renderer.cell(0, 0), None);
    }

    #[test]
    fn test_shade_char_ramp_ends() {
        assert_eq!(shade_char(&Color::BLACK), '.');
        assert_eq!(shade_char(&Color::WHITE), '@');
    }

    #[test]
    fn test_draw_writes_every_row() {
        let mut renderer = AsciiRenderer::new(3, 2);
        renderer.fill_triangle(&tri([(0.0, 0.0), (3.0, 0.0), (0.0, 2.0)], 255));

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);

        // Breaks only between rows, so a full-height frame never scrolls.
        assert_eq!(text.matches("\r\n").count(), 1);
        assert!(!text.ends_with("\r\n"));
        assert!(text.contains('@'));
    }

    #[test]
    fn test_draw_single_row_has_no_break() {
        let renderer = AsciiRenderer::new(5, 1);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(!String::from_utf8_lossy(&out).contains("\r\n"));
    }
}
