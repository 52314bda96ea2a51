//=========================================================================
// Canvas
//=========================================================================
//
// Immediate-mode drawing surface over a `PixelBuffer`.
//
// Architecture:
//   Scene::draw() → Canvas primitives → Transform → blend → PixelBuffer
//
// Coordinates are `f32` in the current local space. The transform stack
// holds translate + uniform scale, mirroring the save/restore discipline
// of a browser 2-D context. Every fill uses source-over blending; the
// pixel get/put pair bypasses both blending and transform.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::font;
use super::{CanvasError, Color, PixelBuffer};

//=== Transform ===========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    tx: f32,
    ty: f32,
    scale: f32,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        tx: 0.0,
        ty: 0.0,
        scale: 1.0,
    };

    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.tx, y * self.scale + self.ty)
    }

    fn length(&self, len: f32) -> f32 {
        len * self.scale
    }
}

//=== Canvas ==============================================================

/// The shared render surface scenes draw into every frame.
pub struct Canvas {
    frame: PixelBuffer,
    current: Transform,
    stack: Vec<Transform>,
}

impl Canvas {
    //--- Construction -----------------------------------------------------

    /// Creates a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Ok(Self::from_buffer(PixelBuffer::new(width, height)?))
    }

    /// Wraps an existing raster so it can be drawn into.
    pub fn from_buffer(frame: PixelBuffer) -> Self {
        Self {
            frame,
            current: Transform::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Gives the raster back, dropping transform state.
    pub fn into_buffer(self) -> PixelBuffer {
        self.frame
    }

    //--- Surface ----------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// The finished frame, ready to present.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    /// Reallocates the surface. Content and transforms are discarded.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        self.frame = PixelBuffer::new(width, height)?;
        self.reset_transform();
        Ok(())
    }

    /// Clears every pixel to transparent black.
    pub fn clear(&mut self) {
        self.frame.fill(Color::TRANSPARENT);
    }

    //--- Transform Stack --------------------------------------------------

    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Pops the last saved transform. Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.current.tx += dx * self.current.scale;
        self.current.ty += dy * self.current.scale;
    }

    pub fn scale(&mut self, factor: f32) {
        self.current.scale *= factor;
    }

    pub fn reset_transform(&mut self) {
        self.current = Transform::IDENTITY;
        self.stack.clear();
    }

    //--- Filled Shapes ----------------------------------------------------

    /// Fills an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, y0) = self.current.point(x, y);
        let (x1, y1) = self.current.point(x + w, y + h);
        self.fill_device_rect(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1), color);
    }

    /// Strokes the inside edge of a rectangle with the given thickness.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: Color) {
        let t = thickness.min(w / 2.0).min(h / 2.0).max(0.0);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y + t, t, h - 2.0 * t, color);
        self.fill_rect(x + w - t, y + t, t, h - 2.0 * t, color);
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let (cx, cy) = self.current.point(cx, cy);
        let r = self.current.length(radius);
        if r <= 0.0 {
            return;
        }

        let r2 = r * r;
        let Some((px0, py0, px1, py1)) = self.clip(cx - r, cy - r, cx + r, cy + r) else {
            return;
        };

        for py in py0..py1 {
            for px in px0..px1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Fills an axis-aligned ellipse.
    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Color) {
        let (cx, cy) = self.current.point(cx, cy);
        let rx = self.current.length(rx);
        let ry = self.current.length(ry);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }

        let Some((px0, py0, px1, py1)) = self.clip(cx - rx, cy - ry, cx + rx, cy + ry) else {
            return;
        };

        for py in py0..py1 {
            for px in px0..px1 {
                let dx = (px as f32 + 0.5 - cx) / rx;
                let dy = (py as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Fills the triangle `a, b, c` (either winding).
    pub fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color) {
        let a = self.current.point(a.0, a.1);
        let b = self.current.point(b.0, b.1);
        let c = self.current.point(c.0, c.1);

        let edge = |p: (f32, f32), q: (f32, f32), x: f32, y: f32| {
            (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
        };
        let area = edge(a, b, c.0, c.1);
        if area == 0.0 {
            return;
        }

        let min_x = a.0.min(b.0).min(c.0);
        let min_y = a.1.min(b.1).min(c.1);
        let max_x = a.0.max(b.0).max(c.0);
        let max_y = a.1.max(b.1).max(c.1);
        let Some((px0, py0, px1, py1)) = self.clip(min_x, min_y, max_x, max_y) else {
            return;
        };

        for py in py0..py1 {
            for px in px0..px1 {
                let (x, y) = (px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(b, c, x, y) / area;
                let w1 = edge(c, a, x, y) / area;
                let w2 = edge(a, b, x, y) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    //--- Stroked Paths ----------------------------------------------------

    /// Draws a round-capped line segment.
    pub fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        let (ax, ay) = self.current.point(x0, y0);
        let (bx, by) = self.current.point(x1, y1);
        let half = self.current.length(width) / 2.0;
        if half <= 0.0 {
            return;
        }

        let Some((px0, py0, px1, py1)) = self.clip(
            ax.min(bx) - half,
            ay.min(by) - half,
            ax.max(bx) + half,
            ay.max(by) + half,
        ) else {
            return;
        };

        let (dx, dy) = (bx - ax, by - ay);
        let len2 = dx * dx + dy * dy;
        let half2 = half * half;

        for py in py0..py1 {
            for px in px0..px1 {
                let (x, y) = (px as f32 + 0.5, py as f32 + 0.5);
                let t = if len2 == 0.0 {
                    0.0
                } else {
                    (((x - ax) * dx + (y - ay) * dy) / len2).clamp(0.0, 1.0)
                };
                let (nx, ny) = (ax + t * dx - x, ay + t * dy - y);
                if nx * nx + ny * ny <= half2 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Strokes a polyline through `points`.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], width: f32, color: Color) {
        match points {
            [] => {}
            [(x, y)] => self.fill_circle(*x, *y, width / 2.0, color),
            _ => {
                for pair in points.windows(2) {
                    let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
                    self.stroke_line(x0, y0, x1, y1, width, color);
                }
            }
        }
    }

    //--- Images -----------------------------------------------------------

    /// Draws `image` at its natural size.
    pub fn draw_image(&mut self, image: &PixelBuffer, x: f32, y: f32) {
        self.draw_image_scaled(image, x, y, image.width() as f32, image.height() as f32);
    }

    /// Draws `image` stretched into `w × h` (nearest-neighbour sampling).
    pub fn draw_image_scaled(&mut self, image: &PixelBuffer, x: f32, y: f32, w: f32, h: f32) {
        let (x0, y0) = self.current.point(x, y);
        let (x1, y1) = self.current.point(x + w, y + h);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        let Some((px0, py0, px1, py1)) = self.clip(x0, y0, x1, y1) else {
            return;
        };

        let sx = image.width() as f32 / (x1 - x0);
        let sy = image.height() as f32 / (y1 - y0);

        for py in py0..py1 {
            let src_y = (((py as f32 + 0.5 - y0) * sy) as u32).min(image.height() - 1);
            for px in px0..px1 {
                let src_x = (((px as f32 + 0.5 - x0) * sx) as u32).min(image.width() - 1);
                if let Some(color) = image.get(src_x, src_y) {
                    self.blend(px, py, color);
                }
            }
        }
    }

    //--- Pixel Access -----------------------------------------------------

    /// Copies the whole surface out.
    pub fn get_image_data(&self) -> PixelBuffer {
        self.frame.clone()
    }

    /// Copies `image` onto the surface at device position `(x, y)`,
    /// replacing pixels outright (no blending, no transform).
    pub fn put_image_data(&mut self, image: &PixelBuffer, x: i64, y: i64) {
        for sy in 0..image.height() {
            let dy = y + sy as i64;
            if dy < 0 || dy >= self.height() as i64 {
                continue;
            }
            for sx in 0..image.width() {
                let dx = x + sx as i64;
                if dx < 0 || dx >= self.width() as i64 {
                    continue;
                }
                if let Some(color) = image.get(sx, sy) {
                    self.frame.set(dx as u32, dy as u32, color);
                }
            }
        }
    }

    //--- Text -------------------------------------------------------------

    /// Draws `text` with its top-left corner at `(x, y)`.
    ///
    /// `size` is the cap height in local units.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let cell = size / font::GLYPH_HEIGHT as f32;
        let mut pen_x = x;

        for ch in text.chars() {
            if let Some(rows) = font::glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..font::GLYPH_WIDTH {
                        if bits & (1 << (font::GLYPH_WIDTH - 1 - col)) != 0 {
                            self.fill_rect(
                                pen_x + col as f32 * cell,
                                y + row as f32 * cell,
                                cell,
                                cell,
                                color,
                            );
                        }
                    }
                }
            }
            pen_x += font::ADVANCE as f32 * cell;
        }
    }

    /// Draws `text` centred on `(cx, cy)`.
    pub fn fill_text_centered(&mut self, text: &str, cx: f32, cy: f32, size: f32, color: Color) {
        let width = Self::text_width(text, size);
        self.fill_text(text, cx - width / 2.0, cy - size / 2.0, size, color);
    }

    /// Width `text` occupies at `size`.
    pub fn text_width(text: &str, size: f32) -> f32 {
        let count = text.chars().count();
        if count == 0 {
            return 0.0;
        }
        let cell = size / font::GLYPH_HEIGHT as f32;
        (count * font::ADVANCE - (font::ADVANCE - font::GLYPH_WIDTH)) as f32 * cell
    }

    //--- Internal Helpers -------------------------------------------------

    fn fill_device_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        let px0 = (x0.round().max(0.0) as i64).min(self.width() as i64);
        let py0 = (y0.round().max(0.0) as i64).min(self.height() as i64);
        let px1 = (x1.round().max(0.0) as i64).min(self.width() as i64);
        let py1 = (y1.round().max(0.0) as i64).min(self.height() as i64);

        for py in py0..py1 {
            for px in px0..px1 {
                self.blend(px as u32, py as u32, color);
            }
        }
    }

    /// Clips a device-space bounding box to the surface, returning the
    /// half-open pixel range or `None` when nothing is visible.
    fn clip(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(u32, u32, u32, u32)> {
        let w = self.width() as f32;
        let h = self.height() as f32;
        let px0 = x0.floor().clamp(0.0, w);
        let py0 = y0.floor().clamp(0.0, h);
        let px1 = x1.ceil().clamp(0.0, w);
        let py1 = y1.ceil().clamp(0.0, h);

        if px0 >= px1 || py0 >= py1 {
            return None;
        }
        Some((px0 as u32, py0 as u32, px1 as u32, py1 as u32))
    }

    /// Source-over blend of `src` into pixel `(x, y)`.
    fn blend(&mut self, x: u32, y: u32, src: Color) {
        match src.a {
            0 => {}
            255 => self.frame.set(x, y, src),
            alpha => {
                let Some(dst) = self.frame.get(x, y) else {
                    return;
                };
                let a = alpha as f32 / 255.0;
                let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
                let out_a = (alpha as f32 + dst.a as f32 * (1.0 - a)).round() as u8;
                self.frame.set(
                    x,
                    y,
                    Color::rgba(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), out_a),
                );
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(w, h).expect("canvas")
    }

    #[test]
    fn fill_rect_is_clipped_to_surface() {
        let mut c = canvas(4, 4);
        c.fill_rect(-2.0, -2.0, 4.0, 4.0, Color::WHITE);

        assert_eq!(c.frame().get(0, 0), Some(Color::WHITE));
        assert_eq!(c.frame().get(1, 1), Some(Color::WHITE));
        assert_eq!(c.frame().get(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn translate_is_undone_by_restore() {
        let mut c = canvas(8, 8);
        c.save();
        c.translate(4.0, 4.0);
        c.fill_rect(0.0, 0.0, 1.0, 1.0, Color::WHITE);
        c.restore();
        c.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);

        assert_eq!(c.frame().get(4, 4), Some(Color::WHITE));
        assert_eq!(c.frame().get(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn scale_multiplies_sizes_and_offsets() {
        let mut c = canvas(8, 8);
        c.scale(2.0);
        c.translate(1.0, 1.0);
        c.fill_rect(0.0, 0.0, 1.0, 1.0, Color::WHITE);

        assert_eq!(c.frame().get(2, 2), Some(Color::WHITE));
        assert_eq!(c.frame().get(3, 3), Some(Color::WHITE));
        assert_eq!(c.frame().get(4, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn half_alpha_blends_over_opaque() {
        let mut c = canvas(1, 1);
        c.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);
        c.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgba(255, 255, 255, 128));

        let px = c.frame().get(0, 0).unwrap();
        assert!((127..=129).contains(&px.r), "got {:?}", px);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn put_image_data_replaces_without_blending() {
        let mut c = canvas(2, 2);
        c.fill_rect(0.0, 0.0, 2.0, 2.0, Color::WHITE);
        let patch = PixelBuffer::filled(1, 1, Color::TRANSPARENT).unwrap();
        c.put_image_data(&patch, 1, 1);

        assert_eq!(c.frame().get(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(c.frame().get(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn stroke_line_covers_endpoints() {
        let mut c = canvas(10, 10);
        c.stroke_line(1.0, 5.0, 8.0, 5.0, 2.0, Color::BLACK);

        assert_eq!(c.frame().get(1, 5), Some(Color::BLACK));
        assert_eq!(c.frame().get(7, 5), Some(Color::BLACK));
        assert_eq!(c.frame().get(5, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn scaled_image_fills_destination() {
        let image = PixelBuffer::filled(2, 2, Color::WHITE).unwrap();
        let mut c = canvas(8, 8);
        c.draw_image_scaled(&image, 0.0, 0.0, 8.0, 8.0);

        assert!(c.frame().data().chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
    }

    #[test]
    fn text_width_counts_inter_glyph_gaps() {
        assert_eq!(Canvas::text_width("", 7.0), 0.0);
        assert_eq!(Canvas::text_width("A", 7.0), 5.0);
        assert_eq!(Canvas::text_width("AB", 7.0), 11.0);
    }
}
