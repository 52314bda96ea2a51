//=========================================================================
// Graphics
//=========================================================================
//
// Software raster primitives shared by every scene.
//
// Architecture:
//   PixelBuffer (RGBA8 raster)
//     ├─ Canvas      immediate-mode surface with transform stack
//     ├─ flood_fill  region recoloring on a raster copy
//     └─ character   paper-doll drawing on top of Canvas
//
//=========================================================================

//=== Module Declarations =================================================

mod canvas;
mod font;

pub mod character;
pub mod flood_fill;

//=== Public API ==========================================================

pub use canvas::Canvas;
pub use flood_fill::{flood_fill, FillOutcome};

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Limits ==============================================================

/// Largest width or height a raster may have.
pub const MAX_DIMENSION: u32 = 16_384;

//=== CanvasError =========================================================

/// Raster allocation failures.
///
/// These are fatal for whoever asked for the buffer: a scene that cannot
/// obtain its offscreen surface aborts activation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// Width or height was zero.
    #[error("cannot allocate an empty {width}x{height} raster")]
    Empty { width: u32, height: u32 },

    /// Width or height exceeded [`MAX_DIMENSION`].
    #[error("raster {width}x{height} exceeds the {max}px limit")]
    TooLarge { width: u32, height: u32, max: u32 },
}

//=== Color ===============================================================

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats as lowercase `#rrggbb`, dropping alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Mixes `self` toward `other` by `t` in `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

//=== PixelBuffer =========================================================

/// Row-major RGBA8 raster.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a fully transparent raster.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Allocates a raster with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::Empty { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::TooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }

        let pixel = [color.r, color.g, color.b, color.a];
        let data = pixel.repeat(width as usize * height as usize);
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns `true` if `(x, y)` lies inside the raster.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Byte offset of pixel `(x, y)`; callers check bounds first.
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrites one pixel (no blending). Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let color = Color::from_hex("#a18cd1").expect("valid hex");
        assert_eq!(color, Color::rgb(0xa1, 0x8c, 0xd1));
        assert_eq!(color.to_hex(), "#a18cd1");
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("#ééé").is_none());
    }

    #[test]
    fn empty_raster_is_an_error() {
        assert_eq!(
            PixelBuffer::new(0, 10),
            Err(CanvasError::Empty { width: 0, height: 10 })
        );
    }

    #[test]
    fn oversized_raster_is_an_error() {
        assert!(matches!(
            PixelBuffer::new(MAX_DIMENSION + 1, 1),
            Err(CanvasError::TooLarge { .. })
        ));
    }

    #[test]
    fn get_and_set_respect_bounds() {
        let mut buffer = PixelBuffer::filled(3, 2, Color::WHITE).unwrap();
        buffer.set(2, 1, Color::BLACK);
        buffer.set(3, 1, Color::BLACK);

        assert_eq!(buffer.get(2, 1), Some(Color::BLACK));
        assert_eq!(buffer.get(0, 0), Some(Color::WHITE));
        assert_eq!(buffer.get(3, 0), None);
    }
}
