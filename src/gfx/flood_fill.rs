//=========================================================================
// Flood Fill
//=========================================================================
//
// Tolerance-based region recoloring for the coloring book.
//
// The fill reads and writes a working copy of the raster and commits it
// in one go, so a failed or no-op fill never leaves a partial region.
// The traversal is an explicit stack; region size is bounded only by the
// raster, never by call depth.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Color, PixelBuffer};

//=== Thresholds ==========================================================

/// A pixel joins the region when every RGB channel differs from the
/// seed by strictly less than this.
pub const MATCH_TOLERANCE: i16 = 50;

/// Seeds whose RGB channels are all strictly below this are treated as
/// line art and never filled.
pub const BORDER_THRESHOLD: u8 = 50;

//=== FillOutcome =========================================================

/// What a fill request did to the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The region was recolored.
    Filled { pixels: usize },

    /// The seed already had (nearly) the fill color.
    AlreadyFilled,

    /// The seed sits on dark line art.
    Border,

    /// The seed lies outside the raster.
    OutOfBounds,
}

impl FillOutcome {
    /// Returns `true` if the raster changed.
    pub fn changed(&self) -> bool {
        matches!(self, FillOutcome::Filled { .. })
    }
}

//=== flood_fill ==========================================================

/// Recolors the 4-connected region around `(x, y)` with `fill`.
///
/// The seed color is sampled once. Pixels join the region if their RGB
/// channels are each within [`MATCH_TOLERANCE`] of the seed. Alpha is
/// ignored when matching; painted pixels are always fully opaque.
pub fn flood_fill(buffer: &mut PixelBuffer, x: i64, y: i64, fill: Color) -> FillOutcome {
    if !buffer.contains(x, y) {
        return FillOutcome::OutOfBounds;
    }

    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let seed_index = buffer.offset(x as u32, y as u32);
    let seed = {
        let d = buffer.data();
        [d[seed_index], d[seed_index + 1], d[seed_index + 2], d[seed_index + 3]]
    };

    let close = |a: &[u8], b: &[u8]| {
        (0..3).all(|c| (a[c] as i16 - b[c] as i16).abs() < MATCH_TOLERANCE)
    };
    let paint = [fill.r, fill.g, fill.b, 255];

    if close(&seed[..], &paint[..]) {
        return FillOutcome::AlreadyFilled;
    }
    if seed[..3]
        .iter()
        .all(|channel| *channel < BORDER_THRESHOLD)
    {
        debug!(target: "gfx::fill", "seed ({x}, {y}) is line art; ignoring");
        return FillOutcome::Border;
    }

    let matches = |px: &[u8]| close(px, &seed[..]);

    let mut work = buffer.data().to_vec();
    let mut visited = vec![false; width * height];
    let mut stack = vec![(x as usize, y as usize)];
    let mut painted = 0usize;

    while let Some((px, py)) = stack.pop() {
        let cell = py * width + px;
        if visited[cell] {
            continue;
        }
        visited[cell] = true;

        let i = cell * 4;
        if !matches(&work[i..i + 4]) {
            continue;
        }

        work[i..i + 4].copy_from_slice(&paint);
        painted += 1;

        if px > 0 {
            stack.push((px - 1, py));
        }
        if px + 1 < width {
            stack.push((px + 1, py));
        }
        if py > 0 {
            stack.push((px, py - 1));
        }
        if py + 1 < height {
            stack.push((px, py + 1));
        }
    }

    buffer.data_mut().copy_from_slice(&work);
    debug!(target: "gfx::fill", "filled {painted} px from ({x}, {y})");
    FillOutcome::Filled { pixels: painted }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    /// 10×10 white raster with a one-pixel black frame.
    fn framed() -> PixelBuffer {
        let mut buffer = PixelBuffer::filled(10, 10, Color::WHITE).unwrap();
        for i in 0..10 {
            buffer.set(i, 0, Color::BLACK);
            buffer.set(i, 9, Color::BLACK);
            buffer.set(0, i, Color::BLACK);
            buffer.set(9, i, Color::BLACK);
        }
        buffer
    }

    #[test]
    fn fills_interior_and_leaves_border() {
        let mut buffer = framed();
        let outcome = flood_fill(&mut buffer, 5, 5, RED);

        assert_eq!(outcome, FillOutcome::Filled { pixels: 64 });
        for y in 0..10 {
            for x in 0..10 {
                let edge = x == 0 || y == 0 || x == 9 || y == 9;
                let expected = if edge { Color::BLACK } else { RED };
                assert_eq!(buffer.get(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn second_fill_is_a_no_op() {
        let mut buffer = framed();
        flood_fill(&mut buffer, 5, 5, RED);
        let after_first = buffer.clone();

        assert_eq!(flood_fill(&mut buffer, 5, 5, RED), FillOutcome::AlreadyFilled);
        assert_eq!(buffer.data(), after_first.data());
    }

    #[test]
    fn clicking_line_art_does_nothing() {
        let mut buffer = framed();
        let before = buffer.clone();

        assert_eq!(flood_fill(&mut buffer, 0, 4, RED), FillOutcome::Border);
        assert_eq!(buffer, before);
    }

    #[test]
    fn near_colors_join_but_distant_ones_stop() {
        let mut buffer = PixelBuffer::filled(3, 1, Color::rgb(200, 200, 200)).unwrap();
        buffer.set(1, 0, Color::rgb(200, 200, 249));
        buffer.set(2, 0, Color::rgb(200, 200, 150));

        let outcome = flood_fill(&mut buffer, 0, 0, RED);

        // 249 is 49 away (joins); 150 is exactly 50 away (rejected).
        assert_eq!(outcome, FillOutcome::Filled { pixels: 2 });
        assert_eq!(buffer.get(2, 0), Some(Color::rgb(200, 200, 150)));
    }

    #[test]
    fn seed_close_to_fill_color_is_already_filled() {
        let mut buffer = PixelBuffer::filled(4, 4, Color::rgb(240, 10, 10)).unwrap();
        let before = buffer.clone();

        assert_eq!(flood_fill(&mut buffer, 1, 1, RED), FillOutcome::AlreadyFilled);
        assert_eq!(buffer, before);
    }

    #[test]
    fn painted_pixels_are_opaque() {
        let mut buffer = PixelBuffer::filled(2, 2, Color::WHITE.with_alpha(0)).unwrap();
        flood_fill(&mut buffer, 0, 0, RED.with_alpha(10));

        assert_eq!(buffer.get(1, 1), Some(RED));
    }

    #[test]
    fn out_of_bounds_seed_is_rejected() {
        let mut buffer = framed();
        assert_eq!(flood_fill(&mut buffer, -1, 3, RED), FillOutcome::OutOfBounds);
        assert_eq!(flood_fill(&mut buffer, 3, 10, RED), FillOutcome::OutOfBounds);
    }

    #[test]
    fn large_region_does_not_recurse() {
        let mut buffer = PixelBuffer::filled(512, 512, Color::WHITE).unwrap();
        assert_eq!(
            flood_fill(&mut buffer, 0, 0, RED),
            FillOutcome::Filled { pixels: 512 * 512 }
        );
    }
}
