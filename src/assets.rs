//=========================================================================
// Assets
//=========================================================================
//
// Line-art pages for the coloring book.
//
// Pages come from an `ArtSource`. The built-in `LineArtBook` renders
// black outlines on white procedurally, so every region it produces is
// closed and flood-fillable. A page that cannot be produced is reported
// as an `AssetError`; callers degrade to a placeholder instead of
// failing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::TAU;

use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::gfx::{Canvas, CanvasError, Color, PixelBuffer};

//=== AssetError ==========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("no page {index} (book has {count})")]
    Missing { index: usize, count: usize },

    #[error("could not render page: {0}")]
    Render(#[from] CanvasError),
}

//=== ArtSource ===========================================================

/// Supplier of coloring pages.
pub trait ArtSource {
    fn page_count(&self) -> usize;

    /// Produces page `index` as an opaque raster.
    fn load_page(&self, index: usize) -> Result<PixelBuffer, AssetError>;
}

//=== LineArtBook =========================================================

/// Procedurally drawn pages, each `PAGE_WIDTH × PAGE_HEIGHT`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineArtBook;

pub const PAGE_WIDTH: u32 = 600;
pub const PAGE_HEIGHT: u32 = 450;

const INK: Color = Color::BLACK;
const LINE: f32 = 5.0;

type PageFn = fn(&mut Canvas);

const PAGES: [(&str, PageFn); 6] = [
    ("Flower", flower),
    ("House", house),
    ("Fish", fish),
    ("Star", star),
    ("Kitten", kitten),
    ("Butterfly", butterfly),
];

impl LineArtBook {
    pub fn new() -> Self {
        Self
    }

    pub fn title(&self, index: usize) -> Option<&'static str> {
        PAGES.get(index).map(|(title, _)| *title)
    }
}

impl ArtSource for LineArtBook {
    fn page_count(&self) -> usize {
        PAGES.len()
    }

    fn load_page(&self, index: usize) -> Result<PixelBuffer, AssetError> {
        let (title, draw) = PAGES.get(index).ok_or(AssetError::Missing {
            index,
            count: PAGES.len(),
        })?;

        let mut canvas = Canvas::from_buffer(PixelBuffer::filled(PAGE_WIDTH, PAGE_HEIGHT, Color::WHITE)?);
        draw(&mut canvas);

        debug!(target: "assets", "Rendered page {} ({})", index, title);
        Ok(canvas.into_buffer())
    }
}

//=== Outline Helpers =====================================================

fn ellipse(c: &mut Canvas, cx: f32, cy: f32, rx: f32, ry: f32) {
    const SEGMENTS: usize = 64;
    let points: Vec<(f32, f32)> = (0..=SEGMENTS)
        .map(|i| {
            let t = i as f32 / SEGMENTS as f32 * TAU;
            (cx + rx * t.cos(), cy + ry * t.sin())
        })
        .collect();
    c.stroke_polyline(&points, LINE, INK);
}

fn circle(c: &mut Canvas, cx: f32, cy: f32, r: f32) {
    ellipse(c, cx, cy, r, r);
}

fn polygon(c: &mut Canvas, points: &[(f32, f32)]) {
    let mut closed = points.to_vec();
    if let Some(first) = points.first() {
        closed.push(*first);
    }
    c.stroke_polyline(&closed, LINE, INK);
}

fn line(c: &mut Canvas, x0: f32, y0: f32, x1: f32, y1: f32) {
    c.stroke_line(x0, y0, x1, y1, LINE, INK);
}

//=== Pages ===============================================================

fn flower(c: &mut Canvas) {
    line(c, 300.0, 260.0, 300.0, 440.0);
    polygon(c, &[(300.0, 380.0), (230.0, 330.0), (250.0, 390.0)]);
    polygon(c, &[(300.0, 350.0), (370.0, 300.0), (350.0, 360.0)]);

    for i in 0..6 {
        let a = i as f32 / 6.0 * TAU;
        circle(c, 300.0 + 80.0 * a.cos(), 180.0 + 80.0 * a.sin(), 42.0);
    }
    circle(c, 300.0, 180.0, 42.0);
}

fn house(c: &mut Canvas) {
    c.stroke_rect(150.0, 190.0, 300.0, 230.0, LINE, INK);
    polygon(c, &[(130.0, 190.0), (300.0, 60.0), (470.0, 190.0)]);
    c.stroke_rect(270.0, 320.0, 60.0, 100.0, LINE, INK);

    for wx in [180.0, 360.0] {
        c.stroke_rect(wx, 230.0, 60.0, 60.0, LINE, INK);
        line(c, wx + 30.0, 230.0, wx + 30.0, 290.0);
        line(c, wx, 260.0, wx + 60.0, 260.0);
    }
    circle(c, 530.0, 70.0, 40.0);
}

fn fish(c: &mut Canvas) {
    ellipse(c, 270.0, 225.0, 170.0, 100.0);
    polygon(c, &[(430.0, 225.0), (560.0, 130.0), (560.0, 320.0)]);
    circle(c, 170.0, 200.0, 18.0);
    polygon(c, &[(250.0, 130.0), (300.0, 60.0), (330.0, 135.0)]);
    for (bx, by, r) in [(80.0, 120.0, 14.0), (60.0, 70.0, 20.0), (95.0, 30.0, 10.0)] {
        circle(c, bx, by, r);
    }
}

fn star(c: &mut Canvas) {
    let points: Vec<(f32, f32)> = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { 190.0 } else { 80.0 };
            let a = i as f32 / 10.0 * TAU - TAU / 4.0;
            (300.0 + r * a.cos(), 235.0 + r * a.sin())
        })
        .collect();
    polygon(c, &points);
    circle(c, 300.0, 235.0, 40.0);
    circle(c, 70.0, 70.0, 25.0);
    circle(c, 530.0, 380.0, 30.0);
}

fn kitten(c: &mut Canvas) {
    polygon(c, &[(180.0, 170.0), (200.0, 50.0), (270.0, 120.0)]);
    polygon(c, &[(420.0, 170.0), (400.0, 50.0), (330.0, 120.0)]);
    circle(c, 300.0, 230.0, 150.0);
    ellipse(c, 245.0, 200.0, 25.0, 32.0);
    ellipse(c, 355.0, 200.0, 25.0, 32.0);
    polygon(c, &[(285.0, 260.0), (315.0, 260.0), (300.0, 280.0)]);
    for dy in [-15.0, 15.0] {
        line(c, 100.0, 270.0 + dy, 230.0, 280.0);
        line(c, 500.0, 270.0 + dy, 370.0, 280.0);
    }
}

fn butterfly(c: &mut Canvas) {
    ellipse(c, 190.0, 150.0, 110.0, 90.0);
    ellipse(c, 410.0, 150.0, 110.0, 90.0);
    ellipse(c, 210.0, 310.0, 80.0, 70.0);
    ellipse(c, 390.0, 310.0, 80.0, 70.0);
    c.fill_ellipse(300.0, 230.0, 24.0, 150.0, Color::WHITE);
    ellipse(c, 300.0, 230.0, 24.0, 150.0);
    line(c, 290.0, 90.0, 250.0, 20.0);
    line(c, 310.0, 90.0, 350.0, 20.0);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{flood_fill, FillOutcome};

    #[test]
    fn every_page_renders_at_page_size() {
        let book = LineArtBook::new();
        for index in 0..book.page_count() {
            let page = book.load_page(index).expect("page renders");
            assert_eq!((page.width(), page.height()), (PAGE_WIDTH, PAGE_HEIGHT));
            assert!(book.title(index).is_some());
        }
    }

    #[test]
    fn missing_page_is_an_error() {
        let book = LineArtBook::new();
        assert_eq!(
            book.load_page(99),
            Err(AssetError::Missing { index: 99, count: 6 })
        );
    }

    #[test]
    fn flower_centre_is_a_closed_region() {
        let mut page = LineArtBook::new().load_page(0).unwrap();
        let outcome = flood_fill(&mut page, 300, 180, Color::rgb(255, 200, 0));

        let FillOutcome::Filled { pixels } = outcome else {
            panic!("expected a fill, got {:?}", outcome);
        };
        // Bounded by the centre circle; nowhere near the whole page.
        assert!(pixels < 42 * 42 * 4, "leaked: {pixels} px");
        assert_eq!(page.get(5, 5), Some(Color::WHITE));
    }
}
