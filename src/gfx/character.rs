//=========================================================================
// Paper Doll
//=========================================================================
//
// Procedural hero drawing driven by a profile `Appearance`.
//
// Local coordinates: the head centre is the origin, one unit is one
// pixel at scale 1. The figure spans roughly x ∈ [-90, 100] and
// y ∈ [-85, 160]. Layers are painted back to front:
//
//   back hair → body → head → face → outfit → front hair → pet
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Canvas, Color};
use crate::core::state::{Appearance, Pet};

//=== Constants ===========================================================

/// Number of distinct hair styles; larger indices wrap.
pub const HAIR_STYLES: u32 = 10;

/// Number of outfit indices the wardrobe cycles through. Even indices
/// are dresses, odd ones shirt + skirt.
pub const OUTFITS: u32 = 8;

const FALLBACK_HAIR: Color = Color::rgb(0xff, 0xff, 0xff);
const FALLBACK_OUTFIT: Color = Color::rgb(0xff, 0x9f, 0xf3);
const FALLBACK_SKIN: Color = Color::rgb(0xff, 0xe0, 0xbd);
const ACCENT: Color = Color::rgb(0xff, 0x76, 0x75);
const DARK: Color = Color::rgb(0x2d, 0x34, 0x36);

//=== Hair Styles =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hair {
    Long,
    Bob,
    Pigtails,
    Bun,
    Pixie,
    SidePony,
    Curly,
    Spiky,
    Braids,
    Bald,
}

impl Hair {
    fn from_index(index: u32) -> Hair {
        match index % HAIR_STYLES {
            0 => Hair::Long,
            1 => Hair::Bob,
            2 => Hair::Pigtails,
            3 => Hair::Bun,
            4 => Hair::Pixie,
            5 => Hair::SidePony,
            6 => Hair::Curly,
            7 => Hair::Spiky,
            8 => Hair::Braids,
            _ => Hair::Bald,
        }
    }
}

//=== draw_character ======================================================

/// Draws the hero with its head centred on `(x, y)`.
pub fn draw_character(canvas: &mut Canvas, x: f32, y: f32, scale: f32, look: &Appearance) {
    let hair = Hair::from_index(look.hair_style);
    let hair_color = Color::from_hex(&look.hair_color).unwrap_or(FALLBACK_HAIR);
    let outfit_color = Color::from_hex(&look.outfit_color).unwrap_or(FALLBACK_OUTFIT);
    let skin = Color::from_hex(&look.skin_tone).unwrap_or(FALLBACK_SKIN);

    canvas.save();
    canvas.translate(x, y);
    canvas.scale(scale);

    draw_back_hair(canvas, hair, hair_color);
    draw_body(canvas, skin);
    draw_head(canvas, skin);
    draw_face(canvas);

    if look.outfit % 2 == 0 {
        draw_dress(canvas, outfit_color);
    } else {
        draw_shirt_and_skirt(canvas, outfit_color);
    }

    draw_front_hair(canvas, hair, hair_color);
    draw_pet(canvas, look.pet);

    canvas.restore();
}

//=== Layers ==============================================================

fn draw_body(c: &mut Canvas, skin: Color) {
    c.fill_rect(-8.0, 30.0, 16.0, 15.0, skin); // neck
    c.fill_rect(-38.0, 45.0, 12.0, 45.0, skin); // arms
    c.fill_rect(26.0, 45.0, 12.0, 45.0, skin);
    c.fill_triangle((-15.0, 90.0), (-18.0, 140.0), (-5.0, 140.0), skin); // legs
    c.fill_rect(-15.0, 90.0, 10.0, 50.0, skin);
    c.fill_triangle((15.0, 90.0), (18.0, 140.0), (5.0, 140.0), skin);
    c.fill_rect(5.0, 90.0, 10.0, 50.0, skin);
    c.fill_rect(-25.0, 40.0, 50.0, 60.0, skin); // torso
}

fn draw_head(c: &mut Canvas, skin: Color) {
    c.fill_ellipse(0.0, -5.0, 48.0, 58.0, skin);
    c.fill_ellipse(0.0, 30.0, 36.0, 34.0, skin);
}

fn draw_face(c: &mut Canvas) {
    let blush = Color::rgba(255, 100, 100, 51);
    c.fill_ellipse(-30.0, 25.0, 12.0, 7.0, blush);
    c.fill_ellipse(30.0, 25.0, 12.0, 7.0, blush);

    for eye_x in [-22.0, 22.0] {
        c.fill_ellipse(eye_x, 5.0, 14.0, 18.0, Color::WHITE);
        c.fill_ellipse(eye_x, 8.0, 10.0, 12.0, Color::rgb(0x44, 0x44, 0x44));
        c.fill_circle(eye_x, 10.0, 4.0, Color::BLACK);
        c.fill_circle(eye_x - 5.0, -1.0, 4.5, Color::WHITE);
        c.fill_circle(eye_x + 4.0, 11.0, 2.5, Color::WHITE.with_alpha(153));
        c.stroke_line(eye_x - 15.0, -8.0, eye_x + 15.0, -8.0, 4.0, DARK); // lash line
    }

    let brow = Color::rgb(0xb0, 0x8d, 0x76);
    c.stroke_polyline(&[(-35.0, -12.0), (-22.0, -15.0), (-10.0, -12.0)], 2.5, brow);
    c.stroke_polyline(&[(35.0, -12.0), (22.0, -15.0), (10.0, -12.0)], 2.5, brow);

    let mouth = Color::rgb(0x8a, 0x5a, 0x44);
    c.stroke_polyline(&[(-5.0, 31.0), (-3.0, 34.0), (0.0, 35.0), (3.0, 34.0), (5.0, 31.0)], 2.5, mouth);
}

fn draw_dress(c: &mut Canvas, color: Color) {
    c.fill_rect(-23.0, 40.0, 46.0, 45.0, color);
    c.fill_circle(-32.0, 50.0, 14.0, color);
    c.fill_circle(32.0, 50.0, 14.0, color);
    c.fill_triangle((-24.0, 85.0), (24.0, 85.0), (55.0, 145.0), color);
    c.fill_triangle((-24.0, 85.0), (55.0, 145.0), (-55.0, 145.0), color);

    c.fill_circle(0.0, 85.0, 6.0, ACCENT); // bow
    c.fill_ellipse(-10.0, 85.0, 8.0, 5.0, ACCENT);
    c.fill_ellipse(10.0, 85.0, 8.0, 5.0, ACCENT);
}

fn draw_shirt_and_skirt(c: &mut Canvas, color: Color) {
    c.fill_rect(-24.0, 40.0, 48.0, 50.0, Color::WHITE);
    c.fill_ellipse(-32.0, 50.0, 12.0, 10.0, Color::WHITE);
    c.fill_ellipse(32.0, 50.0, 12.0, 10.0, Color::WHITE);

    c.fill_triangle((-24.0, 90.0), (24.0, 90.0), (45.0, 135.0), color);
    c.fill_triangle((-24.0, 90.0), (45.0, 135.0), (-45.0, 135.0), color);

    let pleat = Color::rgba(0, 0, 0, 26);
    c.stroke_line(-10.0, 90.0, -15.0, 135.0, 2.0, pleat);
    c.stroke_line(10.0, 90.0, 15.0, 135.0, 2.0, pleat);
}

fn draw_back_hair(c: &mut Canvas, hair: Hair, color: Color) {
    match hair {
        Hair::Long => {
            c.fill_ellipse(0.0, 50.0, 68.0, 108.0, color);
        }
        Hair::Bob => {
            c.fill_circle(0.0, -20.0, 52.0, color);
            c.fill_rect(-52.0, -20.0, 104.0, 60.0, color);
            c.fill_ellipse(0.0, 40.0, 52.0, 16.0, color);
        }
        Hair::Pigtails => {
            c.fill_ellipse(-72.0, 50.0, 20.0, 80.0, color);
            c.fill_ellipse(72.0, 50.0, 20.0, 80.0, color);
        }
        Hair::Bun => {
            c.fill_circle(0.0, -50.0, 30.0, color);
        }
        Hair::Pixie => {
            c.fill_circle(0.0, -25.0, 50.0, color);
            c.fill_ellipse(0.0, 5.0, 48.0, 18.0, color);
        }
        Hair::Curly => {
            c.fill_circle(0.0, -25.0, 60.0, color);
            c.fill_ellipse(0.0, 55.0, 72.0, 70.0, color);
            for (bx, by) in [(-62.0, 20.0), (62.0, 20.0), (-55.0, 90.0), (55.0, 90.0)] {
                c.fill_circle(bx, by, 22.0, color);
            }
        }
        Hair::Braids => {
            for side in [-1.0, 1.0] {
                c.stroke_line(side * 35.0, 0.0, side * 45.0, 80.0, 10.0, color);
                c.fill_circle(side * 45.0, 84.0, 6.0, color);
            }
        }
        Hair::SidePony | Hair::Spiky | Hair::Bald => {}
    }
}

fn draw_front_hair(c: &mut Canvas, hair: Hair, color: Color) {
    if hair == Hair::Bald {
        return;
    }

    match hair {
        Hair::Spiky => {
            c.fill_rect(-50.0, -22.0, 100.0, 18.0, color);
            c.fill_triangle((-50.0, -20.0), (-30.0, -60.0), (-10.0, -20.0), color);
            c.fill_triangle((-20.0, -20.0), (10.0, -70.0), (30.0, -20.0), color);
            c.fill_triangle((20.0, -20.0), (50.0, -50.0), (50.0, -20.0), color);
        }
        Hair::Bun | Hair::Pixie => {
            c.fill_ellipse(0.0, -30.0, 50.0, 28.0, color);
            c.fill_rect(-50.0, -30.0, 100.0, 18.0, color);
        }
        _ => {
            c.fill_ellipse(0.0, -35.0, 52.0, 36.0, color);
            for bang_x in [-35.0, -15.0, 0.0, 15.0, 35.0] {
                c.fill_triangle((bang_x - 12.0, -20.0), (bang_x + 12.0, -20.0), (bang_x, 0.0), color);
            }
            c.fill_rect(-52.0, -30.0, 10.0, 25.0, color);
            c.fill_rect(42.0, -30.0, 10.0, 25.0, color);
        }
    }

    match hair {
        Hair::Pigtails => {
            c.fill_circle(-50.0, -25.0, 6.0, ACCENT);
            c.fill_circle(50.0, -25.0, 6.0, ACCENT);
        }
        Hair::Bun => {
            c.fill_rect(-10.0, -55.0, 20.0, 10.0, ACCENT);
        }
        Hair::SidePony => {
            c.fill_ellipse(48.0, 10.0, 16.0, 40.0, color);
            c.fill_circle(38.0, -10.0, 6.0, Color::rgb(0xfa, 0xb1, 0xa0));
        }
        _ => {}
    }
}

fn draw_pet(c: &mut Canvas, pet: Pet) {
    if pet == Pet::None {
        return;
    }

    c.save();
    c.translate(70.0, 90.0);
    c.scale(0.7);

    match pet {
        Pet::Cat => {
            let fur = Color::rgb(0xff, 0xdd, 0xbb);
            c.fill_triangle((-12.0, -12.0), (-18.0, -30.0), (-4.0, -16.0), fur);
            c.fill_triangle((12.0, -12.0), (18.0, -30.0), (4.0, -16.0), fur);
            c.fill_circle(0.0, 0.0, 18.0, fur);
            c.fill_circle(-6.0, -2.0, 2.5, Color::BLACK);
            c.fill_circle(6.0, -2.0, 2.5, Color::BLACK);
            c.fill_ellipse(0.0, 2.0, 3.0, 2.0, Color::rgb(0xff, 0xc0, 0xcb));
        }
        Pet::Dog => {
            c.fill_circle(0.0, 0.0, 20.0, Color::rgb(0xdf, 0xe6, 0xe9));
            c.fill_ellipse(-15.0, 2.0, 8.0, 16.0, DARK);
            c.fill_ellipse(15.0, 2.0, 8.0, 16.0, DARK);
            c.fill_circle(-6.0, -3.0, 2.5, Color::BLACK);
            c.fill_circle(6.0, -3.0, 2.5, Color::BLACK);
            c.fill_ellipse(0.0, 4.0, 5.0, 3.0, Color::BLACK);
        }
        Pet::Dragon => {
            let wing = Color::rgb(0x55, 0xef, 0xc4);
            c.fill_ellipse(-14.0, -8.0, 18.0, 10.0, wing);
            c.fill_ellipse(14.0, -8.0, 18.0, 10.0, wing);
            c.fill_triangle((-20.0, 20.0), (20.0, 20.0), (0.0, -25.0), Color::rgb(0xfd, 0xcb, 0x6e));
            c.fill_circle(-5.0, -6.0, 2.5, Color::BLACK);
            c.fill_circle(5.0, -6.0, 2.5, Color::BLACK);
        }
        Pet::None => {}
    }

    c.restore();
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn render(look: &Appearance) -> Canvas {
        let mut canvas = Canvas::new(200, 260).unwrap();
        draw_character(&mut canvas, 100.0, 90.0, 1.0, look);
        canvas
    }

    #[test]
    fn hair_index_wraps() {
        assert_eq!(Hair::from_index(0), Hair::Long);
        assert_eq!(Hair::from_index(19), Hair::Bald);
        assert_eq!(Hair::from_index(12), Hair::Pigtails);
    }

    #[test]
    fn skin_tone_shows_on_the_neck() {
        let look = Appearance {
            skin_tone: "#8d5524".into(),
            ..Appearance::default()
        };
        let canvas = render(&look);

        // Local (0, 38) is chin and neck, clear of the mouth.
        assert_eq!(canvas.frame().get(100, 90 + 38), Some(Color::rgb(0x8d, 0x55, 0x24)));
    }

    #[test]
    fn pet_is_drawn_only_when_chosen() {
        let plain = render(&Appearance::default());
        let with_dog = render(&Appearance {
            pet: Pet::Dog,
            ..Appearance::default()
        });

        // Dog head centre lands at (100 + 70, 90 + 90).
        assert_eq!(plain.frame().get(170, 180), Some(Color::TRANSPARENT));
        assert_ne!(with_dog.frame().get(170, 180), Some(Color::TRANSPARENT));
    }

    #[test]
    fn bad_hex_uses_fallback_colors() {
        let look = Appearance {
            outfit_color: "not a color".into(),
            ..Appearance::default()
        };
        let canvas = render(&look);

        // Dress body at local (0, 60).
        assert_eq!(canvas.frame().get(100, 150), Some(FALLBACK_OUTFIT));
    }

    #[test]
    fn transform_stack_is_balanced() {
        let mut canvas = Canvas::new(50, 50).unwrap();
        draw_character(&mut canvas, 25.0, 25.0, 0.1, &Appearance::default());
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);

        assert_eq!(canvas.frame().get(0, 0), Some(Color::BLACK));
    }
}
