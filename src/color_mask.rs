//! Per-pixel HSV classification into yellow / blue / white masks.
//!
//! Classes are tested in priority order (yellow, blue, white) and the first
//! match wins, so a pixel is set in at most one mask. Orange cones are not
//! classified yet.

use image::RgbImage;

use crate::image_impl::BinaryMask;

#[derive(Debug, Clone)]
pub struct ConeMask {
    pub yellow: BinaryMask,
    pub blue: BinaryMask,
    pub white: BinaryMask,
}

impl ConeMask {
    pub fn dimensions(&self) -> (u32, u32) {
        self.yellow.dimensions()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    Yellow,
    Blue,
    White,
    None,
}

/// RGB in [0, 255] to (hue, saturation, value), each in [0, 1].
///
/// Hue is 0 for achromatic pixels. When channels tie for the maximum, red
/// wins over green and green over blue.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let (offset, value, c1, c2) = if b > g && b > r {
        (4.0, b, r, g)
    } else if g > r {
        (2.0, g, b, r)
    } else {
        (0.0, r, g, b)
    };

    if value == 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let delta = value - c1.min(c2);
    if delta == 0.0 {
        return (0.0, 0.0, value);
    }

    let mut hue = (offset + (c1 - c2) / delta) / 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }
    (hue, delta / value, value)
}

#[inline]
fn is_yellow(h: f32, s: f32, v: f32) -> bool {
    h > 0.10 && h < 0.18 && s > 0.4 && v > 0.4
}

#[inline]
fn is_blue(h: f32, s: f32, v: f32) -> bool {
    h > 0.55 && h < 0.72 && s > 0.3 && v > 0.3
}

#[inline]
fn is_white(s: f32, v: f32) -> bool {
    (v > 0.85 && s < 0.2) || (v > 0.7 && s < 0.25)
}

pub fn classify_pixel(r: u8, g: u8, b: u8) -> PixelClass {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    if is_yellow(h, s, v) {
        PixelClass::Yellow
    } else if is_blue(h, s, v) {
        PixelClass::Blue
    } else if is_white(s, v) {
        PixelClass::White
    } else {
        PixelClass::None
    }
}

pub fn extract_cone_mask(img: &RgbImage) -> ConeMask {
    let (width, height) = img.dimensions();
    let mut yellow = BinaryMask::new(width, height);
    let mut blue = BinaryMask::new(width, height);
    let mut white = BinaryMask::new(width, height);

    for (x, y, p) in img.enumerate_pixels() {
        match classify_pixel(p[0], p[1], p[2]) {
            PixelClass::Yellow => yellow.set(x, y, true),
            PixelClass::Blue => blue.set(x, y, true),
            PixelClass::White => white.set(x, y, true),
            PixelClass::None => {}
        }
    }

    ConeMask { yellow, blue, white }
}
