use conetrace::{BinaryMask, RgbImage};
use image::Rgb;

pub const YELLOW: Rgb<u8> = Rgb([250, 200, 10]);
pub const BLUE: Rgb<u8> = Rgb([20, 40, 220]);
pub const WHITE: Rgb<u8> = Rgb([245, 245, 245]);
pub const ASPHALT: Rgb<u8> = Rgb([60, 60, 64]);

/// Fill the inclusive rectangle `(x0, y0)..=(x1, y1)`.
pub fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Cone-like block: colored body with a white stripe across the middle.
pub fn striped_cone(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    fill_rect(img, x0, y0, x0 + w - 1, y0 + h - 1, color);
    let stripe_top = y0 + h / 2 - 2;
    fill_rect(img, x0, stripe_top, x0 + w - 1, stripe_top + 3, WHITE);
}

pub fn mask_rect(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> BinaryMask {
    let mut mask = BinaryMask::new(width, height);
    for y in y0..=y1 {
        for x in x0..=x1 {
            mask.set(x, y, true);
        }
    }
    mask
}
