//! Debug rendering. Kept out of the detection path; wire it in through a
//! [`DetectionSink`].

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use log::info;

use crate::color_mask::ConeMask;
use crate::cone_detector::DetectionSink;
use crate::error::DetectError;
use crate::geometry::Rect;
use crate::types::{ConeColor, DetectedCone};

pub fn label_color(label: ConeColor) -> Rgb<u8> {
    match label {
        ConeColor::Yellow => Rgb([255, 255, 0]),
        ConeColor::Blue => Rgb([0, 0, 255]),
    }
}

/// Outline from `(x, y)` to `(x + width, y + height)`, both corners inclusive.
/// Pixels outside the image are skipped.
pub fn draw_box(img: &mut RgbImage, rect: &Rect, color: Rgb<u8>) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let mut put = |x: i32, y: i32| {
        if x >= 0 && y >= 0 && x < w && y < h {
            img.put_pixel(x as u32, y as u32, color);
        }
    };

    let (min_x, min_y, max_x, max_y) = (rect.x, rect.y, rect.x_max(), rect.y_max());
    for x in min_x..=max_x {
        put(x, min_y);
        put(x, max_y);
    }
    for y in min_y..=max_y {
        put(min_x, y);
        put(max_x, y);
    }
}

pub fn annotate(img: &RgbImage, cones: &[DetectedCone]) -> RgbImage {
    let mut out = img.clone();
    for cone in cones {
        draw_box(&mut out, &cone.bounding_box, label_color(cone.label));
    }
    out
}

/// Red = blue mask, green = yellow mask, blue = white mask.
pub fn mask_debug_image(mask: &ConeMask) -> RgbImage {
    let (w, h) = mask.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let on = |set: bool| if set { 255 } else { 0 };
        Rgb([on(mask.blue.get(x, y)), on(mask.yellow.get(x, y)), on(mask.white.get(x, y))])
    })
}

/// Saves an annotated copy of every frame it receives.
pub struct AnnotateSink {
    pub path: PathBuf,
}

impl AnnotateSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl DetectionSink for AnnotateSink {
    fn consume(&mut self, image: &RgbImage, cones: &[DetectedCone]) -> Result<(), DetectError> {
        annotate(image, cones).save(&self.path)?;
        info!("Saved annotated image to {}", self.path.display());
        Ok(())
    }
}
