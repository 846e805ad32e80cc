//! Image plumbing shared by the pipeline stages: decoding, raw buffers,
//! binary masks and luma grids.

use std::io::Cursor;
use std::path::Path;

use image::{ImageReader, RgbImage};
use ndarray::Array2;

use crate::error::DetectError;

/// Row-major boolean grid, one entry per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl BinaryMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    /// Returns `None` when `data` does not hold exactly `width * height` entries.
    pub fn from_vec(width: u32, height: u32, data: Vec<bool>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Render as a luma grid: set pixels are 1.0, the rest 0.0.
    pub fn to_luma(&self) -> Array2<f32> {
        let (w, h) = (self.width as usize, self.height as usize);
        Array2::from_shape_fn((h, w), |(y, x)| if self.data[y * w + x] { 1.0 } else { 0.0 })
    }
}

/// Luma `0.299R + 0.587G + 0.114B`, normalized to [0, 1]. Shape is `(height, width)`.
pub fn rgb_to_luma(img: &RgbImage) -> Array2<f32> {
    let (w, h) = img.dimensions();
    let mut out = Array2::<f32>::zeros((h as usize, w as usize));
    for (x, y, p) in img.enumerate_pixels() {
        out[[y as usize, x as usize]] =
            (0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32) / 255.0;
    }
    out
}

pub fn imread<P: AsRef<Path>>(path: P) -> Result<RgbImage, DetectError> {
    let img = image::open(path)?;
    Ok(img.to_rgb8())
}

pub fn from_bytes(data: &[u8]) -> Result<RgbImage, DetectError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;
    Ok(img.to_rgb8())
}

/// Wrap a tightly packed row-major RGB buffer.
pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Result<RgbImage, DetectError> {
    let len = data.len();
    RgbImage::from_raw(width, height, data).ok_or(DetectError::InvalidBuffer { width, height, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_mask_luma_render() {
        let mut mask = BinaryMask::new(4, 3);
        mask.set(2, 1, true);
        let luma = mask.to_luma();
        assert_eq!(luma.dim(), (3, 4));
        assert_eq!(luma[[1, 2]], 1.0);
        assert_eq!(luma.sum(), 1.0);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_rgb_to_luma_white_and_black() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        let luma = rgb_to_luma(&img);
        assert!((luma[[0, 0]] - 1.0).abs() < 1e-5);
        assert_eq!(luma[[0, 1]], 0.0);
    }

    #[test]
    fn test_from_rgb8_rejects_short_buffer() {
        assert!(from_rgb8(2, 2, vec![0; 12]).is_ok());
        let err = from_rgb8(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(err, DetectError::InvalidBuffer { len: 11, .. }));
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(BinaryMask::from_vec(3, 3, vec![false; 9]).is_some());
        assert!(BinaryMask::from_vec(3, 3, vec![false; 8]).is_none());
    }

    #[test]
    fn test_zero_sized_mask() {
        let mask = BinaryMask::new(0, 5);
        assert!(mask.is_empty());
        assert_eq!(mask.to_luma().len(), 0);
    }
}
