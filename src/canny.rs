//! Canny edge detection on a single-channel float image.
//!
//! Stages, in order:
//! - optional separable Gaussian blur (clamp-to-edge borders),
//! - 3×3 Sobel gradients on interior pixels,
//! - non-maximum suppression with 4 direction bins,
//! - hysteresis thresholding by breadth-first flood fill over 8-neighbours.
//!
//! The outermost 1-pixel frame never receives a gradient, so it is never an
//! edge. All grids are `(height, width)` shaped.

use std::collections::VecDeque;

use image::RgbImage;
use ndarray::Array2;

use crate::image_impl::{rgb_to_luma, BinaryMask};
use crate::types::CannyParams;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Gradient field. Only interior pixels are populated; the border stays zero.
#[derive(Clone, Debug)]
pub struct Grad {
    pub magnitude: Array2<f32>,
    /// Radians, `atan2(gy, gx)`.
    pub direction: Array2<f32>,
}

/// Normalized 1-D Gaussian kernel of radius `ceil(3σ)`.
/// A non-positive (or NaN) sigma gives the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if sigma.is_nan() || sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (3.0 * sigma).ceil().max(0.0) as i32;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (-((x * x) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// In-place separable blur: horizontal pass, then vertical pass.
pub fn gaussian_blur(buffer: &mut Array2<f32>, sigma: f32) {
    let (h, w) = buffer.dim();
    if w == 0 || h == 0 {
        return;
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let mut temp = Array2::<f32>::zeros((h, w));

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (i, weight) in kernel.iter().enumerate() {
                let nx = (x as isize + i as isize - radius).clamp(0, w as isize - 1) as usize;
                acc += buffer[[y, nx]] * weight;
            }
            temp[[y, x]] = acc;
        }
    }

    for x in 0..w {
        for y in 0..h {
            let mut acc = 0.0;
            for (i, weight) in kernel.iter().enumerate() {
                let ny = (y as isize + i as isize - radius).clamp(0, h as isize - 1) as usize;
                acc += temp[[ny, x]] * weight;
            }
            buffer[[y, x]] = acc;
        }
    }
}

pub fn sobel_gradients(src: &Array2<f32>) -> Grad {
    let (h, w) = src.dim();
    let mut magnitude = Array2::<f32>::zeros((h, w));
    let mut direction = Array2::<f32>::zeros((h, w));

    if w < 3 || h < 3 {
        return Grad { magnitude, direction };
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for ky in 0..3 {
                for kx in 0..3 {
                    let val = src[[y + ky - 1, x + kx - 1]];
                    sum_x += SOBEL_KERNEL_X[ky][kx] * val;
                    sum_y += SOBEL_KERNEL_Y[ky][kx] * val;
                }
            }
            magnitude[[y, x]] = (sum_x * sum_x + sum_y * sum_y).sqrt();
            direction[[y, x]] = sum_y.atan2(sum_x);
        }
    }

    Grad { magnitude, direction }
}

/// Keep a magnitude only if it is `>=` both neighbours along its quantized
/// gradient direction.
pub fn non_max_suppression(grad: &Grad) -> Array2<f32> {
    let mag = &grad.magnitude;
    let (h, w) = mag.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    if w < 3 || h < 3 {
        return result;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let angle = (grad.direction[[y, x]].to_degrees() + 180.0).rem_euclid(180.0);

            let (a, b) = if !(22.5..157.5).contains(&angle) {
                (mag[[y, x - 1]], mag[[y, x + 1]])
            } else if angle < 67.5 {
                (mag[[y - 1, x - 1]], mag[[y + 1, x + 1]])
            } else if angle < 112.5 {
                (mag[[y - 1, x]], mag[[y + 1, x]])
            } else {
                (mag[[y - 1, x + 1]], mag[[y + 1, x - 1]])
            };

            let m = mag[[y, x]];
            if m >= a && m >= b {
                result[[y, x]] = m;
            }
        }
    }

    result
}

/// Seeds every pixel `>= high`, then grows through 8-connected pixels `>= low`.
pub fn hysteresis(nms: &Array2<f32>, low: f32, high: f32) -> BinaryMask {
    let (h, w) = nms.dim();
    let mut result = BinaryMask::new(w as u32, h as u32);
    let mut queue = VecDeque::new();

    for ((y, x), &v) in nms.indexed_iter() {
        if v >= high {
            result.set(x as u32, y as u32, true);
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS_8 {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !result.get(nx as u32, ny as u32) && nms[[ny, nx]] >= low {
                result.set(nx as u32, ny as u32, true);
                queue.push_back((nx, ny));
            }
        }
    }

    result
}

/// Full Canny pass on a luma grid with values in [0, 1].
pub fn detect_edges(luma: &Array2<f32>, params: &CannyParams) -> BinaryMask {
    let (h, w) = luma.dim();
    if w == 0 || h == 0 {
        return BinaryMask::new(w as u32, h as u32);
    }

    let blurred;
    let src = if params.apply_gaussian_blur {
        let mut buf = luma.clone();
        gaussian_blur(&mut buf, params.sigma);
        blurred = buf;
        &blurred
    } else {
        luma
    };

    let grad = sobel_gradients(src);
    let nms = non_max_suppression(&grad);
    hysteresis(&nms, params.low_threshold, params.high_threshold)
}

pub fn detect_edges_rgb(img: &RgbImage, params: &CannyParams) -> BinaryMask {
    detect_edges(&rgb_to_luma(img), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn square(size: usize, lo: usize, hi: usize) -> Array2<f32> {
        Array2::from_shape_fn((size, size), |(y, x)| {
            if (lo..=hi).contains(&x) && (lo..=hi).contains(&y) {
                1.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn test_kernel_is_normalized() {
        let k = gaussian_kernel(1.0);
        assert_eq!(k.len(), 7);
        assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(k[3] > k[2] && k[2] > k[1]);
        assert!((k[0] - k[6]).abs() < 1e-7);
    }

    #[test]
    fn test_degenerate_sigma_leaves_image_unchanged() {
        assert_eq!(gaussian_kernel(0.0), vec![1.0]);
        assert_eq!(gaussian_kernel(-2.0), vec![1.0]);
        assert_eq!(gaussian_kernel(f32::NAN), vec![1.0]);

        let src = square(12, 3, 8);
        let mut img = src.clone();
        gaussian_blur(&mut img, 0.0);
        assert_eq!(img, src);

        let params = CannyParams {
            apply_gaussian_blur: true,
            sigma: 0.0,
            ..CannyParams::default()
        };
        assert_eq!(detect_edges(&src, &params), detect_edges(&src, &CannyParams::default()));
    }

    #[test]
    fn test_blur_uniform_is_fixed_point() {
        let mut img = Array2::from_elem((9, 13), 0.42f32);
        gaussian_blur(&mut img, 1.0);
        for &v in img.iter() {
            assert!((v - 0.42).abs() < 1e-5, "value drifted to {v}");
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut img = Array2::<f32>::zeros((11, 11));
        img[[5, 5]] = 1.0;
        gaussian_blur(&mut img, 1.0);
        assert!((img.sum() - 1.0).abs() < 1e-4);
        assert!(img[[5, 5]] < 1.0);
        assert!(img[[5, 6]] > 0.0 && img[[4, 5]] > 0.0);
        assert_eq!(img[[5, 6]], img[[5, 4]]);
    }

    #[test]
    fn test_sobel_vertical_step() {
        // Left half dark, right half bright.
        let img = Array2::from_shape_fn((5, 6), |(_, x)| if x >= 3 { 1.0 } else { 0.0 });
        let grad = sobel_gradients(&img);
        assert_eq!(grad.magnitude[[2, 2]], 4.0);
        assert_eq!(grad.magnitude[[2, 3]], 4.0);
        assert_eq!(grad.magnitude[[2, 1]], 0.0);
        assert_eq!(grad.direction[[2, 2]], 0.0);
        // Border is never computed.
        assert_eq!(grad.magnitude[[0, 3]], 0.0);
        assert_eq!(grad.magnitude[[2, 5]], 0.0);
    }

    #[test]
    fn test_sobel_horizontal_step_points_down() {
        let img = Array2::from_shape_fn((6, 5), |(y, _)| if y >= 3 { 1.0 } else { 0.0 });
        let grad = sobel_gradients(&img);
        assert_eq!(grad.magnitude[[3, 2]], 4.0);
        assert!((grad.direction[[3, 2]] - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_nms_thins_ridge() {
        let mut magnitude = Array2::<f32>::zeros((5, 7));
        for y in 0..5 {
            magnitude[[y, 2]] = 1.0;
            magnitude[[y, 3]] = 3.0;
            magnitude[[y, 4]] = 2.0;
        }
        let grad = Grad {
            magnitude,
            direction: Array2::zeros((5, 7)),
        };
        let nms = non_max_suppression(&grad);
        for y in 1..4 {
            assert_eq!(nms[[y, 3]], 3.0);
            assert_eq!(nms[[y, 2]], 0.0);
            assert_eq!(nms[[y, 4]], 0.0);
        }
        // Border row is untouched.
        assert_eq!(nms[[0, 3]], 0.0);
        assert_eq!(nms[[4, 3]], 0.0);
    }

    #[test]
    fn test_nms_diagonal_bins() {
        let mut magnitude = Array2::<f32>::zeros((3, 3));
        magnitude[[1, 1]] = 2.0;
        magnitude[[0, 0]] = 5.0;
        let mut direction = Array2::<f32>::zeros((3, 3));
        direction[[1, 1]] = 45f32.to_radians();
        let nms = non_max_suppression(&Grad {
            magnitude: magnitude.clone(),
            direction: direction.clone(),
        });
        assert_eq!(nms[[1, 1]], 0.0);

        // The anti-diagonal bin compares against other neighbours.
        direction[[1, 1]] = 135f32.to_radians();
        let nms = non_max_suppression(&Grad { magnitude, direction });
        assert_eq!(nms[[1, 1]], 2.0);
    }

    #[test]
    fn test_hysteresis_follows_weak_chain() {
        let mut nms = Array2::<f32>::zeros((5, 8));
        nms[[2, 1]] = 0.5; // strong
        nms[[2, 2]] = 0.15; // weak, connected
        nms[[3, 3]] = 0.15; // weak, diagonal to the previous
        nms[[1, 6]] = 0.2; // weak, isolated
        nms[[2, 5]] = 0.05; // below low

        let mask = hysteresis(&nms, 0.1, 0.3);
        assert!(mask.get(1, 2));
        assert!(mask.get(2, 2));
        assert!(mask.get(3, 3));
        assert!(!mask.get(6, 1));
        assert!(!mask.get(5, 2));
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn test_hysteresis_does_not_wrap_rows() {
        let mut nms = Array2::<f32>::zeros((3, 4));
        nms[[1, 3]] = 1.0;
        nms[[2, 0]] = 0.2;
        let mask = hysteresis(&nms, 0.1, 0.3);
        assert!(mask.get(3, 1));
        assert!(!mask.get(0, 2));
    }

    #[test]
    fn test_blank_image_has_no_edges() {
        let edges = detect_edges(&Array2::zeros((8, 8)), &CannyParams::default());
        assert_eq!(edges.dimensions(), (8, 8));
        assert_eq!(edges.count(), 0);

        let blurred = CannyParams {
            apply_gaussian_blur: true,
            ..CannyParams::default()
        };
        assert_eq!(detect_edges(&Array2::from_elem((8, 8), 0.7), &blurred).count(), 0);
    }

    #[test]
    fn test_square_edges_stay_off_border() {
        let edges = detect_edges(&square(20, 5, 14), &CannyParams::default());
        assert!(edges.count() > 0);
        for i in 0..20 {
            assert!(!edges.get(i, 0) && !edges.get(i, 19));
            assert!(!edges.get(0, i) && !edges.get(19, i));
        }
        // Edges hug the square boundary on both sides.
        assert!(edges.get(4, 10) && edges.get(5, 10));
        assert!(edges.get(14, 10) && edges.get(15, 10));
        assert!(!edges.get(10, 10));
    }

    #[test]
    fn test_rgb_entry_point_and_tiny_images() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        assert_eq!(detect_edges_rgb(&img, &CannyParams::default()).count(), 0);
        assert!(detect_edges(&Array2::zeros((0, 0)), &CannyParams::default()).is_empty());
    }
}
