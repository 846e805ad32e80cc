//! # conetrace - Pure Rust Track-Cone Detection
//!
//! conetrace finds yellow and blue track-boundary cones in a single RGB frame
//! and reports them as labeled, axis-aligned boxes.
//!
//! ## Pipeline
//!
//! - **Color segmentation**: HSV thresholds split the frame into yellow, blue
//!   and white (stripe) masks
//! - **Canny edges**: optional Gaussian blur, Sobel gradients, non-maximum
//!   suppression and hysteresis on each mask
//! - **Border following**: 8-connected Moore-neighbour tracing, capped at
//!   1000 points per contour
//! - **Merging**: fragments of one cone are grouped, white stripes absorbed,
//!   nested loops and noise dropped
//!
//! Every call is stateless: buffers are allocated per frame and nothing is
//! carried over between frames.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conetrace::{ConeDetector, DetectorConfig};
//!
//! let detector = ConeDetector::new(DetectorConfig::default());
//! let output = detector.detect_file("frame.png")?;
//!
//! for cone in &output.cones {
//!     let b = cone.bounding_box;
//!     println!("{} at ({}, {}) {}x{}", cone.label, b.x, b.y, b.width, b.height);
//! }
//! # Ok::<(), conetrace::DetectError>(())
//! ```

// Core modules
mod error;
mod types;
mod image_impl;
mod geometry;
mod cone_detector;

pub mod canny;
pub mod color_mask;
pub mod contours;
pub mod det;
pub mod draw;
pub mod postprocess;

// FFI module for C bindings
#[cfg(feature = "ffi")]
pub mod ffi;

// Public API exports
pub use crate::cone_detector::{ConeDetectOutput, ConeDetector, DetectionSink};
pub use crate::error::DetectError;
pub use crate::geometry::Rect;
pub use crate::image_impl::{from_bytes, from_rgb8, imread, rgb_to_luma, BinaryMask};
pub use crate::types::{CannyParams, ConeColor, DetectedCone, DetectorConfig, MergeConfig};

// Re-export for easier access
pub use image::RgbImage;

/// Detect cones with the default configuration.
pub fn detect_cones(img: &RgbImage) -> Vec<DetectedCone> {
    ConeDetector::default().run(img).cones
}
