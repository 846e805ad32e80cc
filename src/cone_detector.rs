use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use log::debug;

use crate::color_mask::{extract_cone_mask, ConeMask};
use crate::contours::Contour;
use crate::det::ContourDetector;
use crate::error::DetectError;
use crate::image_impl::{from_bytes, imread, BinaryMask};
use crate::postprocess::ContourPostProcess;
use crate::types::{ConeColor, DetectedCone, DetectorConfig};

pub struct ConeDetectOutput {
    /// Yellow detections first, then blue.
    pub cones: Vec<DetectedCone>,
    /// Wall-clock seconds for the whole call.
    pub elapse: f64,
}

impl ConeDetectOutput {
    pub fn empty() -> Self {
        Self {
            cones: Vec::new(),
            elapse: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.cones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }
}

/// Consumer of a finished detection, e.g. an annotator or a planner feed.
pub trait DetectionSink {
    fn consume(&mut self, image: &RgbImage, cones: &[DetectedCone]) -> Result<(), DetectError>;
}

impl<F> DetectionSink for F
where
    F: FnMut(&RgbImage, &[DetectedCone]) -> Result<(), DetectError>,
{
    fn consume(&mut self, image: &RgbImage, cones: &[DetectedCone]) -> Result<(), DetectError> {
        self(image, cones)
    }
}

/// Runs segmentation, edges, tracing and merging for the yellow and blue
/// channels. Holds configuration only; every call allocates its own buffers.
pub struct ConeDetector {
    pub cfg: DetectorConfig,
    pub detector: ContourDetector,
    pub postprocess: ContourPostProcess,
}

impl Default for ConeDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl ConeDetector {
    pub fn new(cfg: DetectorConfig) -> Self {
        let detector = ContourDetector::new(cfg.canny.clone());
        let postprocess = ContourPostProcess::new(&cfg.merge);
        Self {
            cfg,
            detector,
            postprocess,
        }
    }

    pub fn run(&self, img: &RgbImage) -> ConeDetectOutput {
        let start = Instant::now();

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return ConeDetectOutput::empty();
        }

        let mask = extract_cone_mask(img);
        let cones = self.run_on_mask(&mask);
        let elapse = start.elapsed().as_secs_f64();

        debug!("{} cones in {:.3} ms ({}x{})", cones.len(), elapse * 1000.0, width, height);

        ConeDetectOutput { cones, elapse }
    }

    /// Detection from precomputed colour masks.
    pub fn run_on_mask(&self, mask: &ConeMask) -> Vec<DetectedCone> {
        let white_contours = self.detector.detect(&mask.white);

        let (mut cones, blue) = if self.cfg.parallel_channels {
            rayon::join(
                || self.process_channel(&mask.yellow, &white_contours, ConeColor::Yellow),
                || self.process_channel(&mask.blue, &white_contours, ConeColor::Blue),
            )
        } else {
            (
                self.process_channel(&mask.yellow, &white_contours, ConeColor::Yellow),
                self.process_channel(&mask.blue, &white_contours, ConeColor::Blue),
            )
        };

        cones.extend(blue);
        cones
    }

    fn process_channel(
        &self,
        color_mask: &BinaryMask,
        white_contours: &[Contour],
        label: ConeColor,
    ) -> Vec<DetectedCone> {
        let color_contours = self.detector.detect(color_mask);
        self.postprocess.process(&color_contours, white_contours, label)
    }

    /// Run detection, then hand the image and result to `sink`.
    pub fn detect_with_sink<S: DetectionSink + ?Sized>(
        &self,
        img: &RgbImage,
        sink: &mut S,
    ) -> Result<ConeDetectOutput, DetectError> {
        let output = self.run(img);
        sink.consume(img, &output.cones)?;
        Ok(output)
    }

    pub fn detect_file<P: AsRef<Path>>(&self, path: P) -> Result<ConeDetectOutput, DetectError> {
        let img = imread(path)?;
        Ok(self.run(&img))
    }

    pub fn detect_from_bytes(&self, data: &[u8]) -> Result<ConeDetectOutput, DetectError> {
        let img = from_bytes(data)?;
        Ok(self.run(&img))
    }
}
