use log::debug;

use crate::canny::detect_edges;
use crate::contours::{trace_contours, Contour};
use crate::image_impl::BinaryMask;
use crate::types::CannyParams;

/// Mask → edge map → contours.
#[derive(Debug, Clone, Default)]
pub struct ContourDetector {
    pub params: CannyParams,
}

impl ContourDetector {
    pub fn new(params: CannyParams) -> Self {
        Self { params }
    }

    /// The mask is rendered as a luma image (set = 1.0) before edge detection.
    pub fn detect(&self, mask: &BinaryMask) -> Vec<Contour> {
        let edges = detect_edges(&mask.to_luma(), &self.params);
        let contours = trace_contours(&edges);
        debug!(
            "{} edge pixels -> {} contours ({}x{})",
            edges.count(),
            contours.len(),
            mask.width(),
            mask.height()
        );
        contours
    }
}
