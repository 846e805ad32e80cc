use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::geometry::Rect;

/// Cone colour classes that produce detections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConeColor {
    Yellow,
    Blue,
}

impl ConeColor {
    pub fn as_str(self) -> &'static str {
        match self {
            ConeColor::Yellow => "yellow",
            ConeColor::Blue => "blue",
        }
    }
}

impl fmt::Display for ConeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled cone box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedCone {
    #[serde(flatten)]
    pub bounding_box: Rect,
    pub label: ConeColor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
    pub apply_gaussian_blur: bool,
    /// Only read when `apply_gaussian_blur` is set.
    pub sigma: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low_threshold: 0.1,
            high_threshold: 0.3,
            apply_gaussian_blur: false,
            sigma: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub contour_merge_pad: i32,
    pub white_merge_pad: i32,
    pub min_points: usize,
    pub min_box_size: i32,
    /// Maximum horizontal centre offset, as a fraction of the average width,
    /// for two color contours to be grouped.
    pub center_offset_ratio: f32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            contour_merge_pad: 20,
            white_merge_pad: 2,
            min_points: 10,
            min_box_size: 5,
            center_offset_ratio: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub canny: CannyParams,
    pub merge: MergeConfig,
    /// Run the yellow and blue channels on the rayon pool.
    pub parallel_channels: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            canny: CannyParams::default(),
            merge: MergeConfig::default(),
            parallel_channels: true,
        }
    }
}

impl DetectorConfig {
    /// Load a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DetectError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, DetectError> {
        Ok(serde_json::from_str(data)?)
    }
}
