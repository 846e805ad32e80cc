use log::{debug, trace};

use crate::contours::Contour;
use crate::geometry::Rect;
use crate::types::{ConeColor, DetectedCone, MergeConfig};

/// Turns raw per-channel contours into labeled cone boxes.
///
/// Order of operations: self-merge, white-stripe absorption, re-merge,
/// containment filtering, then point-count / box-size filtering.
pub struct ContourPostProcess {
    pub merge_pad: i32,
    pub white_merge_pad: i32,
    pub min_points: usize,
    pub min_box_size: i32,
    pub center_offset_ratio: f32,
}

impl ContourPostProcess {
    pub fn new(cfg: &MergeConfig) -> Self {
        Self {
            merge_pad: cfg.contour_merge_pad,
            white_merge_pad: cfg.white_merge_pad,
            min_points: cfg.min_points,
            min_box_size: cfg.min_box_size,
            center_offset_ratio: cfg.center_offset_ratio,
        }
    }

    pub fn process(
        &self,
        color_contours: &[Contour],
        white_contours: &[Contour],
        label: ConeColor,
    ) -> Vec<DetectedCone> {
        if color_contours.is_empty() {
            return Vec::new();
        }

        let merged = merge_contours(color_contours, self.merge_pad, self.center_offset_ratio);
        let with_white = merge_white_contours(&merged, white_contours, self.white_merge_pad);
        let remerged = merge_contours(&with_white, self.merge_pad, self.center_offset_ratio);
        let filtered = filter_contained_contours(remerged);

        debug!(
            "{label}: {} raw -> {} merged -> {} after white -> {} after containment",
            color_contours.len(),
            merged.len(),
            with_white.len(),
            filtered.len()
        );

        create_detected_cones(&filtered, label, self.min_points, self.min_box_size)
    }
}

/// Group test against the running group box: padded overlap plus a bound
/// on horizontal centre offset relative to the average width.
fn try_merge(
    base_box: &Rect,
    other_box: &Rect,
    pad: i32,
    center_offset_ratio: f32,
) -> Option<Rect> {
    if !base_box.overlaps(other_box, pad) {
        return None;
    }

    let (center_a, _) = base_box.center();
    let (center_b, _) = other_box.center();
    let dx = (center_a - center_b).abs();
    let avg_width = (base_box.width + other_box.width) as f32 * 0.5;

    if dx > avg_width * center_offset_ratio {
        return None;
    }

    Some(base_box.union(other_box))
}

/// One sweep per group: contour `i` seeds a group and every later unused
/// contour passing [`try_merge`] against the growing group box joins it.
/// Earlier rejects are not revisited.
pub fn merge_contours(contours: &[Contour], pad: i32, center_offset_ratio: f32) -> Vec<Contour> {
    let mut merged = Vec::new();
    let mut used = vec![false; contours.len()];

    for i in 0..contours.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut group = contours[i].clone();
        let mut group_box = group.bounding_box();

        for j in (i + 1)..contours.len() {
            if used[j] {
                continue;
            }

            let other_box = contours[j].bounding_box();
            if let Some(expanded) = try_merge(&group_box, &other_box, pad, center_offset_ratio) {
                trace!("merge contour {j} into group {i}");
                group.extend(&contours[j]);
                group_box = expanded;
                used[j] = true;
            }
        }

        merged.push(group);
    }

    merged
}

/// Absorb every white contour whose box overlaps a base contour's box.
/// No centre-offset test; a stripe may be absorbed by several bases.
pub fn merge_white_contours(
    base_contours: &[Contour],
    white_contours: &[Contour],
    pad: i32,
) -> Vec<Contour> {
    let white_boxes: Vec<Rect> = white_contours.iter().map(Contour::bounding_box).collect();

    base_contours
        .iter()
        .map(|base| {
            let base_box = base.bounding_box();
            let mut merged = base.clone();
            for (white, white_box) in white_contours.iter().zip(&white_boxes) {
                if base_box.overlaps(white_box, pad) {
                    merged.extend(white);
                }
            }
            merged
        })
        .collect()
}

/// Drop every contour whose box lies inside another surviving contour's box.
/// Of two identical boxes the earlier one is dropped.
pub fn filter_contained_contours(contours: Vec<Contour>) -> Vec<Contour> {
    let boxes: Vec<Rect> = contours.iter().map(Contour::bounding_box).collect();
    let mut keep = vec![true; contours.len()];

    for i in 0..contours.len() {
        for j in 0..contours.len() {
            if i == j || !keep[j] {
                continue;
            }
            if boxes[i].is_inside(&boxes[j]) {
                keep[i] = false;
                break;
            }
        }
    }

    contours
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect()
}

pub fn create_detected_cones(
    contours: &[Contour],
    label: ConeColor,
    min_points: usize,
    min_box_size: i32,
) -> Vec<DetectedCone> {
    contours
        .iter()
        .filter(|c| c.len() >= min_points)
        .map(Contour::bounding_box)
        .filter(|b| b.width >= min_box_size && b.height >= min_box_size)
        .map(|bounding_box| DetectedCone { bounding_box, label })
        .collect()
}
