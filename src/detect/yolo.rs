//! YOLOv8 output decoding.
//!
//! The detection head emits one tensor of shape `[1, 4 + classes, anchors]`
//! (some exports transpose it to `[1, anchors, 4 + classes]`). Each anchor
//! carries a center-form box in model-input pixels followed by per-class scores.

use anyhow::{anyhow, Result};

use crate::detect::result::{BoundingBox, Detection};

/// Decoding parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloParams {
    pub num_classes: usize,
    /// Square model input edge, in pixels.
    pub input_size: u32,
    pub prefilter_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

/// Decode a raw head tensor into frame-space detections, sorted by score.
pub fn decode_predictions(
    data: &[f32],
    shape: &[usize],
    params: &YoloParams,
    frame_width: u32,
    frame_height: u32,
) -> Result<Vec<Detection>> {
    let attrs = params.num_classes + 4;
    let (anchors, channel_major) = match shape {
        [1, a, b] if *a == attrs => (*b, true),
        [1, a, b] if *b == attrs => (*a, false),
        _ => {
            return Err(anyhow!(
                "unexpected detection head shape {:?} for {} classes",
                shape,
                params.num_classes
            ))
        }
    };
    if data.len() != attrs * anchors {
        return Err(anyhow!(
            "detection head holds {} values, shape {:?} implies {}",
            data.len(),
            shape,
            attrs * anchors
        ));
    }

    let at = |anchor: usize, attr: usize| -> f32 {
        if channel_major {
            data[attr * anchors + anchor]
        } else {
            data[anchor * attrs + attr]
        }
    };

    let scale_x = frame_width as f32 / params.input_size as f32;
    let scale_y = frame_height as f32 / params.input_size as f32;

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let (class_index, score) = (0..params.num_classes)
            .map(|class| (class, at(anchor, 4 + class)))
            .fold((0, f32::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 {
                    cur
                } else {
                    best
                }
            });
        if !score.is_finite() || score < params.prefilter_threshold {
            continue;
        }
        let bbox = BoundingBox::from_center(
            at(anchor, 0) * scale_x,
            at(anchor, 1) * scale_y,
            at(anchor, 2) * scale_x,
            at(anchor, 3) * scale_y,
        );
        let bbox = clamp_to_frame(bbox, frame_width as f32, frame_height as f32);
        candidates.push(Detection::new(bbox, class_index, score.min(1.0)));
    }

    Ok(non_max_suppression(
        candidates,
        params.iou_threshold,
        params.max_detections,
    ))
}

/// Class-aware greedy NMS. Output is sorted by descending confidence.
pub fn non_max_suppression(
    mut candidates: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept.iter().any(|k| {
            k.class_index == candidate.class_index
                && k.bbox.intersection_over_union(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

fn clamp_to_frame(bbox: BoundingBox, width: f32, height: f32) -> BoundingBox {
    BoundingBox::new(
        bbox.x1.clamp(0.0, width),
        bbox.y1.clamp(0.0, height),
        bbox.x2.clamp(0.0, width),
        bbox.y2.clamp(0.0, height),
    )
}
