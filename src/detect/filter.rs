//! Confidence cutoff applied before anything is drawn or spoken.

use crate::detect::result::{ConfidentDetection, Detection};

/// Detections must round above this to be shown and narrated. Not configurable.
pub const CONFIDENCE_THRESHOLD: f64 = 0.70;

/// Round a model score up to two decimal places.
pub fn round_confidence(score: f32) -> f64 {
    (f64::from(score) * 100.0).ceil() / 100.0
}

pub fn is_confident(score: f32) -> bool {
    round_confidence(score) > CONFIDENCE_THRESHOLD
}

/// Keep detections whose rounded confidence is strictly above the cutoff, in model order.
pub fn retain_confident<I>(detections: I) -> Vec<ConfidentDetection>
where
    I: IntoIterator<Item = Detection>,
{
    detections
        .into_iter()
        .filter_map(|detection| {
            let confidence = round_confidence(detection.confidence);
            (confidence > CONFIDENCE_THRESHOLD).then_some(ConfidentDetection {
                detection,
                confidence,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::BoundingBox;

    fn det(class_index: usize, confidence: f32) -> Detection {
        Detection::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), class_index, confidence)
    }

    #[test]
    fn rounding_goes_up_to_two_places() {
        assert_eq!(round_confidence(0.95), 0.95);
        assert_eq!(round_confidence(0.701), 0.71);
        assert_eq!(round_confidence(0.691), 0.7);
        assert_eq!(round_confidence(1.0), 1.0);
        assert_eq!(round_confidence(0.0), 0.0);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!is_confident(0.70));
        assert!(!is_confident(0.695));
        assert!(!is_confident(0.69));
        assert!(is_confident(0.7001));
        assert!(is_confident(0.71));
        assert!(is_confident(1.0));
    }

    #[test]
    fn retention_matches_rounded_comparison_for_all_centiles() {
        for step in 0..=1000 {
            let score = step as f32 / 1000.0;
            let expected = (f64::from(score) * 100.0).ceil() / 100.0 > 0.70;
            assert_eq!(is_confident(score), expected, "score {}", score);
        }
    }

    #[test]
    fn retain_keeps_order_and_duplicates() {
        let kept = retain_confident(vec![det(2, 0.9), det(0, 0.3), det(2, 0.75)]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].detection.class_index, 2);
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[1].confidence, 0.75);
    }
}
