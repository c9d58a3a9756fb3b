/// Axis-aligned box in frame pixel coordinates (`x1,y1` top-left, `x2,y2` bottom-right).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box from a center point and size, as YOLO heads emit them.
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn intersection_over_union(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }

    /// Integer pixel corners, truncating toward zero.
    pub fn pixel_corners(&self) -> PixelCorners {
        PixelCorners {
            x1: self.x1 as i32,
            y1: self.y1 as i32,
            x2: self.x2 as i32,
            y2: self.y2 as i32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCorners {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelCorners {
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

/// One raw model output.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Index into `COCO_CLASSES`.
    pub class_index: usize,
    /// Model score in `[0, 1]`.
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_index: usize, confidence: f32) -> Self {
        Self {
            bbox,
            class_index,
            confidence,
        }
    }
}

/// Detection that passed the confidence cutoff, with its rounded confidence.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfidentDetection {
    pub detection: Detection,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_corners_truncate() {
        let bbox = BoundingBox::new(10.9, 20.2, 110.99, 220.5);
        let corners = bbox.pixel_corners();
        assert_eq!(corners, PixelCorners { x1: 10, y1: 20, x2: 110, y2: 220 });
        assert_eq!(corners.width(), 100);
        assert_eq!(corners.height(), 200);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!((a.intersection_over_union(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.intersection_over_union(&b), 0.0);
    }

    #[test]
    fn center_form_round_trips_size() {
        let bbox = BoundingBox::from_center(50.0, 40.0, 20.0, 10.0);
        assert_eq!(bbox, BoundingBox::new(40.0, 35.0, 60.0, 45.0));
        assert_eq!(bbox.area(), 200.0);
    }
}
