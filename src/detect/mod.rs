mod backend;
pub mod backends;
mod classes;
pub mod filter;
mod result;
pub mod yolo;

pub use backend::DetectorBackend;
pub use backends::{open_backend, ScriptedBackend, StubBackend};
pub use classes::{class_name, COCO_CLASSES};
pub use filter::{is_confident, retain_confident, round_confidence, CONFIDENCE_THRESHOLD};
pub use result::{BoundingBox, ConfidentDetection, Detection, PixelCorners};
pub use yolo::{decode_predictions, non_max_suppression, YoloParams};
