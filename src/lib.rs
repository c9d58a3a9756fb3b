//! Object Narrator
//!
//! Captures webcam frames, runs a pretrained object detector on each one,
//! draws boxes and labels, shows a live log and speaks what it sees.
//!
//! # Architecture
//!
//! Everything runs on one thread. The window's event loop polls a
//! single-slot timer; when a tick is due the detection loop runs it start to
//! finish (capture, inference, filter, annotate, render, narrate) and the next
//! tick is scheduled a fixed delay later.
//!
//! # Module Structure
//!
//! - `ingest`: Frame sources (V4L2 webcams, still images, synthetic)
//! - `detect`: Detector backends, class table, confidence filter
//! - `annotate`: Corner boxes and label tags
//! - `narrate`: Text-to-speech
//! - `render` / `gui`: Log formatting, display surfaces, the desktop window
//! - `pipeline`: One tick of the capture-detect-render loop
//! - `schedule` / `app`: Start/stop state machine and tick timer
//!
//! # Cargo Features
//!
//! A plain build runs only against `stub://` cameras, still images and the
//! `stub` detector. The desktop application needs all three features:
//!
//! - `ingest-v4l2`: webcam capture through V4L2
//! - `backend-tract`: YOLOv8 ONNX inference with tract
//! - `gui`: the `minifb` window
//!
//! ```text
//! cargo run --release --features gui,ingest-v4l2,backend-tract
//! ```

pub mod annotate;
pub mod app;
pub mod config;
pub mod detect;
pub mod frame;
pub mod gui;
pub mod ingest;
pub mod narrate;
pub mod pipeline;
pub mod render;
pub mod schedule;
pub mod ui;

pub use annotate::{load_font, Annotator};
pub use app::{NarratorApp, TickOutcome};
pub use config::{CameraSettings, DisplaySettings, ModelSettings, NarratorConfig, SpeechSettings};
pub use detect::{
    class_name, open_backend, BoundingBox, Detection, DetectorBackend, ScriptedBackend,
    StubBackend, COCO_CLASSES, CONFIDENCE_THRESHOLD,
};
pub use frame::Frame;
#[cfg(feature = "ingest-v4l2")]
pub use ingest::V4l2Source;
pub use ingest::{open_source, FrameSource, StillImageSource, SyntheticSource};
pub use narrate::{open_narrator, CommandNarrator, MemoryNarrator, Narrator, SilentNarrator};
pub use pipeline::{DetectionLoop, FrameClock, TickReport};
pub use render::{format_log, ConsoleSurface, MemorySurface, RenderSurface};
pub use schedule::{CooperativeTimer, RunController, RunState, RunToken};
