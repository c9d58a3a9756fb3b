#![cfg(feature = "backend-tract")]

use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use tract_onnx::prelude::*;

use crate::config::ModelSettings;
use crate::detect::backend::DetectorBackend;
use crate::detect::classes::COCO_CLASSES;
use crate::detect::result::Detection;
use crate::detect::yolo::{decode_predictions, YoloParams};
use crate::frame::Frame;

/// Tract-based backend for YOLOv8 ONNX exports.
///
/// Loads a local model file once and runs it on every frame. Frames are
/// resized to the square model input; boxes are scaled back to frame pixels.
pub struct TractYoloBackend {
    model: TypedRunnableModel<TypedModel>,
    params: YoloParams,
}

impl TractYoloBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new(settings: &ModelSettings) -> Result<Self> {
        let model_path = settings.path.as_path();
        let size = settings.input_size as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        log::info!(
            "TractYoloBackend: loaded {} ({}x{} input)",
            model_path.display(),
            size,
            size
        );

        Ok(Self {
            model,
            params: YoloParams {
                num_classes: COCO_CLASSES.len(),
                input_size: settings.input_size,
                prefilter_threshold: settings.prefilter_threshold,
                iou_threshold: settings.iou_threshold,
                max_detections: settings.max_detections,
            },
        })
    }

    fn build_input(&self, frame: &Frame) -> Result<Tensor> {
        let size = self.params.input_size;
        let resized = image::imageops::resize(&frame.to_rgb_image()?, size, size, FilterType::Triangle);

        let size = size as usize;
        let input = tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, channel, y, x)| {
            resized.get_pixel(x as u32, y as u32).0[channel] as f32 / 255.0
        });

        Ok(input.into_tensor())
    }
}

impl DetectorBackend for TractYoloBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        let input = self.build_input(frame)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        let data: Vec<f32> = view.iter().copied().collect();

        decode_predictions(&data, view.shape(), &self.params, frame.width, frame.height)
    }

    fn warm_up(&mut self) -> Result<()> {
        let size = self.params.input_size;
        let blank = Frame::new(vec![0u8; (size * size * 3) as usize], size, size)?;
        self.detect(&blank).map(|_| ())
    }
}
