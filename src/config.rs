use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
const DEFAULT_CAMERA_WIDTH: u32 = 1280;
const DEFAULT_CAMERA_HEIGHT: u32 = 720;
const DEFAULT_MODEL_BACKEND: &str = "tract";
const DEFAULT_MODEL_PATH: &str = "./yolov8l.onnx";
const DEFAULT_MODEL_INPUT_SIZE: u32 = 640;
const DEFAULT_IOU_THRESHOLD: f32 = 0.7;
const DEFAULT_PREFILTER_THRESHOLD: f32 = 0.25;
const DEFAULT_MAX_DETECTIONS: usize = 300;
const DEFAULT_WINDOW_TITLE: &str = "Object Detection App";

#[cfg(target_os = "macos")]
const DEFAULT_SPEECH_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
const DEFAULT_SPEECH_COMMAND: &str = "espeak-ng";

#[derive(Debug, Deserialize, Default)]
struct NarratorConfigFile {
    camera: Option<CameraConfigFile>,
    model: Option<ModelConfigFile>,
    speech: Option<SpeechConfigFile>,
    display: Option<DisplayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    backend: Option<String>,
    path: Option<PathBuf>,
    input_size: Option<u32>,
    iou_threshold: Option<f32>,
    prefilter_threshold: Option<f32>,
    max_detections: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct SpeechConfigFile {
    enabled: Option<bool>,
    command: Option<String>,
    args: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct DisplayConfigFile {
    title: Option<String>,
    font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct NarratorConfig {
    pub camera: CameraSettings,
    pub model: ModelSettings,
    pub speech: SpeechSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSettings {
    /// Device node, `stub://name`, or a still image path.
    pub device: String,
    /// Requested resolution; the device may negotiate another.
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: DEFAULT_CAMERA_DEVICE.to_string(),
            width: DEFAULT_CAMERA_WIDTH,
            height: DEFAULT_CAMERA_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    /// `tract` or `stub`.
    pub backend: String,
    pub path: PathBuf,
    pub input_size: u32,
    pub iou_threshold: f32,
    /// Scores below this never leave the model; the narration cutoff is fixed separately.
    pub prefilter_threshold: f32,
    pub max_detections: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: DEFAULT_MODEL_BACKEND.to_string(),
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            input_size: DEFAULT_MODEL_INPUT_SIZE,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            prefilter_threshold: DEFAULT_PREFILTER_THRESHOLD,
            max_detections: DEFAULT_MAX_DETECTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub command: String,
    /// Arguments placed before the utterance.
    pub args: Vec<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: DEFAULT_SPEECH_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub title: String,
    pub font_path: Option<PathBuf>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_WINDOW_TITLE.to_string(),
            font_path: None,
        }
    }
}

impl NarratorConfig {
    /// Load from `NARRATOR_CONFIG` (if set), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("NARRATOR_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Load from an explicit file (if any), then apply environment overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: NarratorConfigFile) -> Self {
        let defaults = Self::default();
        let camera = file.camera.unwrap_or_default();
        let model = file.model.unwrap_or_default();
        let speech = file.speech.unwrap_or_default();
        let display = file.display.unwrap_or_default();

        Self {
            camera: CameraSettings {
                device: camera.device.unwrap_or(defaults.camera.device),
                width: camera.width.unwrap_or(defaults.camera.width),
                height: camera.height.unwrap_or(defaults.camera.height),
            },
            model: ModelSettings {
                backend: model.backend.unwrap_or(defaults.model.backend),
                path: model.path.unwrap_or(defaults.model.path),
                input_size: model.input_size.unwrap_or(defaults.model.input_size),
                iou_threshold: model.iou_threshold.unwrap_or(defaults.model.iou_threshold),
                prefilter_threshold: model
                    .prefilter_threshold
                    .unwrap_or(defaults.model.prefilter_threshold),
                max_detections: model
                    .max_detections
                    .unwrap_or(defaults.model.max_detections),
            },
            speech: SpeechSettings {
                enabled: speech.enabled.unwrap_or(defaults.speech.enabled),
                command: speech.command.unwrap_or(defaults.speech.command),
                args: speech.args.unwrap_or(defaults.speech.args),
            },
            display: DisplaySettings {
                title: display.title.unwrap_or(defaults.display.title),
                font_path: display.font_path,
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(device) = non_empty_env("NARRATOR_CAMERA_DEVICE") {
            self.camera.device = device;
        }
        if let Some(backend) = non_empty_env("NARRATOR_MODEL_BACKEND") {
            self.model.backend = backend;
        }
        if let Some(path) = non_empty_env("NARRATOR_MODEL_PATH") {
            self.model.path = PathBuf::from(path);
        }
        if let Some(command) = non_empty_env("NARRATOR_SPEECH_COMMAND") {
            self.speech.command = command;
        }
        if let Some(enabled) = non_empty_env("NARRATOR_SPEECH_ENABLED") {
            self.speech.enabled = parse_bool(&enabled).ok_or_else(|| {
                anyhow!("NARRATOR_SPEECH_ENABLED must be one of true/false/1/0")
            })?;
        }
        if let Some(path) = non_empty_env("NARRATOR_FONT_PATH") {
            self.display.font_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn validate(&mut self) -> Result<()> {
        if self.camera.device.trim().is_empty() {
            return Err(anyhow!("camera device must not be empty"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera resolution must be positive"));
        }

        self.model.backend = self.model.backend.trim().to_lowercase();
        if !matches!(self.model.backend.as_str(), "tract" | "stub") {
            return Err(anyhow!(
                "unknown model backend '{}' (expected tract or stub)",
                self.model.backend
            ));
        }
        if self.model.input_size == 0 || self.model.input_size % 32 != 0 {
            return Err(anyhow!(
                "model input size must be a positive multiple of 32, got {}",
                self.model.input_size
            ));
        }
        if !(self.model.iou_threshold > 0.0 && self.model.iou_threshold <= 1.0) {
            return Err(anyhow!("iou threshold must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.model.prefilter_threshold) {
            return Err(anyhow!("prefilter threshold must be in [0, 1]"));
        }
        if self.model.max_detections == 0 {
            return Err(anyhow!("max detections must be greater than zero"));
        }

        if self.speech.enabled && self.speech.command.trim().is_empty() {
            return Err(anyhow!("speech command must not be empty when speech is enabled"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<NarratorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_desktop_setup() {
        let cfg = NarratorConfig::default();
        assert_eq!(cfg.camera.device, "/dev/video0");
        assert_eq!((cfg.camera.width, cfg.camera.height), (1280, 720));
        assert_eq!(cfg.model.path, PathBuf::from("./yolov8l.onnx"));
        assert_eq!(cfg.display.title, "Object Detection App");
        assert!(cfg.speech.enabled);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let file: NarratorConfigFile =
            serde_json::from_str(r#"{ "camera": { "width": 640 } }"#).unwrap();
        let cfg = NarratorConfig::from_file(file);
        assert_eq!(cfg.camera.width, 640);
        assert_eq!(cfg.camera.height, 720);
        assert_eq!(cfg.model.backend, "tract");
    }

    #[test]
    fn validate_rejects_bad_input_size() {
        let mut cfg = NarratorConfig::default();
        cfg.model.input_size = 100;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_normalizes_backend_name() {
        let mut cfg = NarratorConfig::default();
        cfg.model.backend = " Stub ".to_string();
        cfg.validate().unwrap();
        assert_eq!(cfg.model.backend, "stub");

        cfg.model.backend = "onnxruntime".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
