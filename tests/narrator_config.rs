use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::{Builder, NamedTempFile};

use object_narrator::config::NarratorConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "NARRATOR_CONFIG",
        "NARRATOR_CAMERA_DEVICE",
        "NARRATOR_MODEL_PATH",
        "NARRATOR_MODEL_BACKEND",
        "NARRATOR_SPEECH_COMMAND",
        "NARRATOR_SPEECH_ENABLED",
        "NARRATOR_FONT_PATH",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_json_config_and_applies_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "camera": { "device": "/dev/video2", "width": 640, "height": 480 },
        "model": { "backend": "stub", "path": "models/yolov8n.onnx", "iou_threshold": 0.5 },
        "speech": { "command": "espeak", "args": ["-s", "160"] },
        "display": { "title": "Front Desk" }
    }"#;
    file.write_all(json.as_bytes()).expect("write config");

    std::env::set_var("NARRATOR_CONFIG", file.path());
    std::env::set_var("NARRATOR_CAMERA_DEVICE", "stub://desk");
    std::env::set_var("NARRATOR_SPEECH_ENABLED", "false");

    let cfg = NarratorConfig::load().expect("load config");

    assert_eq!(cfg.camera.device, "stub://desk");
    assert_eq!((cfg.camera.width, cfg.camera.height), (640, 480));
    assert_eq!(cfg.model.backend, "stub");
    assert_eq!(cfg.model.path, PathBuf::from("models/yolov8n.onnx"));
    assert_eq!(cfg.model.iou_threshold, 0.5);
    assert_eq!(cfg.model.input_size, 640);
    assert!(!cfg.speech.enabled);
    assert_eq!(cfg.speech.command, "espeak");
    assert_eq!(cfg.speech.args, vec!["-s", "160"]);
    assert_eq!(cfg.display.title, "Front Desk");

    clear_env();
}

#[test]
fn loads_toml_config_by_extension() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = Builder::new().suffix(".toml").tempfile().expect("temp config");
    let toml = r#"
        [camera]
        device = "stub://lab"

        [model]
        backend = "STUB"
        max_detections = 50

        [display]
        font_path = "/usr/share/fonts/TTF/DejaVuSans.ttf"
    "#;
    file.write_all(toml.as_bytes()).expect("write config");

    let cfg = NarratorConfig::load_from(Some(file.path())).expect("load config");

    assert_eq!(cfg.camera.device, "stub://lab");
    assert_eq!(cfg.model.backend, "stub");
    assert_eq!(cfg.model.max_detections, 50);
    assert_eq!(
        cfg.display.font_path,
        Some(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"))
    );
    assert_eq!(cfg.display.title, "Object Detection App");
}

#[test]
fn env_only_configuration_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("NARRATOR_MODEL_PATH", "/opt/models/yolov8l.onnx");
    std::env::set_var("NARRATOR_SPEECH_COMMAND", "say");
    std::env::set_var("NARRATOR_FONT_PATH", "/tmp/font.ttf");

    let cfg = NarratorConfig::load().expect("load config");

    assert_eq!(cfg.camera.device, "/dev/video0");
    assert_eq!(cfg.model.path, PathBuf::from("/opt/models/yolov8l.onnx"));
    assert_eq!(cfg.speech.command, "say");
    assert_eq!(cfg.display.font_path, Some(PathBuf::from("/tmp/font.ttf")));
    assert_eq!(cfg.display.title, "Object Detection App");

    clear_env();
}

#[test]
fn rejects_malformed_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("NARRATOR_SPEECH_ENABLED", "perhaps");
    let err = NarratorConfig::load().unwrap_err();
    assert!(err.to_string().contains("NARRATOR_SPEECH_ENABLED"));
    clear_env();

    std::env::set_var("NARRATOR_MODEL_BACKEND", "opencv");
    let err = NarratorConfig::load().unwrap_err();
    assert!(err.to_string().contains("unknown model backend"));
    clear_env();
}

#[test]
fn reports_unreadable_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.json");
    let err = NarratorConfig::load_from(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));

    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(b"{ not json").expect("write config");
    let err = NarratorConfig::load_from(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("invalid config file"));
}
