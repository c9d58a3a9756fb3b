//! object_narrator - live webcam object detection with spoken narration
//!
//! Opens the camera and the detection model, then either shows the desktop
//! window (Start / Stop buttons, canvas, log) or, with `--headless`, runs the
//! same loop with the log written to stderr.
//!
//! The webcam, the model and the window come from the `ingest-v4l2`,
//! `backend-tract` and `gui` features. Without them only
//! `--headless --device stub://cam --backend stub` (or a still image) works.

use ab_glyph::FontVec;
use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use object_narrator::ingest::device_for_index;
use object_narrator::ui::{StartupUi, UiMode};
use object_narrator::{
    load_font, open_backend, open_narrator, open_source, Annotator, ConsoleSurface,
    DetectionLoop, NarratorApp, NarratorConfig, TickOutcome,
};

const IDLE_SLEEP: Duration = Duration::from_millis(2);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file (JSON, or TOML with a .toml extension).
    #[arg(long, env = "NARRATOR_CONFIG")]
    config: Option<PathBuf>,
    /// Camera device node, `stub://name`, or a still image path.
    #[arg(long)]
    device: Option<String>,
    /// Camera index (0 -> /dev/video0).
    #[arg(long, conflicts_with = "device")]
    camera_index: Option<u32>,
    /// ONNX model path.
    #[arg(long)]
    model: Option<PathBuf>,
    /// Detector backend (tract|stub).
    #[arg(long)]
    backend: Option<String>,
    /// Disable speech output.
    #[arg(long)]
    no_speech: bool,
    /// Run without a window, logging each tick.
    #[arg(long)]
    headless: bool,
    /// Stop after this many ticks (headless only).
    #[arg(long, requires = "headless")]
    ticks: Option<u64>,
    /// Start detecting immediately instead of waiting for Start.
    #[arg(long)]
    autostart: bool,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    let ui = StartupUi::new(UiMode::parse(Some(&args.ui)), std::io::stderr().is_terminal());

    let source = staged(&ui, "open camera", || {
        let mut source = open_source(&cfg.camera)?;
        source.connect()?;
        Ok(source)
    })?;
    let backend = staged(&ui, "load detection model", || {
        let mut backend = open_backend(&cfg.model)?;
        backend.warm_up()?;
        Ok(backend)
    })?;
    let font = load_font(cfg.display.font_path.as_deref())?.map(Arc::new);
    if font.is_none() {
        log::warn!("no TrueType font found; set NARRATOR_FONT_PATH to draw text");
    }

    let pipeline = DetectionLoop::new(
        source,
        backend,
        open_narrator(&cfg.speech),
        Annotator::new(font.clone()),
        Instant::now(),
    );
    let app = NarratorApp::new(pipeline);

    log::info!(
        "camera={} model={} backend={} speech={}",
        cfg.camera.device,
        cfg.model.path.display(),
        cfg.model.backend,
        if cfg.speech.enabled { cfg.speech.command.as_str() } else { "off" }
    );

    if args.headless {
        run_headless(app, args.ticks)
    } else {
        run_window(app, &cfg, font, args.autostart)
    }
}

fn load_config(args: &Args) -> Result<NarratorConfig> {
    let mut cfg = NarratorConfig::load_from(args.config.as_deref())?;
    if let Some(device) = &args.device {
        cfg.camera.device = device.clone();
    }
    if let Some(index) = args.camera_index {
        cfg.camera.device = device_for_index(index);
    }
    if let Some(model) = &args.model {
        cfg.model.path = model.clone();
    }
    if let Some(backend) = &args.backend {
        cfg.model.backend = backend.clone();
    }
    if args.no_speech {
        cfg.speech.enabled = false;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn staged<T>(ui: &StartupUi, name: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let stage = ui.stage(name);
    match f() {
        Ok(value) => Ok(value),
        Err(err) => {
            stage.fail();
            Err(err)
        }
    }
}

fn run_headless(mut app: NarratorApp, max_ticks: Option<u64>) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))?;
    }

    let mut surface = ConsoleSurface::new();
    let mut ticks = 0u64;
    let mut count = |outcome: TickOutcome| {
        if matches!(outcome, TickOutcome::Ran(_)) {
            ticks += 1;
        }
        ticks
    };

    let mut done = count(app.start(Instant::now(), &mut surface));
    while app.is_running() && !interrupted.load(Ordering::SeqCst) {
        if max_ticks.is_some_and(|max| done >= max) {
            break;
        }
        let wait = app.time_until_due(Instant::now()).unwrap_or(IDLE_SLEEP);
        std::thread::sleep(wait);
        done = count(app.pump(Instant::now(), &mut surface));
    }

    let failure = app.last_error().map(str::to_string);
    app.shutdown();
    log::info!("headless run finished after {} ticks", done);
    match failure {
        Some(message) => Err(anyhow!("detection halted: {}", message)),
        None => Ok(()),
    }
}

#[cfg(feature = "gui")]
fn run_window(
    mut app: NarratorApp,
    cfg: &NarratorConfig,
    font: Option<Arc<FontVec>>,
    autostart: bool,
) -> Result<()> {
    use object_narrator::gui::{UiAction, WindowSurface};

    let mut surface = WindowSurface::open(
        &cfg.display.title,
        cfg.camera.width,
        cfg.camera.height,
        font,
    )?;

    if autostart {
        app.start(Instant::now(), &mut surface);
    }

    while surface.is_open() {
        for action in surface.poll()? {
            match action {
                UiAction::Start => {
                    app.start(Instant::now(), &mut surface);
                }
                UiAction::Stop => {
                    app.stop();
                }
            }
        }
        app.pump(Instant::now(), &mut surface);
    }

    app.shutdown();
    log::info!("window closed, camera released");
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_window(
    _app: NarratorApp,
    _cfg: &NarratorConfig,
    _font: Option<Arc<FontVec>>,
    _autostart: bool,
) -> Result<()> {
    Err(anyhow!(
        "built without the gui feature; rebuild with --features gui or pass --headless"
    ))
}
