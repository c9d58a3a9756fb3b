use ab_glyph::FontVec;
use anyhow::{Context, Result};
use image::RgbImage;
use std::sync::Arc;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use super::compose::Composer;
use super::layout::Layout;
use super::UiAction;
use crate::render::{rgb_to_0rgb, RenderSurface};

const EVENT_RATE_FPS: usize = 240;

/// `minifb` window hosting the canvas, the log panel and the two buttons.
pub struct WindowSurface {
    window: Window,
    title: String,
    layout: Layout,
    composer: Composer,
    buffer: Vec<u32>,
    last_frame: Option<RgbImage>,
    last_log: String,
    mouse_was_down: bool,
}

impl WindowSurface {
    /// Open the window sized for the expected frame resolution.
    pub fn open(title: &str, frame_width: u32, frame_height: u32, font: Option<Arc<FontVec>>) -> Result<Self> {
        let layout = Layout::for_frame(frame_width, frame_height);
        let window = open_window(title, &layout)?;
        let mut surface = Self {
            window,
            title: title.to_string(),
            layout,
            composer: Composer::new(font),
            buffer: Vec::new(),
            last_frame: None,
            last_log: "Press Start to begin detection.\n".to_string(),
            mouse_was_down: false,
        };
        surface.redraw()?;
        Ok(surface)
    }

    /// Window still open and Escape not pressed.
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Pump window events and collect button presses.
    pub fn poll(&mut self) -> Result<Vec<UiAction>> {
        self.window
            .update_with_buffer(&self.buffer, self.layout.width as usize, self.layout.height as usize)
            .context("refresh window")?;

        let mut actions = Vec::new();
        let mouse_down = self.window.get_mouse_down(MouseButton::Left);
        if mouse_down && !self.mouse_was_down {
            if let Some((x, y)) = self.window.get_mouse_pos(MouseMode::Discard) {
                actions.extend(self.layout.hit_test(x, y));
            }
        }
        self.mouse_was_down = mouse_down;

        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            match key {
                Key::S => actions.push(UiAction::Start),
                Key::X => actions.push(UiAction::Stop),
                _ => {}
            }
        }
        Ok(actions)
    }

    fn redraw(&mut self) -> Result<()> {
        let image = self
            .composer
            .compose(&self.layout, self.last_frame.as_ref(), &self.last_log);
        self.buffer = rgb_to_0rgb(&image);
        self.window
            .update_with_buffer(&self.buffer, self.layout.width as usize, self.layout.height as usize)
            .context("draw window")
    }
}

impl RenderSurface for WindowSurface {
    fn present(&mut self, frame: &RgbImage, log_text: &str) -> Result<()> {
        let layout = Layout::for_frame(frame.width(), frame.height());
        if layout != self.layout {
            log::info!(
                "resizing canvas to {}x{}",
                frame.width(),
                frame.height()
            );
            self.window = open_window(&self.title, &layout)?;
            self.layout = layout;
        }
        self.last_frame = Some(frame.clone());
        self.last_log = log_text.to_string();
        self.redraw()
    }

    fn show_message(&mut self, log_text: &str) -> Result<()> {
        self.last_log = log_text.to_string();
        self.redraw()
    }
}

fn open_window(title: &str, layout: &Layout) -> Result<Window> {
    let mut window = Window::new(
        title,
        layout.width as usize,
        layout.height as usize,
        WindowOptions::default(),
    )
    .with_context(|| format!("open {}x{} window", layout.width, layout.height))?;
    window.set_target_fps(EVENT_RATE_FPS);
    Ok(window)
}
