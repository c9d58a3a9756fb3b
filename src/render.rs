//! Render step: push one annotated frame and one log message to a display.

use anyhow::Result;
use image::RgbImage;

/// Something that can show a frame next to a text log.
///
/// `present` replaces both the canvas and the log contents and redraws
/// immediately; it must not return before the frame is on screen.
pub trait RenderSurface {
    fn present(&mut self, frame: &RgbImage, log_text: &str) -> Result<()>;

    /// Replace only the log text (used for error messages between ticks).
    fn show_message(&mut self, log_text: &str) -> Result<()>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn present(&mut self, frame: &RgbImage, log_text: &str) -> Result<()> {
        (**self).present(frame, log_text)
    }

    fn show_message(&mut self, log_text: &str) -> Result<()> {
        (**self).show_message(log_text)
    }
}

/// Log panel contents for one tick.
pub fn format_log(labels: &[String], fps: f64) -> String {
    let mut text = String::new();
    if !labels.is_empty() {
        text.push_str(&format!("Detected Objects: {}\n", labels.join(", ")));
    }
    text.push_str(&format!("FPS: {:.2}\n", fps));
    text
}

/// Pack RGB pixels into `0RGB` words, the layout framebuffer windows expect.
pub fn rgb_to_0rgb(image: &RgbImage) -> Vec<u32> {
    image
        .pixels()
        .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
        .collect()
}

/// Surface that keeps the last frame and log in memory.
#[derive(Default)]
pub struct MemorySurface {
    pub frame: Option<RgbImage>,
    pub log_text: String,
    pub presents: u64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSurface for MemorySurface {
    fn present(&mut self, frame: &RgbImage, log_text: &str) -> Result<()> {
        self.frame = Some(frame.clone());
        self.log_text = log_text.to_string();
        self.presents += 1;
        Ok(())
    }

    fn show_message(&mut self, log_text: &str) -> Result<()> {
        self.log_text = log_text.to_string();
        Ok(())
    }
}

/// Headless surface: writes each tick's log to the `log` facade.
#[derive(Default)]
pub struct ConsoleSurface {
    last_log: String,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSurface for ConsoleSurface {
    fn present(&mut self, frame: &RgbImage, log_text: &str) -> Result<()> {
        log::info!(
            "frame {}x{} | {}",
            frame.width(),
            frame.height(),
            log_text.trim_end().replace('\n', " | ")
        );
        self.last_log = log_text.to_string();
        Ok(())
    }

    fn show_message(&mut self, log_text: &str) -> Result<()> {
        log::warn!("{}", log_text.trim_end());
        self.last_log = log_text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lists_labels_then_fps() {
        let labels = vec!["person ".to_string()];
        assert_eq!(
            format_log(&labels, 12.3456),
            "Detected Objects: person \nFPS: 12.35\n"
        );
    }

    #[test]
    fn log_without_labels_has_only_fps() {
        assert_eq!(format_log(&[], 9.0), "FPS: 9.00\n");
    }

    #[test]
    fn infinite_fps_is_printed() {
        assert_eq!(format_log(&[], f64::INFINITY), "FPS: inf\n");
    }

    #[test]
    fn pixels_pack_into_0rgb() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgb([0x12, 0x34, 0x56]));
        image.put_pixel(1, 0, image::Rgb([255, 0, 255]));
        assert_eq!(rgb_to_0rgb(&image), vec![0x0012_3456, 0x00ff_00ff]);
    }

    #[test]
    fn memory_surface_replaces_previous_log() -> Result<()> {
        let mut surface = MemorySurface::new();
        let frame = RgbImage::new(4, 4);
        surface.present(&frame, "FPS: 1.00\n")?;
        surface.present(&frame, "FPS: 2.00\n")?;
        assert_eq!(surface.log_text, "FPS: 2.00\n");
        assert_eq!(surface.presents, 2);
        Ok(())
    }
}
