use ab_glyph::{FontVec, PxScale};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::sync::Arc;

use super::layout::{Layout, Region};

const BACKGROUND: Rgb<u8> = Rgb([236, 236, 236]);
const CANVAS_BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const LOG_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BORDER: Rgb<u8> = Rgb([160, 160, 160]);
const TEXT: Rgb<u8> = Rgb([20, 20, 20]);
const START_FILL: Rgb<u8> = Rgb([200, 230, 200]);
const STOP_FILL: Rgb<u8> = Rgb([240, 200, 200]);

const LOG_FONT_PX: f32 = 18.0;
const BUTTON_FONT_PX: f32 = 20.0;
const LOG_INSET: i32 = 6;

/// Paints the whole window into one RGB image.
pub struct Composer {
    font: Option<Arc<FontVec>>,
}

impl Composer {
    pub fn new(font: Option<Arc<FontVec>>) -> Self {
        Self { font }
    }

    pub fn compose(&self, layout: &Layout, frame: Option<&RgbImage>, log_text: &str) -> RgbImage {
        let mut image = RgbImage::from_pixel(layout.width, layout.height, BACKGROUND);

        fill(&mut image, layout.canvas, CANVAS_BACKGROUND);
        if let Some(frame) = frame {
            imageops::replace(
                &mut image,
                frame,
                i64::from(layout.canvas.x),
                i64::from(layout.canvas.y),
            );
        }

        fill(&mut image, layout.log, LOG_BACKGROUND);
        outline(&mut image, layout.log);
        self.draw_log(&mut image, layout.log, log_text);

        self.draw_button(&mut image, layout.start_button, "Start", START_FILL);
        self.draw_button(&mut image, layout.stop_button, "Stop", STOP_FILL);
        image
    }

    /// Wrapped log lines; when they overflow the panel only the newest ones are shown.
    fn draw_log(&self, image: &mut RgbImage, region: Region, text: &str) {
        let Some(font) = self.font.as_deref() else {
            return;
        };
        let scale = PxScale::from(LOG_FONT_PX);
        let max_width = region.width.saturating_sub(2 * LOG_INSET as u32);
        let lines = wrap_lines(text, max_width, |s| text_size(scale, font, s).0);

        let line_height = (LOG_FONT_PX * 1.25) as i32;
        let visible = ((region.height as i32 - 2 * LOG_INSET) / line_height).max(1) as usize;
        let start = lines.len().saturating_sub(visible);
        for (row, line) in lines[start..].iter().enumerate() {
            let y = region.y as i32 + LOG_INSET + row as i32 * line_height;
            draw_text_mut(image, TEXT, region.x as i32 + LOG_INSET, y, scale, font, line);
        }
    }

    fn draw_button(&self, image: &mut RgbImage, region: Region, label: &str, color: Rgb<u8>) {
        fill(image, region, color);
        outline(image, region);
        if let Some(font) = self.font.as_deref() {
            let scale = PxScale::from(BUTTON_FONT_PX);
            let (w, h) = text_size(scale, font, label);
            let x = region.x as i32 + (region.width as i32 - w as i32) / 2;
            let y = region.y as i32 + (region.height as i32 - h as i32) / 2;
            draw_text_mut(image, TEXT, x, y, scale, font, label);
        }
    }
}

fn fill(image: &mut RgbImage, region: Region, color: Rgb<u8>) {
    draw_filled_rect_mut(image, rect(region), color);
}

fn outline(image: &mut RgbImage, region: Region) {
    draw_hollow_rect_mut(image, rect(region), BORDER);
}

fn rect(region: Region) -> Rect {
    Rect::at(region.x as i32, region.y as i32).of_size(region.width.max(1), region.height.max(1))
}

/// Greedy word wrap. Words wider than the panel get a line of their own.
fn wrap_lines(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if current.is_empty() || measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_width(s: &str) -> u32 {
        s.chars().count() as u32 * 10
    }

    #[test]
    fn wrap_keeps_short_lines_intact() {
        let lines = wrap_lines("Detected Objects: cup \nFPS: 3.00\n", 1000, char_width);
        assert_eq!(lines, vec!["Detected Objects: cup ", "FPS: 3.00"]);
    }

    #[test]
    fn wrap_breaks_on_spaces() {
        let lines = wrap_lines("aaa bbb ccc", 70, char_width);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn compose_places_frame_at_canvas_origin() {
        let layout = Layout::for_frame(8, 6);
        let frame = RgbImage::from_pixel(8, 6, Rgb([1, 2, 3]));
        let composer = Composer::new(None);

        let image = composer.compose(&layout, Some(&frame), "FPS: 1.00\n");
        assert_eq!(image.dimensions(), (layout.width, layout.height));
        assert_eq!(*image.get_pixel(layout.canvas.x, layout.canvas.y), Rgb([1, 2, 3]));
        assert_eq!(
            *image.get_pixel(layout.canvas.x + 7, layout.canvas.y + 5),
            Rgb([1, 2, 3])
        );
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn compose_without_frame_shows_blank_canvas_and_buttons() {
        let layout = Layout::for_frame(320, 240);
        let image = Composer::new(None).compose(&layout, None, "");
        assert_eq!(*image.get_pixel(layout.canvas.x + 5, layout.canvas.y + 5), CANVAS_BACKGROUND);
        let start = layout.start_button;
        assert_eq!(*image.get_pixel(start.x + 5, start.y + 5), START_FILL);
        let stop = layout.stop_button;
        assert_eq!(*image.get_pixel(stop.x + 5, stop.y + 5), STOP_FILL);
    }
}
