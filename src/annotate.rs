//! Frame annotations: corner-style boxes and label tags.

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::detect::PixelCorners;

pub const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
pub const CORNER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const CORNER_LENGTH: i32 = 30;
const CORNER_THICKNESS: i32 = 5;
const TAG_PADDING: i32 = 10;
const TAG_FONT_PX: f32 = 24.0;
/// Tag anchors never sit above this row so the text stays on the canvas.
pub const MIN_TAG_Y: i32 = 35;

const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the configured font, or the first system font found.
///
/// Returns `Ok(None)` when no path was configured and no system font exists.
pub fn load_font(configured: Option<&Path>) -> Result<Option<FontVec>> {
    if let Some(path) = configured {
        return read_font(path).map(Some);
    }
    for candidate in FONT_CANDIDATES.iter().map(PathBuf::from) {
        if candidate.is_file() {
            match read_font(&candidate) {
                Ok(font) => return Ok(Some(font)),
                Err(err) => log::warn!("skipping font {}: {:#}", candidate.display(), err),
            }
        }
    }
    Ok(None)
}

fn read_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path).with_context(|| format!("read font {}", path.display()))?;
    FontVec::try_from_vec(bytes).with_context(|| format!("parse font {}", path.display()))
}

/// Draws detection overlays onto frames.
pub struct Annotator {
    font: Option<Arc<FontVec>>,
    scale: PxScale,
    warned_missing_font: bool,
}

impl Annotator {
    pub fn new(font: Option<Arc<FontVec>>) -> Self {
        Self {
            font,
            scale: PxScale::from(TAG_FONT_PX),
            warned_missing_font: false,
        }
    }

    /// Draw one retained detection: corner box plus `"{name} {confidence}"` tag.
    pub fn annotate(
        &mut self,
        image: &mut RgbImage,
        corners: PixelCorners,
        name: &str,
        confidence: f64,
    ) {
        draw_corner_rect(image, corners);
        let anchor = tag_anchor(corners);
        self.put_text_rect(image, &tag_text(name, confidence), anchor);
    }

    fn put_text_rect(&mut self, image: &mut RgbImage, text: &str, (x, y): (i32, i32)) {
        let (text_w, text_h) = match self.font.as_deref() {
            Some(font) => text_size(self.scale, font, text),
            None => {
                if !self.warned_missing_font {
                    log::warn!("no font available; label tags are drawn without text");
                    self.warned_missing_font = true;
                }
                ((text.len() as f32 * TAG_FONT_PX * 0.5) as u32, TAG_FONT_PX as u32)
            }
        };

        // (x, y) is the text baseline-left corner; the tag grows upward from it.
        let top = y - text_h as i32 - TAG_PADDING;
        let rect = Rect::at(x - TAG_PADDING, top)
            .of_size(text_w + 2 * TAG_PADDING as u32, text_h + 2 * TAG_PADDING as u32);
        draw_filled_rect_mut(image, rect, BOX_COLOR);

        if let Some(font) = self.font.as_deref() {
            draw_text_mut(image, TEXT_COLOR, x, y - text_h as i32, self.scale, font, text);
        }
    }
}

/// Tag text. The rounded confidence is printed in its shortest form
/// (`0.8`, `0.95`, `1.0`).
pub fn tag_text(name: &str, confidence: f64) -> String {
    format!("{} {}", name, shortest_decimal(confidence))
}

fn shortest_decimal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Tag position: box top-left, clamped to `x >= 0` and `y >= 35`.
pub fn tag_anchor(corners: PixelCorners) -> (i32, i32) {
    (corners.x1.max(0), corners.y1.max(MIN_TAG_Y))
}

/// Thin outline plus thick corner strokes.
pub fn draw_corner_rect(image: &mut RgbImage, corners: PixelCorners) {
    let w = corners.width().max(1);
    let h = corners.height().max(1);
    draw_hollow_rect_mut(
        image,
        Rect::at(corners.x1, corners.y1).of_size(w as u32, h as u32),
        BOX_COLOR,
    );

    let len_x = CORNER_LENGTH.min((w / 2).max(1));
    let len_y = CORNER_LENGTH.min((h / 2).max(1));
    let t = CORNER_THICKNESS;
    let (x1, y1, x2, y2) = (corners.x1, corners.y1, corners.x2, corners.y2);

    let strokes = [
        // top-left
        (x1, y1, len_x, t),
        (x1, y1, t, len_y),
        // top-right
        (x2 - len_x, y1, len_x, t),
        (x2 - t, y1, t, len_y),
        // bottom-left
        (x1, y2 - t, len_x, t),
        (x1, y2 - len_y, t, len_y),
        // bottom-right
        (x2 - len_x, y2 - t, len_x, t),
        (x2 - t, y2 - len_y, t, len_y),
    ];
    for (x, y, sw, sh) in strokes {
        draw_filled_rect_mut(
            image,
            Rect::at(x, y).of_size(sw.max(1) as u32, sh.max(1) as u32),
            CORNER_COLOR,
        );
    }
}
