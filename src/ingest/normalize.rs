use anyhow::{anyhow, Context, Result};

/// Pixel encodings a capture device may negotiate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
    Bgr24,
    Yuyv,
    Nv12,
    Mjpeg,
}

impl PixelFormat {
    /// Map a V4L2 fourcc to a supported format.
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        match fourcc {
            b"RGB3" => Some(Self::Rgb24),
            b"BGR3" => Some(Self::Bgr24),
            b"YUYV" => Some(Self::Yuyv),
            b"NV12" => Some(Self::Nv12),
            b"MJPG" => Some(Self::Mjpeg),
            _ => None,
        }
    }
}

/// Convert a captured buffer into packed RGB24.
pub fn normalize_to_rgb(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<Vec<u8>> {
    match format {
        PixelFormat::Rgb24 => {
            check_len(pixels, packed_len(width, height, 3)?, "RGB")?;
            Ok(pixels.to_vec())
        }
        PixelFormat::Bgr24 => {
            check_len(pixels, packed_len(width, height, 3)?, "BGR")?;
            Ok(pixels
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect())
        }
        PixelFormat::Yuyv => yuyv_to_rgb(pixels, width, height),
        PixelFormat::Nv12 => nv12_to_rgb(pixels, width, height),
        PixelFormat::Mjpeg => mjpeg_to_rgb(pixels, width, height),
    }
}

fn packed_len(width: u32, height: u32, bytes_per_pixel: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(bytes_per_pixel))
        .ok_or_else(|| anyhow!("frame dimensions overflow"))
}

fn check_len(pixels: &[u8], expected: usize, label: &str) -> Result<()> {
    if pixels.len() != expected {
        return Err(anyhow!(
            "{} frame length mismatch: expected {}, got {}",
            label,
            expected,
            pixels.len()
        ));
    }
    Ok(())
}

fn yuyv_to_rgb(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    check_len(pixels, packed_len(width, height, 2)?, "YUYV")?;
    if width % 2 != 0 {
        return Err(anyhow!("YUYV frames require an even width, got {}", width));
    }

    let mut rgb = Vec::with_capacity(packed_len(width, height, 3)?);
    for chunk in pixels.chunks_exact(4) {
        let u = chunk[1] as f32 - 128.0;
        let v = chunk[3] as f32 - 128.0;
        for y in [chunk[0], chunk[2]] {
            rgb.extend_from_slice(&yuv_to_rgb(y as f32, u, v));
        }
    }
    Ok(rgb)
}

fn nv12_to_rgb(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    if width % 2 != 0 || height % 2 != 0 {
        return Err(anyhow!(
            "NV12 frames require even dimensions, got {}x{}",
            width,
            height
        ));
    }
    let w = width as usize;
    let h = height as usize;
    let y_plane = packed_len(width, height, 1)?;
    let expected = y_plane
        .checked_add(y_plane / 2)
        .ok_or_else(|| anyhow!("NV12 frame dimensions overflow"))?;
    check_len(pixels, expected, "NV12")?;

    let mut rgb = vec![0u8; y_plane * 3];
    for j in 0..h {
        for i in 0..w {
            let y = pixels[j * w + i] as f32;
            let uv_index = y_plane + (j / 2) * w + (i / 2) * 2;
            let u = pixels[uv_index] as f32 - 128.0;
            let v = pixels[uv_index + 1] as f32 - 128.0;

            let offset = (j * w + i) * 3;
            rgb[offset..offset + 3].copy_from_slice(&yuv_to_rgb(y, u, v));
        }
    }

    Ok(rgb)
}

fn mjpeg_to_rgb(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory_with_format(pixels, image::ImageFormat::Jpeg)
        .context("decode MJPEG frame")?
        .to_rgb8();
    if decoded.dimensions() != (width, height) {
        return Err(anyhow!(
            "MJPEG frame is {}x{}, device negotiated {}x{}",
            decoded.width(),
            decoded.height(),
            width,
            height
        ));
    }
    Ok(decoded.into_raw())
}

fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
    let r = y + 1.402_f32 * v;
    let g = y - 0.344_136_f32 * u - 0.714_136_f32 * v;
    let b = y + 1.772_f32 * u;
    [clamp_to_u8(r), clamp_to_u8(g), clamp_to_u8(b)]
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
