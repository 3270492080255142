//! Encoding the finished pixel buffer to disk.

use crate::error::{RenderError, Result};
use image::ColorType;
use std::path::Path;
use std::time::Instant;

/// Write an 8-bit image; the format follows the file extension.
///
/// `channels` must be 4 (RGBA) or 3 (RGB) and `bytes` must hold exactly
/// `width * height * channels` bytes, rows top to bottom.
pub fn write_image(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    channels: u8,
    bytes: &[u8],
) -> Result<()> {
    let path = path.as_ref();
    let color = match channels {
        4 => ColorType::Rgba8,
        3 => ColorType::Rgb8,
        other => return Err(RenderError::UnsupportedChannels(other)),
    };

    let expected = width as usize * height as usize * channels as usize;
    if bytes.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: bytes.len(),
        });
    }

    let start = Instant::now();
    image::save_buffer(path, bytes, width, height, color)?;
    log::info!(
        "Wrote {}x{} image to {} in {:.2?}",
        width,
        height,
        path.display(),
        start.elapsed()
    );
    Ok(())
}
