// SPDX-License-Identifier: MPL-2.0
//! Still-frame export for captured shots.
//!
//! Shots are downloaded as lossless PNG files named after their gallery
//! position and capture time.

use crate::error::{Error, Result};
use crate::media::Bitmap;
use image_rs::ImageFormat;
use std::path::Path;

/// Download name for the gallery shot at `index` captured at `time_secs`.
///
/// Format: `screenshot_{index+1}_{time:.2}s.png`
#[must_use]
pub fn screenshot_filename(index: usize, time_secs: f64) -> String {
    format!("screenshot_{}_{:.2}s.png", index + 1, time_secs.max(0.0))
}

/// Writes a bitmap to disk as PNG, whatever the path's extension.
///
/// # Errors
///
/// Returns an error if the image cannot be encoded or written to disk.
pub fn save_png<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> Result<()> {
    let path = path.as_ref();
    bitmap
        .to_rgba_image()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| Error::Io(format!("Failed to save frame: {e}")))?;

    tracing::debug!(path = %path.display(), "saved frame");
    Ok(())
}
