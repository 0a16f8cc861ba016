// SPDX-License-Identifier: MPL-2.0
//! Immutable RGBA raster shared between the sampler, editor, gallery and encoder.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image_rs::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;

/// A raster image as a flat RGBA8 buffer, row-major, top-left origin.
///
/// Pixel data sits behind an `Arc` so gallery clones and frame hand-offs
/// are cheap. Edits always produce a new bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wraps an owned RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or the buffer length is
    /// not `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        Self::from_shared(width, height, Arc::new(rgba))
    }

    /// Wraps an already shared RGBA buffer without copying it.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Bitmap::from_rgba`].
    pub fn from_shared(width: u32, height: u32, rgba: Arc<Vec<u8>>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(Error::Io(format!(
                "Bitmap buffer holds {} bytes, expected {expected} for {width}x{height}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Takes ownership of an `image` crate buffer.
    #[must_use]
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            rgba: Arc::new(image.into_raw()),
        }
    }

    /// Converts any decoded image to RGBA8.
    #[must_use]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::from_rgba_image(image.to_rgba8())
    }

    /// Decodes an encoded still image (PNG, GIF first frame, WebP).
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a supported image.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image_rs::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(&image))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// Shared handle to the RGBA bytes.
    #[must_use]
    pub fn shared_pixels(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.rgba)
    }

    /// Returns the pixel at (x, y), or `None` outside the bitmap.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copies the pixels into an `image` crate buffer.
    #[must_use]
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, (*self.rgba).clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Encodes the bitmap as a lossless PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.to_rgba_image()
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| Error::Io(format!("Failed to encode PNG: {e}")))?;
        Ok(out.into_inner())
    }

    /// Encodes the bitmap as a `data:image/png;base64,...` URL for display.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_data_url(&self) -> Result<String> {
        let png = self.encode_png()?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
    }
}
