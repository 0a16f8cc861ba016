// SPDX-License-Identifier: MPL-2.0
//! Animated GIF serialization.
//!
//! Every frame is a full replacement of the canvas (disposal `Background`),
//! shares one delay, and is indexed against the palette written with it.

use super::quantize::{IndexedFrame, Palette};
use crate::config::defaults::{DEFAULT_QUANTIZER_SAMPLE_FACTOR, MIN_FRAME_DELAY_MS};
use crate::domain::video::{Fps, PalettePolicy};
use crate::error::{Error, Result};
use crate::media::Bitmap;
use gif::{DisposalMethod, Encoder, Frame, Repeat};
use std::borrow::Cow;

// =============================================================================
// FrameDelay
// =============================================================================

/// Display time of each frame.
///
/// GIF stores delays in hundredths of a second, so the written delay is the
/// requested milliseconds rounded to the nearest centisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDelay {
    millis: u32,
}

impl FrameDelay {
    /// `round(1000 / fps)` milliseconds, floored at the minimum delay.
    #[must_use]
    pub fn from_fps(fps: Fps) -> Self {
        let millis = (1000 + fps.value() / 2) / fps.value();
        Self::from_millis(millis)
    }

    #[must_use]
    pub fn from_millis(millis: u32) -> Self {
        Self {
            millis: millis.max(MIN_FRAME_DELAY_MS),
        }
    }

    #[must_use]
    pub fn millis(self) -> u32 {
        self.millis
    }

    /// Delay as written to the file. Never zero.
    #[must_use]
    pub fn centiseconds(self) -> u16 {
        let cs = (self.millis + 5) / 10;
        u16::try_from(cs).unwrap_or(u16::MAX).max(1)
    }
}

impl Default for FrameDelay {
    fn default() -> Self {
        Self::from_fps(Fps::default())
    }
}

// =============================================================================
// Options & Output
// =============================================================================

/// Encoder settings for one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifOptions {
    pub delay: FrameDelay,
    /// Repeat forever; otherwise play once.
    pub looping: bool,
    pub palette: PalettePolicy,
    /// NeuQuant sampling factor (1 = best, 30 = fastest).
    pub sample_factor: i32,
}

impl GifOptions {
    #[must_use]
    pub fn new(delay: FrameDelay, looping: bool) -> Self {
        Self {
            delay,
            looping,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: PalettePolicy) -> Self {
        self.palette = palette;
        self
    }
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            delay: FrameDelay::default(),
            looping: true,
            palette: PalettePolicy::default(),
            sample_factor: DEFAULT_QUANTIZER_SAMPLE_FACTOR,
        }
    }
}

/// A finished GIF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedGif {
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub delay_ms: u32,
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes `frames` into an animated GIF in one pass.
///
/// # Errors
///
/// Returns [`Error::NoFramesSelected`] for an empty slice and
/// [`Error::EncodeFailure`] when frame sizes differ, exceed 65535 pixels, or
/// the container cannot be written.
#[tracing::instrument(level = "debug", skip_all, fields(frames = frames.len()))]
pub fn encode(frames: &[Bitmap], options: &GifOptions) -> Result<EncodedGif> {
    let mut writer = GifWriter::begin(frames, options)?;
    for frame in frames {
        writer.write(frame)?;
    }
    writer.finish()
}

/// Encodes `frames`, reporting `(done, total)` after each frame and yielding
/// to the scheduler in between.
///
/// # Errors
///
/// Same conditions as [`encode`].
#[tracing::instrument(level = "debug", skip_all, fields(frames = frames.len()))]
pub async fn encode_with_progress<F>(
    frames: &[Bitmap],
    options: &GifOptions,
    mut progress: F,
) -> Result<EncodedGif>
where
    F: FnMut(usize, usize),
{
    let mut writer = GifWriter::begin(frames, options)?;
    let total = frames.len();
    for (i, frame) in frames.iter().enumerate() {
        progress(i + 1, total);
        writer.write(frame)?;
        tokio::task::yield_now().await;
    }
    writer.finish()
}

/// Incremental writer shared by the blocking and async entry points.
struct GifWriter {
    encoder: Encoder<Vec<u8>>,
    width: u32,
    height: u32,
    gif_width: u16,
    gif_height: u16,
    delay: FrameDelay,
    sample_factor: i32,
    global: Option<Palette>,
    written: usize,
}

impl GifWriter {
    fn begin(frames: &[Bitmap], options: &GifOptions) -> Result<Self> {
        let first = frames.first().ok_or(Error::NoFramesSelected)?;
        let (width, height) = first.dimensions();
        if let Some(other) = frames.iter().find(|f| f.dimensions() != (width, height)) {
            return Err(Error::EncodeFailure(format!(
                "Frame size {}x{} differs from first frame {width}x{height}",
                other.width(),
                other.height()
            )));
        }
        let too_large = || {
            Error::EncodeFailure(format!(
                "Frame size {width}x{height} exceeds the GIF limit of {}",
                u16::MAX
            ))
        };
        let gif_width = u16::try_from(width).map_err(|_| too_large())?;
        let gif_height = u16::try_from(height).map_err(|_| too_large())?;

        let global = match options.palette {
            PalettePolicy::Global => Some(Palette::for_frames(frames, options.sample_factor)),
            PalettePolicy::PerFrame => None,
        };
        let table: &[u8] = match &global {
            Some(palette) => palette.rgb(),
            None => &[],
        };

        let mut encoder = Encoder::new(Vec::new(), gif_width, gif_height, table)?;
        // Play-once is the absence of the loop extension.
        if options.looping {
            encoder.set_repeat(Repeat::Infinite)?;
        }

        tracing::debug!(
            width,
            height,
            delay_cs = options.delay.centiseconds(),
            looping = options.looping,
            palette = ?options.palette,
            "starting GIF"
        );

        Ok(Self {
            encoder,
            width,
            height,
            gif_width,
            gif_height,
            delay: options.delay,
            sample_factor: options.sample_factor,
            global,
            written: 0,
        })
    }

    fn write(&mut self, bitmap: &Bitmap) -> Result<()> {
        if bitmap.dimensions() != (self.width, self.height) {
            return Err(Error::EncodeFailure(format!(
                "Frame size {}x{} differs from first frame {}x{}",
                bitmap.width(),
                bitmap.height(),
                self.width,
                self.height
            )));
        }

        let (palette, indices) = match &self.global {
            Some(global) => (None, global.index_frame(bitmap)),
            None => {
                let indexed = IndexedFrame::quantize(bitmap, self.sample_factor);
                (Some(indexed.palette), indexed.indices)
            }
        };

        let frame = Frame {
            width: self.gif_width,
            height: self.gif_height,
            delay: self.delay.centiseconds(),
            dispose: DisposalMethod::Background,
            palette,
            buffer: Cow::Owned(indices),
            ..Frame::default()
        };
        self.encoder.write_frame(&frame)?;
        self.written += 1;
        Ok(())
    }

    fn finish(self) -> Result<EncodedGif> {
        let frame_count = self.written;
        let delay_ms = self.delay.millis();
        let bytes = self
            .encoder
            .into_inner()
            .map_err(|e| Error::EncodeFailure(e.to_string()))?;
        tracing::debug!(frame_count, size = bytes.len(), "GIF finished");
        Ok(EncodedGif {
            bytes,
            frame_count,
            delay_ms,
        })
    }
}
