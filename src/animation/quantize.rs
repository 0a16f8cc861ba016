// SPDX-License-Identifier: MPL-2.0
//! Palette reduction to at most 256 colors.
//!
//! Frames with few colors (UI captures, flat artwork, test fixtures) get an
//! exact palette, so they round-trip without loss. Anything richer is reduced
//! with NeuQuant. Alpha is ignored: GIF frames are written fully opaque.

use color_quant::NeuQuant;
use std::collections::HashMap;
use std::fmt;

use crate::config::defaults::{MAX_QUANTIZER_SAMPLE_FACTOR, MIN_QUANTIZER_SAMPLE_FACTOR};
use crate::media::Bitmap;

/// Largest palette a GIF color table can hold.
pub const MAX_PALETTE_COLORS: usize = 256;

/// Upper bound on pixels fed to NeuQuant when training a shared palette.
const GLOBAL_TRAINING_PIXELS: usize = 1 << 20;

/// Clamps a NeuQuant sampling factor to `1..=30`; NeuQuant panics outside it.
#[must_use]
pub fn clamp_sample_factor(sample_factor: i32) -> i32 {
    sample_factor.clamp(MIN_QUANTIZER_SAMPLE_FACTOR, MAX_QUANTIZER_SAMPLE_FACTOR)
}

enum Lookup {
    Exact(HashMap<[u8; 3], u8>),
    Neural(Box<NeuQuant>),
}

/// A color table plus the mapping from RGB to table index.
pub struct Palette {
    rgb: Vec<u8>,
    lookup: Lookup,
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette")
            .field("colors", &self.len())
            .field("exact", &self.is_exact())
            .finish()
    }
}

impl Palette {
    /// Builds a palette for a single frame.
    #[must_use]
    pub fn for_frame(frame: &Bitmap, sample_factor: i32) -> Self {
        Self::exact([frame])
            .unwrap_or_else(|| Self::train(&opaque_rgba(frame.pixels()), sample_factor))
    }

    /// Builds one palette covering every frame.
    ///
    /// Training input is subsampled evenly across frames so long sequences
    /// don't dominate memory.
    #[must_use]
    pub fn for_frames(frames: &[Bitmap], sample_factor: i32) -> Self {
        if let Some(palette) = Self::exact(frames) {
            return palette;
        }
        let total: usize = frames.iter().map(|f| f.pixels().len() / 4).sum();
        let stride = total.div_ceil(GLOBAL_TRAINING_PIXELS).max(1);

        let mut samples = Vec::with_capacity((total / stride + 1) * 4);
        for frame in frames {
            for px in frame.pixels().chunks_exact(4).step_by(stride) {
                samples.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        Self::train(&samples, sample_factor)
    }

    /// Collects the distinct colors of `frames`, or `None` past 256.
    fn exact<'a, I>(frames: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Bitmap>,
    {
        let mut map: HashMap<[u8; 3], u8> = HashMap::new();
        let mut rgb = Vec::new();
        for frame in frames {
            for px in frame.pixels().chunks_exact(4) {
                let key = [px[0], px[1], px[2]];
                if map.contains_key(&key) {
                    continue;
                }
                let index = u8::try_from(map.len()).ok()?;
                map.insert(key, index);
                rgb.extend_from_slice(&key);
            }
        }
        if rgb.is_empty() {
            return None;
        }
        Some(Self {
            rgb,
            lookup: Lookup::Exact(map),
        })
    }

    fn train(rgba: &[u8], sample_factor: i32) -> Self {
        let quantizer = NeuQuant::new(
            clamp_sample_factor(sample_factor),
            MAX_PALETTE_COLORS,
            rgba,
        );
        Self {
            rgb: quantizer.color_map_rgb(),
            lookup: Lookup::Neural(Box::new(quantizer)),
        }
    }

    /// Flat `r, g, b` color table.
    #[must_use]
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rgb.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }

    /// True when every input color is represented without error.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        matches!(self.lookup, Lookup::Exact(_))
    }

    /// Maps every pixel of `frame` to its palette index.
    #[must_use]
    pub fn index_frame(&self, frame: &Bitmap) -> Vec<u8> {
        frame
            .pixels()
            .chunks_exact(4)
            .map(|px| self.index_of([px[0], px[1], px[2]]))
            .collect()
    }

    fn index_of(&self, rgb: [u8; 3]) -> u8 {
        match &self.lookup {
            Lookup::Exact(map) => map.get(&rgb).copied().unwrap_or(0),
            Lookup::Neural(quantizer) => {
                let index = quantizer.index_of(&[rgb[0], rgb[1], rgb[2], 255]);
                u8::try_from(index).unwrap_or(u8::MAX)
            }
        }
    }
}

/// A frame reduced to palette indices, with the palette written alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    /// Flat `r, g, b` local color table.
    pub palette: Vec<u8>,
    /// One index per pixel, row-major.
    pub indices: Vec<u8>,
}

impl IndexedFrame {
    /// Quantizes a frame against its own palette.
    #[must_use]
    pub fn quantize(frame: &Bitmap, sample_factor: i32) -> Self {
        let palette = Palette::for_frame(frame, sample_factor);
        Self {
            indices: palette.index_frame(frame),
            palette: palette.rgb,
        }
    }
}

fn opaque_rgba(rgba: &[u8]) -> Vec<u8> {
    let mut out = rgba.to_vec();
    for px in out.chunks_exact_mut(4) {
        px[3] = 255;
    }
    out
}
