// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for editor values,
//! ensuring they are always within valid ranges.

use crate::config::defaults::{
    DEFAULT_FILTER_PERCENT, DEFAULT_PEN_COLOR, DEFAULT_PEN_SIZE, DEFAULT_ZOOM_SCALE, MAX_PEN_SIZE, MAX_TONE_PERCENT,
    MAX_ZOOM_SCALE, MIN_PEN_SIZE, MIN_TONE_PERCENT, MIN_ZOOM_SCALE,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// AdjustmentPercent
// =============================================================================

/// Brightness or contrast percentage for the editor (50%–200%, 100% = neutral).
///
/// Follows CSS filter semantics: `brightness(150%)` multiplies every channel
/// by 1.5, `contrast(50%)` halves the distance of every channel from mid-gray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct AdjustmentPercent(f32);

impl AdjustmentPercent {
    /// Creates a new adjustment value, clamping to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        Self(percent.clamp(MIN_TONE_PERCENT, MAX_TONE_PERCENT))
    }

    /// Returns the raw percentage.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the value as a multiplier (100% → 1.0).
    #[must_use]
    pub fn as_factor(self) -> f32 {
        self.0 / 100.0
    }

    /// Returns whether this represents no adjustment (100%).
    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - DEFAULT_FILTER_PERCENT).abs() < f32::EPSILON
    }
}

impl Default for AdjustmentPercent {
    fn default() -> Self {
        Self(DEFAULT_FILTER_PERCENT)
    }
}

impl From<f32> for AdjustmentPercent {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<AdjustmentPercent> for f32 {
    fn from(value: AdjustmentPercent) -> Self {
        value.0
    }
}

// =============================================================================
// PenSize
// =============================================================================

/// Pen and eraser size in image pixels (1–32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenSize(u32);

impl PenSize {
    /// Creates a new pen size, clamping to the valid range.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self(size.clamp(MIN_PEN_SIZE, MAX_PEN_SIZE))
    }

    /// Returns the size in pixels.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the size as a float for rasterization.
    #[must_use]
    pub fn as_f32(self) -> f32 {
        // Bounded by MAX_PEN_SIZE, exact in f32.
        #[allow(clippy::cast_precision_loss)]
        let size = self.0 as f32;
        size
    }
}

impl Default for PenSize {
    fn default() -> Self {
        Self(DEFAULT_PEN_SIZE)
    }
}

// =============================================================================
// PenColor
// =============================================================================

/// Opaque pen color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PenColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PenColor {
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or the short `#rgb` form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the text is not a hex color.
    pub fn parse_hex(text: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("Invalid pen color: {text:?}"));
        let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for PenColor {
    fn default() -> Self {
        Self::parse_hex(DEFAULT_PEN_COLOR).unwrap_or(Self::new(0xff, 0x8a, 0x3d))
    }
}

impl fmt::Display for PenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// =============================================================================
// ZoomScale
// =============================================================================

/// Editor canvas zoom factor (0.5x–4.0x).
///
/// Screen coordinates are divided by this value to land in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomScale(f32);

impl ZoomScale {
    /// Creates a new zoom scale, clamping to the valid range.
    #[must_use]
    pub fn new(scale: f32) -> Self {
        if scale.is_nan() {
            return Self::default();
        }
        Self(scale.clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE))
    }

    /// Returns the zoom factor.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self(DEFAULT_ZOOM_SCALE)
    }
}

// =============================================================================
// Tests
// =============================================================================
