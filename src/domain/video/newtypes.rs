// SPDX-License-Identifier: MPL-2.0
//! Video capture newtypes.
//!
//! This module provides type-safe wrappers for playback and capture values,
//! ensuring they are always within valid ranges.

use crate::config::defaults::{
    DEFAULT_BATCH_COUNT, DEFAULT_EXPORT_FPS, DEFAULT_OUTPUT_WIDTH, MAX_BATCH_COUNT,
    MAX_EXPORT_FPS, MAX_OUTPUT_WIDTH, MAX_PLAYBACK_SPEED, MIN_BATCH_COUNT, MIN_EXPORT_FPS,
    MIN_OUTPUT_WIDTH, MIN_PLAYBACK_SPEED,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// PlaybackSpeed
// =============================================================================

/// Playback speed value, guaranteed to be within valid range (0.1x - 3.0x).
///
/// # Example
///
/// ```
/// use frame_capture::domain::video::PlaybackSpeed;
///
/// let speed = PlaybackSpeed::new(2.0);
/// assert_eq!(speed.value(), 2.0);
///
/// // Values outside range are clamped
/// let too_fast = PlaybackSpeed::new(100.0);
/// assert_eq!(too_fast.value(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSpeed(f64);

impl PlaybackSpeed {
    /// Creates a new playback speed, clamping to valid range.
    #[must_use]
    pub fn new(speed: f64) -> Self {
        if speed.is_nan() {
            return Self::default();
        }
        Self(speed.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED))
    }

    /// Returns the speed value as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

// =============================================================================
// BatchCount
// =============================================================================

/// Number of frames requested by a batch capture (1–200).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BatchCount(u32);

impl BatchCount {
    /// Creates a new batch count, clamping to valid range.
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self(count.clamp(MIN_BATCH_COUNT, MAX_BATCH_COUNT))
    }

    /// Returns the count.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BatchCount {
    fn default() -> Self {
        Self(DEFAULT_BATCH_COUNT)
    }
}

impl From<u32> for BatchCount {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<BatchCount> for u32 {
    fn from(value: BatchCount) -> Self {
        value.0
    }
}

// =============================================================================
// Fps
// =============================================================================

/// Frames per second for range sampling and GIF playback (1–30).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    /// Creates a new frame rate, clamping to valid range.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self(fps.clamp(MIN_EXPORT_FPS, MAX_EXPORT_FPS))
    }

    /// Returns the frame rate.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the spacing between consecutive frames in seconds.
    #[must_use]
    pub fn frame_interval_secs(self) -> f64 {
        1.0 / f64::from(self.0)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(DEFAULT_EXPORT_FPS)
    }
}

impl From<u32> for Fps {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Fps> for u32 {
    fn from(value: Fps) -> Self {
        value.0
    }
}

// =============================================================================
// OutputWidth
// =============================================================================

/// Width in pixels every exported frame is resampled to (1–1920).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct OutputWidth(u32);

impl OutputWidth {
    /// Creates a new output width, clamping to valid range.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self(width.clamp(MIN_OUTPUT_WIDTH, MAX_OUTPUT_WIDTH))
    }

    /// Returns the width in pixels.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the height that keeps the aspect ratio of `width`×`height`
    /// at this output width, rounded and at least one pixel.
    #[must_use]
    pub fn scaled_height(self, width: u32, height: u32) -> u32 {
        if width == 0 {
            return 1;
        }
        let scale = f64::from(self.0) / f64::from(width);
        // Bounded by MAX_OUTPUT_WIDTH times the source aspect ratio.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scaled = (f64::from(height) * scale).round().max(1.0) as u32;
        scaled
    }
}

impl Default for OutputWidth {
    fn default() -> Self {
        Self(DEFAULT_OUTPUT_WIDTH)
    }
}

impl From<u32> for OutputWidth {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<OutputWidth> for u32 {
    fn from(value: OutputWidth) -> Self {
        value.0
    }
}

// =============================================================================
// Tests
// =============================================================================
