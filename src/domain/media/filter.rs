// SPDX-License-Identifier: MPL-2.0
//! Live visual filter values for the domain layer.
//!
//! The same [`FilterState`] snapshot drives the live preview (as a CSS filter
//! string) and frame capture (as pixel math), so what is captured is exactly
//! what was on screen.
//!
//! # Available Types
//!
//! - [`TonePercent`]: Brightness or contrast percentage
//! - [`SaturatePercent`]: Saturation percentage
//! - [`HueDegrees`]: Hue rotation angle
//! - [`FilterState`]: The full filter snapshot

use crate::config::defaults::{
    DEFAULT_FILTER_PERCENT, DEFAULT_HUE_DEGREES, MAX_HUE_DEGREES, MAX_SATURATE_PERCENT,
    MAX_TONE_PERCENT, MIN_SATURATE_PERCENT, MIN_TONE_PERCENT,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// TonePercent
// =============================================================================

/// Brightness or contrast percentage (50%–200%, 100% = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct TonePercent(f32);

impl TonePercent {
    /// Creates a new tone value, clamping to the valid range.
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

    /// Returns whether the value leaves pixels unchanged.
    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - DEFAULT_FILTER_PERCENT).abs() < f32::EPSILON
    }
}

impl Default for TonePercent {
    fn default() -> Self {
        Self(DEFAULT_FILTER_PERCENT)
    }
}

impl From<f32> for TonePercent {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<TonePercent> for f32 {
    fn from(value: TonePercent) -> Self {
        value.0
    }
}

// =============================================================================
// SaturatePercent
// =============================================================================

/// Saturation percentage (0%–300%, 0% = grayscale, 100% = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct SaturatePercent(f32);

impl SaturatePercent {
    /// Creates a new saturation value, clamping to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        Self(percent.clamp(MIN_SATURATE_PERCENT, MAX_SATURATE_PERCENT))
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

    /// Returns whether the value leaves pixels unchanged.
    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - DEFAULT_FILTER_PERCENT).abs() < f32::EPSILON
    }
}

impl Default for SaturatePercent {
    fn default() -> Self {
        Self(DEFAULT_FILTER_PERCENT)
    }
}

impl From<f32> for SaturatePercent {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<SaturatePercent> for f32 {
    fn from(value: SaturatePercent) -> Self {
        value.0
    }
}

// =============================================================================
// HueDegrees
// =============================================================================

/// Hue rotation angle in degrees (0–360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct HueDegrees(f32);

impl HueDegrees {
    /// Creates a new hue rotation, clamping to the valid range.
    #[must_use]
    pub fn new(degrees: f32) -> Self {
        Self(degrees.clamp(DEFAULT_HUE_DEGREES, MAX_HUE_DEGREES))
    }

    /// Returns the angle in degrees.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the angle in radians.
    #[must_use]
    pub fn as_radians(self) -> f32 {
        self.0.to_radians()
    }

    /// Returns whether the rotation is a full turn or none at all.
    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.0.abs() < f32::EPSILON || (self.0 - MAX_HUE_DEGREES).abs() < f32::EPSILON
    }
}

impl Default for HueDegrees {
    fn default() -> Self {
        Self(DEFAULT_HUE_DEGREES)
    }
}

impl From<f32> for HueDegrees {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<HueDegrees> for f32 {
    fn from(value: HueDegrees) -> Self {
        value.0
    }
}

// =============================================================================
// FilterState
// =============================================================================

/// Snapshot of the live preview filter.
///
/// Every field is always defined; [`FilterState::reset`] restores the
/// neutral defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub brightness: TonePercent,
    pub contrast: TonePercent,
    pub saturate: SaturatePercent,
    pub hue: HueDegrees,
}

impl FilterState {
    /// Builds a filter from raw slider values, clamping each one.
    #[must_use]
    pub fn new(brightness: f32, contrast: f32, saturate: f32, hue: f32) -> Self {
        Self {
            brightness: TonePercent::new(brightness),
            contrast: TonePercent::new(contrast),
            saturate: SaturatePercent::new(saturate),
            hue: HueDegrees::new(hue),
        }
    }

    /// Restores every field to its neutral default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns true if applying this filter leaves pixels unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.brightness.is_neutral()
            && self.contrast.is_neutral()
            && self.saturate.is_neutral()
            && self.hue.is_neutral()
    }

    /// Renders the filter as a CSS `filter` property value.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) saturate({}%) hue-rotate({}deg)",
            self.brightness.value(),
            self.contrast.value(),
            self.saturate.value(),
            self.hue.value()
        )
    }
}
