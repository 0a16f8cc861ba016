// SPDX-License-Identifier: MPL-2.0
//! Adjustment tool state and helpers for brightness/contrast.

use crate::domain::editing::AdjustmentPercent;
use crate::media::{adjust_tone, Bitmap};

/// Brightness and contrast applied non-destructively to the base layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustmentState {
    /// Brightness level (guaranteed valid by type).
    pub brightness: AdjustmentPercent,
    /// Contrast level (guaranteed valid by type).
    pub contrast: AdjustmentPercent,
}

impl AdjustmentState {
    #[must_use]
    pub fn new(brightness: AdjustmentPercent, contrast: AdjustmentPercent) -> Self {
        Self {
            brightness,
            contrast,
        }
    }

    /// Returns true if any adjustment has been made (non-neutral values).
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.brightness.is_neutral() || !self.contrast.is_neutral()
    }

    /// Reset adjustments to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Renders `source` with these adjustments.
    #[must_use]
    pub fn render(&self, source: &Bitmap) -> Bitmap {
        adjust_tone(source, self.brightness, self.contrast)
    }

    /// CSS filter string for a live preview of the base layer.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "brightness({}%) contrast({}%)",
            self.brightness.value(),
            self.contrast.value()
        )
    }
}
