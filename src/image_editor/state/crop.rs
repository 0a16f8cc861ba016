// SPDX-License-Identifier: MPL-2.0
//! Crop tool state.

use crate::error::Result;
use crate::media::PixelRect;

/// In-progress crop selection in image coordinates.
///
/// The anchor is where the drag started; `current` follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDrag {
    pub anchor: (f32, f32),
    pub current: (f32, f32),
    /// True while the pointer that started the selection is still down.
    pub dragging: bool,
}

impl CropDrag {
    #[must_use]
    pub fn start(point: (f32, f32)) -> Self {
        Self {
            anchor: point,
            current: point,
            dragging: true,
        }
    }

    pub fn update(&mut self, point: (f32, f32)) {
        self.current = point;
    }

    /// Normalizes the selection to a pixel rectangle inside `bounds`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCropRegion` when the selection has no area.
    pub fn to_rect(&self, bounds: (u32, u32)) -> Result<PixelRect> {
        PixelRect::from_corners(self.anchor, self.current, bounds)
    }
}
