// SPDX-License-Identifier: MPL-2.0
//! Per-shot raster editor: freehand ink, crop and brightness/contrast.
//!
//! An [`EditSession`] holds the base pixels, a transparent ink overlay of the
//! same size, the pending crop selection and the tone adjustments. Nothing is
//! written back to the gallery until the host calls [`EditSession::flatten`]
//! and saves the result.

mod pointer;
mod state;

pub use self::state::{AdjustmentState, CropDrag, InkLayer};
pub use pointer::Viewport;

use crate::domain::editing::{AdjustmentPercent, PenColor, PenSize, ZoomScale};
use crate::error::Result;
use crate::media::image_transform::{self, composite_over};
use crate::media::Bitmap;

/// Tool receiving pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Pen,
    Erase,
    Crop,
}

/// Editing state for one captured shot.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Unadjusted base pixels that tone adjustments are computed from.
    source: Bitmap,
    ink: InkLayer,
    adjustment: AdjustmentState,
    tool: EditorTool,
    pen_size: PenSize,
    pen_color: PenColor,
    zoom: ZoomScale,
    crop: Option<CropDrag>,
    /// Last point of the stroke in progress.
    stroke_last: Option<(f32, f32)>,
}

impl EditSession {
    /// Opens an editor on `bitmap` with default tool settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the ink layer cannot be allocated.
    pub fn open(bitmap: Bitmap) -> Result<Self> {
        let ink = InkLayer::new(bitmap.width(), bitmap.height())?;
        Ok(Self {
            source: bitmap,
            ink,
            adjustment: AdjustmentState::default(),
            tool: EditorTool::default(),
            pen_size: PenSize::default(),
            pen_color: PenColor::default(),
            zoom: ZoomScale::default(),
            crop: None,
            stroke_last: None,
        })
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    #[must_use]
    pub fn tool(&self) -> EditorTool {
        self.tool
    }

    #[must_use]
    pub fn pen_size(&self) -> PenSize {
        self.pen_size
    }

    #[must_use]
    pub fn pen_color(&self) -> PenColor {
        self.pen_color
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomScale {
        self.zoom
    }

    #[must_use]
    pub fn adjustment(&self) -> AdjustmentState {
        self.adjustment
    }

    #[must_use]
    pub fn ink(&self) -> &InkLayer {
        &self.ink
    }

    #[must_use]
    pub fn pending_crop(&self) -> Option<&CropDrag> {
        self.crop.as_ref()
    }

    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.stroke_last.is_some()
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Selects a tool. Any stroke in progress ends; a pending crop survives.
    pub fn set_tool(&mut self, tool: EditorTool) {
        self.tool = tool;
        self.stroke_last = None;
    }

    pub fn set_pen_size(&mut self, size: PenSize) {
        self.pen_size = size;
    }

    /// Sets the pen color from `#rrggbb` text.
    ///
    /// # Errors
    ///
    /// Returns a config error and keeps the previous color when the text is
    /// not a hex color.
    pub fn set_pen_color(&mut self, hex: &str) -> Result<()> {
        self.pen_color = PenColor::parse_hex(hex)?;
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: ZoomScale) {
        self.zoom = zoom;
    }

    /// Updates brightness/contrast. Only the base layer is affected.
    pub fn set_adjustment(&mut self, brightness: AdjustmentPercent, contrast: AdjustmentPercent) {
        self.adjustment = AdjustmentState::new(brightness, contrast);
    }

    // ---------------------------------------------------------------------
    // Ink
    // ---------------------------------------------------------------------

    /// Starts a stroke at an image-space point.
    ///
    /// The pen only records the point; the eraser clears immediately.
    pub fn begin_stroke(&mut self, point: (f32, f32)) {
        if self.tool == EditorTool::Erase {
            self.ink.erase_square(point, self.pen_size);
        }
        if self.tool != EditorTool::Crop {
            self.stroke_last = Some(point);
        }
    }

    /// Extends the stroke in progress to `point`. Ignored when no stroke is
    /// active.
    pub fn stroke_to(&mut self, point: (f32, f32)) {
        let Some(last) = self.stroke_last else {
            return;
        };
        self.apply_stroke(last, point, self.tool);
        self.stroke_last = Some(point);
    }

    pub fn end_stroke(&mut self) {
        self.stroke_last = None;
    }

    /// Applies one pointer step of `tool` on the ink overlay.
    pub fn apply_stroke(&mut self, from: (f32, f32), to: (f32, f32), tool: EditorTool) {
        match tool {
            EditorTool::Pen => {
                self.ink
                    .stroke_segment(from, to, self.pen_size, self.pen_color);
            }
            EditorTool::Erase => self.ink.erase_square(to, self.pen_size),
            EditorTool::Crop => {}
        }
    }

    pub fn clear_ink(&mut self) {
        self.ink.clear();
    }

    // ---------------------------------------------------------------------
    // Crop
    // ---------------------------------------------------------------------

    pub fn begin_crop(&mut self, point: (f32, f32)) {
        self.crop = Some(CropDrag::start(point));
    }

    /// Moves the free corner of the selection. Ignored without a selection.
    pub fn update_crop(&mut self, point: (f32, f32)) {
        if let Some(crop) = self.crop.as_mut() {
            crop.update(point);
        }
    }

    pub fn cancel_crop(&mut self) {
        self.crop = None;
    }

    /// Crops base and ink to the pending selection.
    ///
    /// Current adjustments are baked into the new base and reset to neutral,
    /// so later tone changes start from what the user sees. Returns `false`
    /// when there is no selection.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCropRegion` when the selection has no area; the
    /// selection is kept so it can be corrected.
    pub fn apply_crop(&mut self) -> Result<bool> {
        let Some(crop) = self.crop else {
            return Ok(false);
        };
        let rect = crop.to_rect(self.dimensions())?;

        let base = image_transform::crop(&self.rendered_base(), rect)?;
        let ink = self.ink.crop(rect)?;

        tracing::debug!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "applied crop"
        );
        self.source = base;
        self.ink = ink;
        self.adjustment.reset();
        self.crop = None;
        self.stroke_last = None;
        Ok(true)
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    /// Base layer with the current adjustments applied.
    #[must_use]
    pub fn rendered_base(&self) -> Bitmap {
        self.adjustment.render(&self.source)
    }

    /// Composites the adjusted base and the ink overlay into one bitmap.
    ///
    /// # Errors
    ///
    /// Returns an error if the layers cannot be composited.
    pub fn flatten(&self) -> Result<Bitmap> {
        let base = self.rendered_base();
        if self.ink.is_empty() {
            return Ok(base);
        }
        composite_over(&base, &self.ink.to_bitmap()?)
    }
}
