// SPDX-License-Identifier: MPL-2.0
//! Ink overlay: pen strokes and erasing, rasterized with `tiny_skia`.
//!
//! The overlay has the base image's dimensions and is transparent wherever
//! nothing was drawn. Base pixels are never touched by pen or eraser.

use crate::domain::editing::{PenColor, PenSize};
use crate::error::{Error, Result};
use crate::media::{Bitmap, PixelRect};
use tiny_skia::{
    BlendMode, Color, FillRule, IntRect, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect,
    Stroke, Transform,
};

/// Transparent drawing layer above the base image.
#[derive(Debug, Clone, PartialEq)]
pub struct InkLayer {
    pixmap: Pixmap,
}

impl InkLayer {
    /// Creates a fully transparent layer.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or the layer is too large.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(Error::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// True when no pixel carries any ink.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixmap.pixels().iter().all(|px| px.alpha() == 0)
    }

    /// Draws a round-capped, round-joined anti-aliased segment.
    ///
    /// A zero-length segment leaves a round dot of the pen's diameter.
    pub fn stroke_segment(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        size: PenSize,
        color: PenColor,
    ) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        paint.anti_alias = true;

        let width = size.as_f32();
        if from == to {
            if let Some(dot) = PathBuilder::from_circle(from.0, from.1, width / 2.0) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(from.0, from.1);
        builder.line_to(to.0, to.1);
        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Clears a square of side `size` centred on `center`.
    pub fn erase_square(&mut self, center: (f32, f32), size: PenSize) {
        let side = size.as_f32();
        let Some(rect) = Rect::from_xywh(center.0 - side / 2.0, center.1 - side / 2.0, side, side)
        else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Removes all ink.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Copies the region `rect` into a new layer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCropRegion` if the rectangle is empty or outside the
    /// layer.
    pub fn crop(&self, rect: PixelRect) -> Result<Self> {
        let invalid = || Error::InvalidCropRegion {
            width: rect.width,
            height: rect.height,
        };
        let x = i32::try_from(rect.x).map_err(|_| invalid())?;
        let y = i32::try_from(rect.y).map_err(|_| invalid())?;
        let area = IntRect::from_xywh(x, y, rect.width, rect.height).ok_or_else(invalid)?;
        let pixmap = self.pixmap.clone_rect(area).ok_or_else(invalid)?;
        if pixmap.width() != rect.width || pixmap.height() != rect.height {
            return Err(invalid());
        }
        Ok(Self { pixmap })
    }

    /// Converts the premultiplied layer to a straight-alpha bitmap.
    ///
    /// # Errors
    ///
    /// Never fails for a valid layer; the result type follows [`Bitmap::from_rgba`].
    pub fn to_bitmap(&self) -> Result<Bitmap> {
        let mut rgba = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Bitmap::from_rgba(self.pixmap.width(), self.pixmap.height(), rgba)
    }

    /// Ink alpha at (x, y), or `None` outside the layer.
    #[must_use]
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|px| px.alpha())
    }
}
