// SPDX-License-Identifier: MPL-2.0
//! Raster transformations for crop, resize, letterbox and compositing.

use crate::domain::video::OutputWidth;
use crate::error::{Error, Result};
use crate::media::Bitmap;
use image_rs::imageops::{self, FilterType};
use image_rs::{Rgba, RgbaImage};

// ==========================================================================
// Crop Rectangle
// ==========================================================================

/// Axis-aligned rectangle in integer image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Builds a rectangle from two corners given in any order.
    ///
    /// Corners are rounded to whole pixels and clamped to a `bounds` image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCropRegion`] when the normalized rectangle has
    /// zero width or height.
    pub fn from_corners(a: (f32, f32), b: (f32, f32), bounds: (u32, u32)) -> Result<Self> {
        let clamp = |v: f32, max: u32| -> u32 {
            // Clamped to [0, max] before the cast; NaN maps to 0.
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss
            )]
            let px = if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, max as f32) as u32
            };
            px
        };

        let (x0, x1) = (clamp(a.0, bounds.0), clamp(b.0, bounds.0));
        let (y0, y1) = (clamp(a.1, bounds.1), clamp(b.1, bounds.1));
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));

        let width = right - left;
        let height = bottom - top;
        if width == 0 || height == 0 {
            return Err(Error::InvalidCropRegion { width, height });
        }

        Ok(Self {
            x: left,
            y: top,
            width,
            height,
        })
    }
}

// ==========================================================================
// Transformation Functions
// ==========================================================================

/// Crops the bitmap to `rect`.
///
/// # Errors
///
/// Returns [`Error::InvalidCropRegion`] if the rectangle is empty or does not
/// fit inside the bitmap.
pub fn crop(bitmap: &Bitmap, rect: PixelRect) -> Result<Bitmap> {
    let fits = rect.x.checked_add(rect.width).is_some_and(|r| r <= bitmap.width())
        && rect.y.checked_add(rect.height).is_some_and(|b| b <= bitmap.height());
    if rect.width == 0 || rect.height == 0 || !fits {
        return Err(Error::InvalidCropRegion {
            width: rect.width,
            height: rect.height,
        });
    }

    let row_bytes = rect.width as usize * 4;
    let stride = bitmap.width() as usize * 4;
    let mut out = Vec::with_capacity(row_bytes * rect.height as usize);
    for row in rect.y..rect.y + rect.height {
        let start = row as usize * stride + rect.x as usize * 4;
        out.extend_from_slice(&bitmap.pixels()[start..start + row_bytes]);
    }

    Bitmap::from_rgba(rect.width, rect.height, out)
}

/// Resizes to exact dimensions with a triangle (bilinear) filter.
///
/// Returns a shared clone when the size already matches.
#[must_use]
pub fn resize_exact(bitmap: &Bitmap, width: u32, height: u32) -> Bitmap {
    let width = width.max(1);
    let height = height.max(1);
    if bitmap.dimensions() == (width, height) {
        return bitmap.clone();
    }
    let resized = imageops::resize(&bitmap.to_rgba_image(), width, height, FilterType::Triangle);
    Bitmap::from_rgba_image(resized)
}

/// Resizes to `width`, keeping the aspect ratio.
#[must_use]
pub fn resize_to_width(bitmap: &Bitmap, width: OutputWidth) -> Bitmap {
    let height = width.scaled_height(bitmap.width(), bitmap.height());
    resize_exact(bitmap, width.value(), height)
}

/// Centers the bitmap on an opaque black canvas of the given size.
///
/// The canvas must be at least as large as the bitmap; larger bitmaps are
/// returned unchanged.
#[must_use]
pub fn letterbox(bitmap: &Bitmap, width: u32, height: u32) -> Bitmap {
    if bitmap.width() >= width && bitmap.height() >= height {
        return bitmap.clone();
    }
    let width = width.max(bitmap.width());
    let height = height.max(bitmap.height());
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let x = i64::from((width - bitmap.width()) / 2);
    let y = i64::from((height - bitmap.height()) / 2);
    imageops::replace(&mut canvas, &bitmap.to_rgba_image(), x, y);
    Bitmap::from_rgba_image(canvas)
}

/// Composites `overlay` onto `base` with straight-alpha source-over.
///
/// Pixels where the overlay is fully transparent keep the base bytes exactly.
///
/// # Errors
///
/// Returns an error if the two bitmaps differ in size.
pub fn composite_over(base: &Bitmap, overlay: &Bitmap) -> Result<Bitmap> {
    if base.dimensions() != overlay.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: base.dimensions(),
            actual: overlay.dimensions(),
        });
    }
    if overlay.pixels().chunks_exact(4).all(|px| px[3] == 0) {
        return Ok(base.clone());
    }

    let mut out = base.pixels().to_vec();
    for (dst, src) in out.chunks_exact_mut(4).zip(overlay.pixels().chunks_exact(4)) {
        let sa = u32::from(src[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            dst.copy_from_slice(src);
            continue;
        }
        let da = u32::from(dst[3]);
        // out_a = sa + da * (1 - sa), all in 0..=255 fixed point.
        let out_a = sa * 255 + da * (255 - sa);
        for c in 0..3 {
            let num = u32::from(src[c]) * sa * 255 + u32::from(dst[c]) * da * (255 - sa);
            dst[c] = u8::try_from((num + out_a / 2) / out_a).unwrap_or(u8::MAX);
        }
        dst[3] = u8::try_from((out_a + 127) / 255).unwrap_or(u8::MAX);
    }

    Bitmap::from_rgba(base.width(), base.height(), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{gradient_bitmap, solid_bitmap};

    #[test]
    fn corners_are_normalized() {
        let rect = PixelRect::from_corners((8.0, 6.0), (2.0, 1.0), (10, 10)).expect("rect");
        assert_eq!(
            rect,
            PixelRect {
                x: 2,
                y: 1,
                width: 6,
                height: 5
            }
        );
    }

    #[test]
    fn corners_are_clamped_to_bounds() {
        let rect = PixelRect::from_corners((-5.0, 4.0), (50.0, 20.0), (10, 8)).expect("rect");
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, 4, 10, 4));
    }

    #[test]
    fn zero_area_is_rejected() {
        let err = PixelRect::from_corners((3.0, 3.0), (3.2, 9.0), (10, 10)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCropRegion {
                width: 0,
                height: 6
            }
        ));
    }

    #[test]
    fn crop_copies_expected_region() {
        let bitmap = gradient_bitmap(10, 8);
        let rect = PixelRect {
            x: 2,
            y: 3,
            width: 4,
            height: 2,
        };
        let cropped = crop(&bitmap, rect).expect("crop");
        assert_eq!(cropped.dimensions(), (4, 2));
        assert_eq!(cropped.pixel(0, 0), bitmap.pixel(2, 3));
        assert_eq!(cropped.pixel(3, 1), bitmap.pixel(5, 4));
    }

    #[test]
    fn crop_outside_bounds_fails() {
        let bitmap = gradient_bitmap(4, 4);
        let rect = PixelRect {
            x: 3,
            y: 0,
            width: 2,
            height: 2,
        };
        assert!(crop(&bitmap, rect).is_err());
    }

    #[test]
    fn resize_to_width_keeps_aspect() {
        let bitmap = solid_bitmap(1280, 720, [9, 9, 9, 255]);
        let resized = resize_to_width(&bitmap, OutputWidth::new(640));
        assert_eq!(resized.dimensions(), (640, 360));
    }

    #[test]
    fn resize_to_same_size_shares_pixels() {
        let bitmap = gradient_bitmap(16, 9);
        let resized = resize_exact(&bitmap, 16, 9);
        assert!(std::sync::Arc::ptr_eq(
            &bitmap.shared_pixels(),
            &resized.shared_pixels()
        ));
    }

    #[test]
    fn letterbox_centers_on_black() {
        let bitmap = solid_bitmap(4, 2, [200, 100, 50, 255]);
        let boxed = letterbox(&bitmap, 4, 6);
        assert_eq!(boxed.dimensions(), (4, 6));
        assert_eq!(boxed.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(boxed.pixel(1, 2), Some([200, 100, 50, 255]));
        assert_eq!(boxed.pixel(1, 3), Some([200, 100, 50, 255]));
        assert_eq!(boxed.pixel(1, 4), Some([0, 0, 0, 255]));
    }

    #[test]
    fn transparent_overlay_keeps_base_exactly() {
        let base = gradient_bitmap(5, 5);
        let overlay = solid_bitmap(5, 5, [0, 0, 0, 0]);
        let out = composite_over(&base, &overlay).expect("composite");
        assert_eq!(out, base);
    }

    #[test]
    fn opaque_overlay_replaces_base() {
        let base = gradient_bitmap(3, 3);
        let overlay = solid_bitmap(3, 3, [255, 138, 61, 255]);
        let out = composite_over(&base, &overlay).expect("composite");
        assert_eq!(out.pixel(1, 1), Some([255, 138, 61, 255]));
    }

    #[test]
    fn half_alpha_overlay_blends() {
        let base = solid_bitmap(1, 1, [0, 0, 0, 255]);
        let overlay = solid_bitmap(1, 1, [255, 255, 255, 128]);
        let px = composite_over(&base, &overlay)
            .expect("composite")
            .pixel(0, 0)
            .expect("pixel");
        assert!((i32::from(px[0]) - 128).abs() <= 1);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn mismatched_composite_fails() {
        let base = solid_bitmap(2, 2, [0, 0, 0, 255]);
        let overlay = solid_bitmap(3, 2, [0, 0, 0, 0]);
        assert!(matches!(
            composite_over(&base, &overlay),
            Err(Error::DimensionMismatch {
                expected: (2, 2),
                actual: (3, 2)
            })
        ));
    }
}
