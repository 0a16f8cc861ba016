// SPDX-License-Identifier: MPL-2.0
//! Pixel implementation of the CSS filter functions used by the live preview.
//!
//! Each function follows the Filter Effects definitions and clamps its
//! output to `[0, 1]` before the next one runs, the same way a browser
//! chains `brightness() contrast() saturate() hue-rotate()`. Alpha is never
//! modified.

use crate::domain::editing::AdjustmentPercent;
use crate::domain::media::FilterState;
use crate::media::Bitmap;

type Matrix3 = [[f32; 3]; 3];

/// Builds the per-channel lookup table for `brightness(b) contrast(c)`.
fn tone_lut(brightness: f32, contrast: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        // value < 256, exact in f32
        #[allow(clippy::cast_precision_loss)]
        let channel = value as f32 / 255.0;
        let lit = (channel * brightness).clamp(0.0, 1.0);
        let contrasted = ((lit - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
        *slot = to_byte(contrasted);
    }
    lut
}

fn to_byte(value: f32) -> u8 {
    // Clamped to [0, 255] before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = (value * 255.0).round().clamp(0.0, 255.0) as u8;
    byte
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(radians: f32) -> Matrix3 {
    let (sin, cos) = radians.sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn apply_matrix(m: &Matrix3, rgb: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0; 3];
    for (row, value) in m.iter().zip(out.iter_mut()) {
        *value = (row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]).clamp(0.0, 1.0);
    }
    out
}

/// Applies the full live filter to a bitmap.
///
/// An identity filter returns a clone that shares the original pixels.
#[must_use]
pub fn apply_filter(bitmap: &Bitmap, filter: &FilterState) -> Bitmap {
    if filter.is_identity() {
        return bitmap.clone();
    }

    let lut = tone_lut(filter.brightness.as_factor(), filter.contrast.as_factor());
    let mut matrices: Vec<Matrix3> = Vec::with_capacity(2);
    if !filter.saturate.is_neutral() {
        matrices.push(saturate_matrix(filter.saturate.as_factor()));
    }
    if !filter.hue.is_neutral() {
        matrices.push(hue_rotate_matrix(filter.hue.as_radians()));
    }

    let mut pixels = bitmap.pixels().to_vec();
    for px in pixels.chunks_exact_mut(4) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
        if matrices.is_empty() {
            continue;
        }
        let mut rgb = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        for m in &matrices {
            rgb = apply_matrix(m, rgb);
        }
        px[0] = to_byte(rgb[0]);
        px[1] = to_byte(rgb[1]);
        px[2] = to_byte(rgb[2]);
    }

    rebuild(bitmap, pixels)
}

/// Applies the editor's brightness/contrast pair.
///
/// Neutral values return a clone that shares the original pixels.
#[must_use]
pub fn adjust_tone(
    bitmap: &Bitmap,
    brightness: AdjustmentPercent,
    contrast: AdjustmentPercent,
) -> Bitmap {
    if brightness.is_neutral() && contrast.is_neutral() {
        return bitmap.clone();
    }

    let lut = tone_lut(brightness.as_factor(), contrast.as_factor());
    let mut pixels = bitmap.pixels().to_vec();
    for px in pixels.chunks_exact_mut(4) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }

    rebuild(bitmap, pixels)
}

fn rebuild(source: &Bitmap, pixels: Vec<u8>) -> Bitmap {
    // Same dimensions and length as the source, so construction cannot fail.
    Bitmap::from_rgba(source.width(), source.height(), pixels).unwrap_or_else(|_| source.clone())
}
