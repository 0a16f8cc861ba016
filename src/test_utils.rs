// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and bitmap fixtures.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.

// Re-export approx macros for convenient use in tests
pub use approx::assert_abs_diff_eq;

use crate::media::Bitmap;

/// Builds a bitmap filled with a single RGBA color.
pub fn solid_bitmap(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
    let pixels = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    Bitmap::from_rgba(width, height, pixels).expect("valid solid bitmap")
}

/// Builds an opaque bitmap whose pixel at (x, y) is `(x, y, x ^ y, 255)`.
///
/// Every pixel is distinct for images up to 256×256, which makes crop and
/// resampling offsets easy to verify.
pub fn gradient_bitmap(width: u32, height: u32) -> Bitmap {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let (r, g) = ((x % 256) as u8, (y % 256) as u8);
            pixels.extend_from_slice(&[r, g, r ^ g, 255]);
        }
    }
    Bitmap::from_rgba(width, height, pixels).expect("valid gradient bitmap")
}

/// Builds a 4×4 clip with one frame per second for `seconds` seconds.
///
/// Frame `i` is a solid color whose red channel is `i * 20`, so every second
/// of the clip is distinguishable.
pub fn numbered_clip(seconds: u32) -> crate::video_player::MemoryClip {
    let frames = (0..seconds)
        .map(|i| solid_bitmap(4, 4, [(i * 20 % 256) as u8, 64, 128, 255]))
        .collect();
    crate::video_player::MemoryClip::from_frames(frames, 1.0).expect("valid numbered clip")
}
