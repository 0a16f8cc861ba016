// SPDX-License-Identifier: MPL-2.0
//! Raster primitives shared by the sampler, editor and encoder.
//!
//! This module owns the [`Bitmap`] type and the pixel operations applied to it:
//! the CSS-style color filter, crop/resize/letterbox transforms, compositing
//! and still export.

pub mod bitmap;
pub mod color_filter;
pub mod frame_export;
pub mod image_transform;

pub use bitmap::Bitmap;
pub use color_filter::{adjust_tone, apply_filter};
pub use frame_export::{save_png, screenshot_filename};
pub use image_transform::PixelRect;
