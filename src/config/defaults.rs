// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Filter**: Live preview filter bounds (brightness, contrast, saturate, hue)
//! - **Editor**: Pen, zoom and adjustment bounds for the per-shot editor
//! - **Playback**: Playback speed bounds
//! - **Batch**: Multi-frame capture cadence
//! - **Export**: GIF export parameters and the encoder delay floor
//! - **Sampler**: Seek and compositing timing

// ==========================================================================
// Filter Defaults
// ==========================================================================

/// Neutral brightness/contrast/saturate value (100% = unchanged).
pub const DEFAULT_FILTER_PERCENT: f32 = 100.0;

/// Minimum brightness and contrast percentage.
pub const MIN_TONE_PERCENT: f32 = 50.0;

/// Maximum brightness and contrast percentage.
pub const MAX_TONE_PERCENT: f32 = 200.0;

/// Minimum saturation percentage (0% = grayscale).
pub const MIN_SATURATE_PERCENT: f32 = 0.0;

/// Maximum saturation percentage.
pub const MAX_SATURATE_PERCENT: f32 = 300.0;

/// Neutral hue rotation in degrees.
pub const DEFAULT_HUE_DEGREES: f32 = 0.0;

/// Maximum hue rotation in degrees.
pub const MAX_HUE_DEGREES: f32 = 360.0;

// ==========================================================================
// Editor Defaults
// ==========================================================================

/// Default pen size in image pixels.
pub const DEFAULT_PEN_SIZE: u32 = 4;

/// Minimum pen size.
pub const MIN_PEN_SIZE: u32 = 1;

/// Maximum pen size.
pub const MAX_PEN_SIZE: u32 = 32;

/// Default ink color.
pub const DEFAULT_PEN_COLOR: &str = "#ff8a3d";

/// Default editor zoom scale (1.0 = one screen pixel per image pixel).
pub const DEFAULT_ZOOM_SCALE: f32 = 1.0;

/// Minimum editor zoom scale.
pub const MIN_ZOOM_SCALE: f32 = 0.5;

/// Maximum editor zoom scale.
pub const MAX_ZOOM_SCALE: f32 = 4.0;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Minimum playback speed multiplier.
pub const MIN_PLAYBACK_SPEED: f64 = 0.1;

/// Maximum playback speed multiplier.
pub const MAX_PLAYBACK_SPEED: f64 = 3.0;

// ==========================================================================
// Batch Defaults
// ==========================================================================

/// Default number of frames per batch capture.
pub const DEFAULT_BATCH_COUNT: u32 = 5;

/// Minimum number of frames per batch capture.
pub const MIN_BATCH_COUNT: u32 = 1;

/// Maximum number of frames per batch capture.
pub const MAX_BATCH_COUNT: u32 = 200;

/// Default spacing between batch frames in milliseconds.
pub const DEFAULT_BATCH_INTERVAL_MS: u32 = 500;

// ==========================================================================
// Export Defaults
// ==========================================================================

/// Default GIF frame rate.
pub const DEFAULT_EXPORT_FPS: u32 = 8;

/// Minimum GIF frame rate.
pub const MIN_EXPORT_FPS: u32 = 1;

/// Maximum GIF frame rate.
pub const MAX_EXPORT_FPS: u32 = 30;

/// Default GIF output width in pixels.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 640;

/// Minimum GIF output width in pixels.
pub const MIN_OUTPUT_WIDTH: u32 = 1;

/// Maximum GIF output width in pixels.
pub const MAX_OUTPUT_WIDTH: u32 = 1920;

/// Default start of the sampled video range in seconds.
pub const DEFAULT_RANGE_START_SECS: f64 = 0.0;

/// Default end of the sampled video range in seconds.
pub const DEFAULT_RANGE_END_SECS: f64 = 3.0;

/// Most frames a single range export may sample (two minutes at 30 fps).
pub const MAX_RANGE_FRAMES: usize = 3600;

/// Shortest frame delay the exporter will write, in milliseconds.
///
/// GIF stores delays in hundredths of a second and most decoders replace
/// anything below 2 cs with their own default.
pub const MIN_FRAME_DELAY_MS: u32 = 20;

/// File name offered for the exported animation.
pub const GIF_EXPORT_FILE_NAME: &str = "export.gif";

/// NeuQuant sampling factor (1 = best quality, 30 = fastest).
pub const DEFAULT_QUANTIZER_SAMPLE_FACTOR: i32 = 10;

/// Best-quality NeuQuant sampling factor.
pub const MIN_QUANTIZER_SAMPLE_FACTOR: i32 = 1;

/// Fastest NeuQuant sampling factor.
pub const MAX_QUANTIZER_SAMPLE_FACTOR: i32 = 30;

// ==========================================================================
// Sampler Defaults
// ==========================================================================

/// How long to wait for a seek-complete signal before giving up.
pub const DEFAULT_SEEK_TIMEOUT_MS: u64 = 5_000;

/// Display refresh interval assumed between seek completion and pixel read.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 16;

/// Number of refresh intervals to wait after each seek.
pub const DEFAULT_SETTLE_TICKS: u32 = 2;
