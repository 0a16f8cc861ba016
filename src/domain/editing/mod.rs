// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for the per-shot editor:
//! - [`AdjustmentPercent`]: Brightness/contrast percentage
//! - [`PenSize`]: Pen and eraser size
//! - [`PenColor`]: Pen stroke color
//! - [`ZoomScale`]: Editor canvas zoom factor

pub mod newtypes;

pub use newtypes::{AdjustmentPercent, PenColor, PenSize, ZoomScale};
