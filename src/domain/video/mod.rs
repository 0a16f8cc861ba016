// SPDX-License-Identifier: MPL-2.0
//! Video capture domain types.
//!
//! This module contains playback and capture value objects plus the pure
//! timestamp planning rules, independent of any media element.

pub mod capture;
pub mod newtypes;
pub mod plan;

// Re-export commonly used types
pub use capture::{BatchConfig, GifExportConfig, GifSource, PalettePolicy, ShotId};
pub use newtypes::{BatchCount, Fps, OutputWidth, PlaybackSpeed};
pub use plan::{clamp_seek_target, known_duration, plan_batch, plan_range, TimestampPlan};
