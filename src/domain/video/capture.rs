// SPDX-License-Identifier: MPL-2.0
//! Capture and export request types.
//!
//! These are the configuration snapshots the host passes into the capture
//! orchestrator. They carry no behavior beyond defaults and validation.

use super::newtypes::{BatchCount, Fps, OutputWidth};
use crate::config::defaults::{
    DEFAULT_BATCH_INTERVAL_MS, DEFAULT_RANGE_END_SECS, DEFAULT_RANGE_START_SECS,
};
use serde::{Deserialize, Serialize};

/// Stable identity of a captured shot.
///
/// Ids are handed out in capture order, so comparing two ids tells which
/// shot was captured first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShotId(pub u64);

/// Multi-frame capture cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of frames to capture.
    pub count: BatchCount,
    /// Spacing between frames in milliseconds of video time.
    pub interval_ms: u32,
}

impl BatchConfig {
    #[must_use]
    pub fn new(count: u32, interval_ms: u32) -> Self {
        Self {
            count: BatchCount::new(count),
            interval_ms,
        }
    }

    /// Spacing between frames in seconds.
    #[must_use]
    pub fn interval_secs(&self) -> f64 {
        f64::from(self.interval_ms) / 1000.0
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: BatchCount::default(),
            interval_ms: DEFAULT_BATCH_INTERVAL_MS,
        }
    }
}

/// How colors are reduced when encoding an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PalettePolicy {
    /// Each frame carries its own local palette.
    #[default]
    PerFrame,
    /// One palette trained on all frames, written as the global color table.
    Global,
}

/// Where exported frames come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GifSource {
    /// Shots picked from the gallery; exported in chronological order.
    Gallery { selection: Vec<ShotId> },
    /// Frames sampled from the loaded video between `start` and `end` seconds.
    VideoRange { start: f64, end: f64 },
}

impl Default for GifSource {
    fn default() -> Self {
        GifSource::Gallery {
            selection: Vec::new(),
        }
    }
}

impl GifSource {
    /// Default sampled range, matching the export panel's initial values.
    #[must_use]
    pub fn default_range() -> Self {
        GifSource::VideoRange {
            start: DEFAULT_RANGE_START_SECS,
            end: DEFAULT_RANGE_END_SECS,
        }
    }
}

/// Full GIF export request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GifExportConfig {
    pub source: GifSource,
    pub fps: Fps,
    pub output_width: OutputWidth,
    /// Bake the live filter into every exported frame.
    pub apply_filters: bool,
    /// Repeat forever instead of playing once.
    #[serde(rename = "loop")]
    pub looping: bool,
    pub palette: PalettePolicy,
}

impl Default for GifExportConfig {
    fn default() -> Self {
        Self {
            source: GifSource::default(),
            fps: Fps::default(),
            output_width: OutputWidth::default(),
            apply_filters: true,
            looping: true,
            palette: PalettePolicy::default(),
        }
    }
}
