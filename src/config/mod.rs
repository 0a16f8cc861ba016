// SPDX-License-Identifier: MPL-2.0
//! Tunable defaults for capture, export and sampling, loadable from TOML.
//!
//! Every section and field is optional; anything missing falls back to the
//! values in [`defaults`].
//!
//! # Examples
//!
//! ```
//! use frame_capture::config;
//!
//! let config = config::from_toml_str(
//!     r#"
//!     [batch]
//!     count = 10
//!     interval_ms = 250
//!
//!     [export]
//!     fps = 12
//!     "#,
//! )
//! .expect("valid config");
//!
//! assert_eq!(config.batch.count.value(), 10);
//! assert_eq!(config.export.fps.value(), 12);
//! assert_eq!(config.export.output_width.value(), 640);
//! ```

pub mod defaults;

use crate::animation::quantize::clamp_sample_factor;
use crate::domain::media::FilterState;
use crate::domain::video::{
    BatchConfig, Fps, GifExportConfig, GifSource, OutputWidth, PalettePolicy,
};
use crate::error::Result;
use crate::video_player::SamplerTiming;
use defaults::{
    DEFAULT_QUANTIZER_SAMPLE_FACTOR, DEFAULT_REFRESH_INTERVAL_MS, DEFAULT_SEEK_TIMEOUT_MS,
    DEFAULT_SETTLE_TICKS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Crate-wide configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial live filter.
    pub filter: FilterState,
    /// Initial batch capture cadence.
    pub batch: BatchConfig,
    /// Export panel defaults.
    pub export: ExportConfig,
    /// Seek and settle timing.
    pub sampler: SamplerConfig,
}

/// Default GIF export settings; the source is chosen per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub fps: Fps,
    pub output_width: OutputWidth,
    pub apply_filters: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub palette: PalettePolicy,
    /// NeuQuant sampling factor (1 = best, 30 = fastest).
    pub sample_factor: i32,
}

impl ExportConfig {
    /// Builds an export request from these defaults.
    #[must_use]
    pub fn request(&self, source: GifSource) -> GifExportConfig {
        GifExportConfig {
            source,
            fps: self.fps,
            output_width: self.output_width,
            apply_filters: self.apply_filters,
            looping: self.looping,
            palette: self.palette,
        }
    }

    /// Sampling factor clamped to the range NeuQuant accepts.
    #[must_use]
    pub fn quantizer_sample_factor(&self) -> i32 {
        clamp_sample_factor(self.sample_factor)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        let request = GifExportConfig::default();
        Self {
            fps: request.fps,
            output_width: request.output_width,
            apply_filters: request.apply_filters,
            looping: request.looping,
            palette: request.palette,
            sample_factor: DEFAULT_QUANTIZER_SAMPLE_FACTOR,
        }
    }
}

/// Sampler timing in milliseconds. The refresh interval and settle ticks
/// are floored at one so every capture waits at least one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub seek_timeout_ms: u64,
    pub refresh_interval_ms: u64,
    pub settle_ticks: u32,
}

impl SamplerConfig {
    #[must_use]
    pub fn timing(&self) -> SamplerTiming {
        SamplerTiming {
            seek_timeout: Duration::from_millis(self.seek_timeout_ms),
            refresh_interval: Duration::from_millis(self.refresh_interval_ms.max(1)),
            settle_ticks: self.settle_ticks.max(1),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            seek_timeout_ms: DEFAULT_SEEK_TIMEOUT_MS,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            settle_ticks: DEFAULT_SETTLE_TICKS,
        }
    }
}

/// Parses a TOML document.
///
/// # Errors
///
/// Returns [`Error::Config`](crate::error::Error::Config) on malformed TOML
/// or mistyped fields.
pub fn from_toml_str(text: &str) -> Result<Config> {
    Ok(toml::from_str(text)?)
}

/// Reads and parses a TOML file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a config error if it
/// cannot be parsed.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    from_toml_str(&content)
}

/// Loads `path` if it exists, falling back to defaults on any problem.
#[must_use]
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    load_from_path(path).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
        Config::default()
    })
}
