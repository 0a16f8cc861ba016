// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects and pure business rules.
//!
//! Types here validate themselves on construction so the sampler, editor and
//! encoder never see out-of-range values.
//!
//! # Modules
//!
//! - [`editing`]: Editor types ([`AdjustmentPercent`](editing::AdjustmentPercent),
//!   [`PenSize`](editing::PenSize), [`ZoomScale`](editing::ZoomScale))
//! - [`media`]: Live filter snapshot ([`FilterState`](media::FilterState))
//! - [`video`]: Playback and capture requests ([`PlaybackSpeed`](video::PlaybackSpeed),
//!   [`BatchConfig`](video::BatchConfig), [`GifExportConfig`](video::GifExportConfig))
//!   and timestamp planning

pub mod editing;
pub mod media;
pub mod video;
