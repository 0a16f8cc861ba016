// SPDX-License-Identifier: MPL-2.0
//! Media element adapters and the frame sampler that drives them.
//!
//! - [`sampler`]: deterministic seek-and-read over any [`MediaElement`]
//! - [`memory`]: element over decoded frames (animated GIF/WebP, tests)
//! - `ffmpeg`: element decoding video files (feature `ffmpeg`)
//!
//! [`MediaElement`]: crate::application::port::MediaElement

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod memory;
pub mod sampler;

#[cfg(feature = "ffmpeg")]
pub use ffmpeg::{FfmpegElement, VideoInfo};
pub use memory::{MemoryClip, SeekBehavior};
pub use sampler::{
    Batch, BatchEnd, CancelFlag, FrameSampler, SampleOptions, SampledFrame, SamplerTiming,
};
