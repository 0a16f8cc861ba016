// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! The capture core only talks to video sources through these traits, so the
//! sampler and orchestrator can be driven by in-memory clips in tests and by
//! the `FFmpeg` adapter in production.
//!
//! # Available Ports
//!
//! - [`media_element`]: playable video source with asynchronous seeking

pub mod media_element;

pub use media_element::{seek_signal, MediaElement, SeekSignal};
