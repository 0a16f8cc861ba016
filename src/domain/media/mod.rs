// SPDX-License-Identifier: MPL-2.0
//! Media domain types.
//!
//! - [`FilterState`]: Live preview filter snapshot shared by preview and capture

pub mod filter;

pub use filter::{FilterState, HueDegrees, SaturatePercent, TonePercent};
