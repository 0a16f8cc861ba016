// SPDX-License-Identifier: MPL-2.0
//! Palette quantization and animated GIF encoding.
//!
//! [`encode`] turns an ordered list of equally sized bitmaps into GIF bytes.
//! Colors are reduced per frame by default; [`PalettePolicy::Global`]
//! trains one shared table instead.
//!
//! [`PalettePolicy::Global`]: crate::domain::video::PalettePolicy::Global

pub mod encoder;
pub mod quantize;

pub use encoder::{encode, encode_with_progress, EncodedGif, FrameDelay, GifOptions};
pub use quantize::{IndexedFrame, Palette};
