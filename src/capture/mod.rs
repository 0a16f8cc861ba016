// SPDX-License-Identifier: MPL-2.0
//! Capture orchestration: gallery, element lock and GIF export pipeline.
//!
//! - [`session`]: [`CaptureSession`], the entry point hosts drive
//! - [`gallery`]: newest-first shot list with chronological export order
//! - [`lock`]: non-queueing exclusive access to the media element
//! - [`export`]: export status text, artifacts and frame normalization

pub mod export;
pub mod gallery;
pub mod lock;
pub mod session;

pub use export::{normalize_frames, ExportArtifact, ExportStatus};
pub use gallery::{Gallery, Shot};
pub use lock::ElementLock;
pub use session::{CaptureSession, PlaybackState};
