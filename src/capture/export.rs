// SPDX-License-Identifier: MPL-2.0
//! GIF export artifacts, progress status and frame normalization.

use crate::config::defaults::GIF_EXPORT_FILE_NAME;
use crate::domain::video::{Fps, OutputWidth};
use crate::error::{Error, Result};
use crate::media::image_transform::{letterbox, resize_to_width};
use crate::media::Bitmap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fmt;
use std::path::{Path, PathBuf};

/// Progress of the current (or last) export, shown verbatim to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportStatus {
    #[default]
    Idle,
    Preparing,
    Encoding {
        frame: usize,
        total: usize,
    },
    Done {
        frames: usize,
        fps: u32,
    },
    Failed(String),
}

impl ExportStatus {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, ExportStatus::Done { .. } | ExportStatus::Failed(_))
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStatus::Idle => Ok(()),
            ExportStatus::Preparing => write!(f, "Preparing frames…"),
            ExportStatus::Encoding { frame, total } => {
                write!(f, "Encoding frame {}/{}", frame, total)
            }
            ExportStatus::Done { frames, fps } => {
                write!(f, "Done • {} frames @ {} fps", frames, fps)
            }
            ExportStatus::Failed(message) => write!(f, "Error: {}", message),
        }
    }
}

/// A finished export, ready to preview or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub frame_count: usize,
    pub fps: Fps,
}

impl ExportArtifact {
    #[must_use]
    pub fn new(bytes: Vec<u8>, frame_count: usize, fps: Fps) -> Self {
        Self {
            bytes,
            file_name: GIF_EXPORT_FILE_NAME.to_string(),
            frame_count,
            fps,
        }
    }

    /// `data:image/gif;base64,...` URL for an inline preview.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:image/gif;base64,{}", BASE64.encode(&self.bytes))
    }

    /// Writes the GIF into `dir` under [`ExportArtifact::file_name`].
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "saved GIF");
        Ok(path)
    }
}

/// Scales every frame to `width` and pads them to a common height.
///
/// Each frame keeps its own aspect ratio. Frames shorter than the tallest
/// one are centered on black.
///
/// # Errors
///
/// Returns [`Error::EncodeFailure`] before any resizing when a frame would
/// scale taller than a GIF can hold.
pub fn normalize_frames(frames: &[Bitmap], width: OutputWidth) -> Result<Vec<Bitmap>> {
    if let Some(frame) = frames
        .iter()
        .find(|f| width.scaled_height(f.width(), f.height()) > u32::from(u16::MAX))
    {
        return Err(Error::EncodeFailure(format!(
            "Frame size {}x{} exceeds the GIF limit of {}",
            width.value(),
            width.scaled_height(frame.width(), frame.height()),
            u16::MAX
        )));
    }

    let scaled: Vec<Bitmap> = frames
        .iter()
        .map(|frame| resize_to_width(frame, width))
        .collect();
    let Some(height) = scaled.iter().map(Bitmap::height).max() else {
        return Ok(scaled);
    };
    Ok(scaled
        .into_iter()
        .map(|frame| {
            if frame.height() == height {
                frame
            } else {
                letterbox(&frame, width.value(), height)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::solid_bitmap;

    #[test]
    fn status_text_matches_panel_wording() {
        assert_eq!(ExportStatus::Idle.to_string(), "");
        assert_eq!(ExportStatus::Preparing.to_string(), "Preparing frames…");
        assert_eq!(
            ExportStatus::Encoding { frame: 2, total: 5 }.to_string(),
            "Encoding frame 2/5"
        );
        assert_eq!(
            ExportStatus::Done { frames: 5, fps: 8 }.to_string(),
            "Done • 5 frames @ 8 fps"
        );
        assert_eq!(
            ExportStatus::Failed("No frames selected".into()).to_string(),
            "Error: No frames selected"
        );
    }

    #[test]
    fn only_done_and_failed_are_finished() {
        assert!(!ExportStatus::Idle.is_finished());
        assert!(!ExportStatus::Preparing.is_finished());
        assert!(!ExportStatus::Encoding { frame: 1, total: 2 }.is_finished());
        assert!(ExportStatus::Done { frames: 2, fps: 8 }.is_finished());
        assert!(ExportStatus::Failed("x".into()).is_finished());
    }

    #[test]
    fn artifact_uses_fixed_file_name() {
        let artifact = ExportArtifact::new(vec![b'G', b'I', b'F'], 1, Fps::new(8));
        assert_eq!(artifact.file_name, "export.gif");
        assert_eq!(artifact.to_data_url(), "data:image/gif;base64,R0lG");
    }

    #[test]
    fn artifact_saves_into_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let artifact = ExportArtifact::new(vec![1, 2, 3], 1, Fps::default());
        let path = artifact.save_to_dir(dir.path()).expect("save");
        assert_eq!(std::fs::read(path).expect("read"), vec![1, 2, 3]);
    }

    #[test]
    fn normalize_scales_to_output_width() {
        let frames = vec![solid_bitmap(20, 10, [9, 9, 9, 255])];
        let out = normalize_frames(&frames, OutputWidth::new(10)).expect("normalize");
        assert_eq!(out[0].dimensions(), (10, 5));
    }

    #[test]
    fn normalize_letterboxes_differing_aspects() {
        let frames = vec![
            solid_bitmap(20, 10, [200, 200, 200, 255]),
            solid_bitmap(10, 10, [100, 100, 100, 255]),
        ];
        let out = normalize_frames(&frames, OutputWidth::new(10)).expect("normalize");
        assert_eq!(out[0].dimensions(), (10, 10));
        assert_eq!(out[1].dimensions(), (10, 10));
        // Wide frame is 10x5 centered: rows 0..2 and 7..10 are padding.
        assert_eq!(out[0].pixel(5, 0), Some([0, 0, 0, 255]));
        assert_eq!(out[0].pixel(5, 5), Some([200, 200, 200, 255]));
        assert_eq!(out[1].pixel(5, 0), Some([100, 100, 100, 255]));
    }

    #[test]
    fn normalize_empty_is_empty() {
        assert!(normalize_frames(&[], OutputWidth::default())
            .expect("normalize")
            .is_empty());
    }

    #[test]
    fn overly_tall_frames_are_rejected_before_resizing() {
        // 1x300 at width 400 would scale to 400x120000.
        let frames = vec![
            solid_bitmap(4, 4, [0, 0, 0, 255]),
            solid_bitmap(1, 300, [0, 0, 0, 255]),
        ];
        match normalize_frames(&frames, OutputWidth::new(400)) {
            Err(Error::EncodeFailure(msg)) => assert!(msg.contains("400x120000")),
            other => panic!("expected encode failure, got {other:?}"),
        }
        assert!(normalize_frames(&frames[..1], OutputWidth::new(400)).is_ok());
    }
}
