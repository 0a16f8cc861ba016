// SPDX-License-Identifier: MPL-2.0
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Error {
    /// No media is attached, or the element reports zero intrinsic dimensions.
    NoSourceLoaded,
    /// The element never signalled seek completion within the allowed wait.
    SeekTimeout { target_secs: f64, waited: Duration },
    /// An export was requested with an empty frame list.
    NoFramesSelected,
    /// A crop rectangle normalized to zero area.
    InvalidCropRegion { width: u32, height: u32 },
    /// Any quantization or container serialization fault.
    EncodeFailure(String),
    /// Another capture or export currently owns the media element.
    CaptureBusy,
    /// No gallery shot exists at this index.
    ShotNotFound { index: usize },
    /// A time range with a non-finite bound.
    InvalidRange { start_secs: f64, end_secs: f64 },
    /// A time range that would sample more frames than allowed.
    RangeTooLong { frames: usize, max: usize },
    /// A raster buffer of this size cannot be allocated.
    InvalidDimensions { width: u32, height: u32 },
    /// Two rasters that must match in size do not.
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// The run was cancelled before it produced a result.
    Cancelled,
    Io(String),
    Config(String),
    Video(VideoError),
}

impl Error {
    /// Returns true when the same request can simply be issued again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::SeekTimeout { .. } | Error::CaptureBusy)
    }
}

/// Errors reported by media element implementations.
#[derive(Debug, Clone)]
pub enum VideoError {
    /// File format is not supported (e.g., unknown extension)
    UnsupportedFormat,

    /// Video codec is not supported by the system's FFmpeg
    UnsupportedCodec(String),

    /// File appears corrupted or has invalid data
    CorruptedFile,

    /// File exists but contains no video stream
    NoVideoStream,

    /// The element dropped a pending seek without completing it
    SeekAbandoned,

    /// Decoding failed while producing a frame
    DecodingFailed(String),

    /// Generic error with raw message
    Other(String),
}

impl VideoError {
    /// Attempts to parse a raw decoder message into a specific VideoError type.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return VideoError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no video stream") || msg_lower.contains("no video track") {
            return VideoError::NoVideoStream;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scaling")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        VideoError::Other(msg.to_string())
    }

    fn extract_codec_name(msg: &str) -> Option<String> {
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2",
        ];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::UnsupportedFormat => write!(f, "Unsupported video format"),
            VideoError::UnsupportedCodec(codec) => {
                write!(f, "Unsupported video codec: {}", codec)
            }
            VideoError::CorruptedFile => write!(f, "Video file is corrupted"),
            VideoError::NoVideoStream => write!(f, "No video stream found"),
            VideoError::SeekAbandoned => write!(f, "Seek was abandoned before completing"),
            VideoError::DecodingFailed(msg) => write!(f, "Decoding failed: {}", msg),
            VideoError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSourceLoaded => write!(f, "Load a video first"),
            Error::SeekTimeout { target_secs, waited } => write!(
                f,
                "Seek to {:.2}s did not complete within {} ms",
                target_secs,
                waited.as_millis()
            ),
            Error::NoFramesSelected => write!(f, "No frames selected"),
            Error::InvalidCropRegion { width, height } => {
                write!(f, "Invalid crop region: {}x{}", width, height)
            }
            Error::EncodeFailure(e) => write!(f, "Encode Error: {}", e),
            Error::CaptureBusy => write!(f, "Another capture is already in progress"),
            Error::ShotNotFound { index } => write!(f, "No screenshot at index {}", index),
            Error::InvalidRange {
                start_secs,
                end_secs,
            } => write!(f, "Invalid time range: {} to {}", start_secs, end_secs),
            Error::RangeTooLong { frames, max } => {
                write!(f, "Range needs {} frames, limit is {}", frames, max)
            }
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid raster size: {}x{}", width, height)
            }
            Error::DimensionMismatch { expected, actual } => write!(
                f,
                "Size mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Error::Cancelled => write!(f, "Cancelled"),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Video(e) => write!(f, "Video Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<VideoError> for Error {
    fn from(err: VideoError) -> Self {
        Error::Video(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<gif::EncodingError> for Error {
    fn from(err: gif::EncodingError) -> Self {
        Error::EncodeFailure(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn no_frames_selected_matches_status_text() {
        assert_eq!(Error::NoFramesSelected.to_string(), "No frames selected");
    }

    #[test]
    fn geometry_errors_name_both_sizes() {
        let err = Error::DimensionMismatch {
            expected: (2, 2),
            actual: (3, 2),
        };
        assert_eq!(err.to_string(), "Size mismatch: expected 2x2, got 3x2");
        let err = Error::InvalidDimensions {
            width: 0,
            height: 5,
        };
        assert_eq!(err.to_string(), "Invalid raster size: 0x5");
    }

    #[test]
    fn range_errors_format_bounds() {
        let err = Error::InvalidRange {
            start_secs: 0.0,
            end_secs: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "Invalid time range: 0 to inf");
        let err = Error::RangeTooLong {
            frames: 3601,
            max: 3600,
        };
        assert_eq!(err.to_string(), "Range needs 3601 frames, limit is 3600");
    }

    #[test]
    fn seek_timeout_reports_target_and_wait() {
        let err = Error::SeekTimeout {
            target_secs: 3.5,
            waited: Duration::from_secs(5),
        };
        let text = err.to_string();
        assert!(text.contains("3.50s"));
        assert!(text.contains("5000 ms"));
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(Error::CaptureBusy.is_retryable());
        assert!(Error::SeekTimeout {
            target_secs: 0.0,
            waited: Duration::ZERO
        }
        .is_retryable());
        assert!(!Error::NoFramesSelected.is_retryable());
        assert!(!Error::NoSourceLoaded.is_retryable());
        assert!(!Error::Cancelled.is_retryable());
    }

    #[test]
    fn video_error_from_message_no_stream() {
        let err = VideoError::from_message("No video stream found in file");
        assert!(matches!(err, VideoError::NoVideoStream));
    }

    #[test]
    fn video_error_from_message_codec() {
        let err = VideoError::from_message("Decoder h264 not found");
        assert!(matches!(err, VideoError::UnsupportedCodec(codec) if codec == "H264"));
    }

    #[test]
    fn video_error_from_message_corrupted() {
        let err = VideoError::from_message("File is corrupt or invalid");
        assert!(matches!(err, VideoError::CorruptedFile));
    }

    #[test]
    fn video_error_from_message_decoding() {
        let err = VideoError::from_message("Packet send failed: error");
        assert!(matches!(err, VideoError::DecodingFailed(_)));
    }

    #[test]
    fn video_error_display() {
        let err = VideoError::UnsupportedCodec("H264".to_string());
        assert!(format!("{}", err).contains("H264"));
    }
}
