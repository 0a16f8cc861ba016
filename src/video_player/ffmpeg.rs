// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg`-backed media element.
//!
//! Decoding runs on a blocking Tokio thread (`FFmpeg` contexts are not `Send`).
//! The element talks to it through a command channel and reads the presented
//! frame from a `watch` channel, so `current_frame` never blocks.

use crate::application::port::{seek_signal, MediaElement, SeekSignal};
use crate::domain::video::{clamp_seek_target, PlaybackSpeed};
use crate::error::{Error, Result, VideoError};
use crate::media::Bitmap;
use std::path::Path;
use std::sync::Once;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot, watch};

static FFMPEG_INIT: Once = Once::new();

/// `FFmpeg` seek timestamps are expressed in `AV_TIME_BASE` units.
const AV_TIME_BASE_F64: f64 = 1_000_000.0;

/// Initialize `FFmpeg` once, with its log level lowered to errors.
///
/// # Errors
///
/// Returns an error if `FFmpeg` fails to initialize.
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(Error::Io(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Container metadata read at open time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
    pub fps: f64,
}

/// Frame currently shown by the decoder task.
#[derive(Debug, Clone, Default)]
struct Presented {
    pts_secs: f64,
    frame: Option<Bitmap>,
}

#[derive(Debug)]
enum Command {
    Play,
    Pause,
    SetRate(f64),
    Seek {
        target_secs: f64,
        done: oneshot::Sender<()>,
    },
    Stop,
}

/// Media element decoding a video file with `FFmpeg`.
#[derive(Debug)]
pub struct FfmpegElement {
    info: VideoInfo,
    command_tx: mpsc::UnboundedSender<Command>,
    presented_rx: watch::Receiver<Presented>,
    /// Last requested position; playback position comes from `presented_rx`.
    seek_position: f64,
    paused: bool,
    rate: PlaybackSpeed,
}

impl FfmpegElement {
    /// Opens `path` and starts the decoder task, paused on the first frame.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a video error if the file cannot be opened or has no
    /// decodable video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(Error::Io(format!("Video file not found: {}", path.display())));
        }
        let info = read_video_info(&path)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (presented_tx, presented_rx) = watch::channel(Presented::default());

        tokio::task::spawn_blocking(move || {
            if let Err(e) = decoder_loop_blocking(&path, command_rx, &presented_tx) {
                tracing::warn!(error = %e, "decoder task failed");
            }
        });

        let mut element = Self {
            info,
            command_tx,
            presented_rx,
            seek_position: 0.0,
            paused: true,
            rate: PlaybackSpeed::default(),
        };
        // Present the first frame; completion is observed by the first capture.
        drop(element.seek(0.0));
        Ok(element)
    }

    #[must_use]
    pub fn info(&self) -> VideoInfo {
        self.info
    }

    fn send(&self, command: Command) {
        if self.command_tx.send(command).is_err() {
            tracing::warn!("decoder task is not running");
        }
    }
}

impl Drop for FfmpegElement {
    fn drop(&mut self) {
        let _ = self.command_tx.send(Command::Stop);
    }
}

impl MediaElement for FfmpegElement {
    fn video_size(&self) -> Option<(u32, u32)> {
        Some((self.info.width, self.info.height))
    }

    fn duration(&self) -> Option<f64> {
        Some(self.info.duration_secs)
    }

    fn current_time(&self) -> f64 {
        if self.paused {
            self.seek_position
        } else {
            self.presented_rx.borrow().pts_secs
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        self.paused = false;
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        if !self.paused {
            self.seek_position = self.presented_rx.borrow().pts_secs;
        }
        self.paused = true;
        self.send(Command::Pause);
    }

    fn playback_rate(&self) -> PlaybackSpeed {
        self.rate
    }

    fn set_playback_rate(&mut self, speed: PlaybackSpeed) {
        self.rate = speed;
        self.send(Command::SetRate(speed.value()));
    }

    fn seek(&mut self, target_secs: f64) -> SeekSignal {
        let (done, signal) = seek_signal();
        let target_secs = clamp_seek_target(target_secs, self.duration());
        self.seek_position = target_secs;
        self.send(Command::Seek { target_secs, done });
        signal
    }

    fn current_frame(&self) -> Option<Bitmap> {
        self.presented_rx.borrow().frame.clone()
    }
}

// =============================================================================
// Decoder task
// =============================================================================

fn open_err(context: &str, e: &ffmpeg_next::Error) -> Error {
    Error::Video(VideoError::from_message(&format!("{context}: {e}")))
}

fn read_video_info(path: &Path) -> Result<VideoInfo> {
    init_ffmpeg()?;
    let ictx = ffmpeg_next::format::input(path).map_err(|e| open_err("Failed to open video", &e))?;
    let stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or(Error::Video(VideoError::NoVideoStream))?;
    let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
        .and_then(|c| c.decoder().video())
        .map_err(|e| open_err("Failed to create video decoder", &e))?;

    let (width, height) = (decoder.width(), decoder.height());
    if width == 0 || height == 0 {
        return Err(Error::Video(VideoError::UnsupportedFormat));
    }

    // Durations are bounded by i64 PTS; precision loss is irrelevant here.
    #[allow(clippy::cast_precision_loss)]
    let duration_secs = if stream.duration() > 0 {
        let tb = stream.time_base();
        stream.duration() as f64 * f64::from(tb.numerator()) / f64::from(tb.denominator())
    } else if ictx.duration() > 0 {
        ictx.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        0.0
    };
    let rate = stream.avg_frame_rate();
    let fps = if rate.denominator() == 0 {
        0.0
    } else {
        f64::from(rate.numerator()) / f64::from(rate.denominator())
    };

    Ok(VideoInfo {
        width,
        height,
        duration_secs,
        fps,
    })
}

struct DecodeContext {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    time_base: f64,
}

impl DecodeContext {
    fn open(path: &Path) -> Result<Self> {
        init_ffmpeg()?;
        let ictx =
            ffmpeg_next::format::input(&path).map_err(|e| open_err("Failed to open video", &e))?;
        let input = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(Error::Video(VideoError::NoVideoStream))?;
        let stream_index = input.index();
        let tb = input.time_base();
        let time_base = f64::from(tb.numerator()) / f64::from(tb.denominator());

        let decoder = ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
            .and_then(|c| c.decoder().video())
            .map_err(|e| open_err("Failed to create video decoder", &e))?;
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg_next::format::Pixel::RGBA,
            decoder.width(),
            decoder.height(),
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| open_err("Failed to create scaler", &e))?;

        Ok(Self {
            ictx,
            decoder,
            scaler,
            stream_index,
            time_base,
        })
    }

    /// Decodes the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<(f64, Bitmap)>> {
        let mut decoded = ffmpeg_next::frame::Video::empty();
        let stream_index = self.stream_index;
        for (stream, packet) in self.ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            if let Err(e) = self.decoder.send_packet(&packet) {
                tracing::debug!(error = %e, "packet send failed");
                continue;
            }
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                let mut rgba = ffmpeg_next::frame::Video::empty();
                self.scaler
                    .run(&decoded, &mut rgba)
                    .map_err(|e| Error::Video(VideoError::DecodingFailed(e.to_string())))?;
                // PTS values fit comfortably in f64 for any real video.
                #[allow(clippy::cast_precision_loss)]
                let pts_secs = decoded
                    .timestamp()
                    .map_or(0.0, |pts| pts as f64 * self.time_base);
                let bitmap = Bitmap::from_rgba(rgba.width(), rgba.height(), extract_rgba_data(&rgba))?;
                return Ok(Some((pts_secs, bitmap)));
            }
        }
        Ok(None)
    }

    /// Seeks to the keyframe before `target_secs`, then decodes forward to
    /// the last frame not after the target.
    fn seek_accurate(&mut self, target_secs: f64) -> Result<Option<(f64, Bitmap)>> {
        // Bounded by the clamped target; fits in i64 microseconds.
        #[allow(clippy::cast_possible_truncation)]
        let timestamp = (target_secs * AV_TIME_BASE_F64) as i64;
        self.ictx
            .seek(timestamp, ..timestamp)
            .map_err(|e| Error::Video(VideoError::DecodingFailed(format!("Seek failed: {e}"))))?;
        self.decoder.flush();

        let mut best = None;
        while let Some((pts, frame)) = self.next_frame()? {
            if pts > target_secs + 1e-6 && best.is_some() {
                break;
            }
            best = Some((pts, frame));
            if pts >= target_secs {
                break;
            }
        }
        Ok(best)
    }
}

fn decoder_loop_blocking(
    path: &Path,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    presented_tx: &watch::Sender<Presented>,
) -> Result<()> {
    let mut ctx = DecodeContext::open(path)?;

    let mut is_playing = false;
    let mut rate = 1.0_f64;
    let mut playback_start: Option<(Instant, f64)> = None;
    let mut current_pts = 0.0_f64;

    loop {
        let command = if is_playing {
            match command_rx.try_recv() {
                Ok(command) => Some(command),
                Err(mpsc::error::TryRecvError::Empty) => None,
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        } else {
            match command_rx.blocking_recv() {
                Some(command) => Some(command),
                None => break,
            }
        };

        match command {
            Some(Command::Play) => {
                is_playing = true;
                playback_start = None;
            }
            Some(Command::Pause) => {
                is_playing = false;
                playback_start = None;
            }
            Some(Command::SetRate(value)) => {
                rate = value;
                playback_start = None;
            }
            Some(Command::Seek { target_secs, done }) => {
                match ctx.seek_accurate(target_secs) {
                    Ok(Some((pts, frame))) => {
                        current_pts = pts;
                        presented_tx.send_replace(Presented {
                            pts_secs: pts,
                            frame: Some(frame),
                        });
                        let _ = done.send(());
                    }
                    Ok(None) => {
                        tracing::warn!(target_secs, "seek reached end of stream");
                        let _ = done.send(());
                    }
                    // Dropping `done` reports the seek as abandoned.
                    Err(e) => tracing::warn!(target_secs, error = %e, "seek failed"),
                }
                playback_start = None;
            }
            Some(Command::Stop) => break,
            None => {}
        }

        if !is_playing {
            continue;
        }

        match ctx.next_frame()? {
            Some((pts, frame)) => {
                let (start, first_pts) = *playback_start.get_or_insert((Instant::now(), pts));
                let due = (pts - first_pts).max(0.0) / rate.max(f64::EPSILON);
                let target = start + std::time::Duration::from_secs_f64(due);
                let now = Instant::now();
                if target > now {
                    std::thread::sleep(target - now);
                }
                current_pts = pts;
                presented_tx.send_replace(Presented {
                    pts_secs: pts,
                    frame: Some(frame),
                });
            }
            None => {
                tracing::debug!(pts_secs = current_pts, "end of stream");
                is_playing = false;
                playback_start = None;
            }
        }
    }

    Ok(())
}

/// Extracts RGBA data from a decoded frame, handling stride correctly.
fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba_bytes = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row_start = y * stride;
        rgba_bytes.extend_from_slice(&data[row_start..row_start + width * 4]);
    }
    rgba_bytes
}
