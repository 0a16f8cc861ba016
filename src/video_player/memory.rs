// SPDX-License-Identifier: MPL-2.0
//! In-memory media element backed by a decoded frame sequence.
//!
//! `MemoryClip` plays a list of timed bitmaps. It is the element used for
//! animated GIF/WebP sources and for deterministic tests: seek completion can
//! be immediate, delayed, stalled or abandoned to exercise every path of the
//! frame sampler.

use crate::application::port::{seek_signal, MediaElement, SeekSignal};
use crate::domain::video::{clamp_seek_target, PlaybackSpeed};
use crate::error::{Error, Result};
use crate::media::Bitmap;
use image_rs::codecs::gif::GifDecoder;
use image_rs::codecs::webp::WebPDecoder;
use image_rs::{AnimationDecoder, Frames, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Frame delay used when an animation frame declares none.
const FALLBACK_FRAME_DELAY_SECS: f64 = 0.1;

/// How the clip completes seek requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekBehavior {
    /// Present the target frame and fire the signal during `seek`.
    #[default]
    Immediate,
    /// Present the target frame and fire the signal after a delay.
    Delayed(Duration),
    /// Never present the target; the signal stays pending forever.
    Stalled,
    /// Drop the signal sender without firing it.
    Abandoned,
}

/// Presentation time shared with delayed seek tasks.
#[derive(Debug, Clone, Default)]
struct PresentedTime(Arc<AtomicU64>);

impl PresentedTime {
    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, secs: f64) {
        self.0.store(secs.to_bits(), Ordering::SeqCst);
    }
}

/// Media element over decoded frames.
#[derive(Debug)]
pub struct MemoryClip {
    /// `(start_secs, frame)` sorted by start time.
    frames: Vec<(f64, Bitmap)>,
    duration: Option<f64>,
    position: f64,
    presented: PresentedTime,
    paused: bool,
    rate: PlaybackSpeed,
    behavior: SeekBehavior,
    /// Behavior switch after the given number of further seeks.
    pending_behavior: Option<(u32, SeekBehavior)>,
    /// Senders of stalled seeks, kept so their signals never resolve.
    /// Entries whose receiver is gone are dropped on the next seek.
    stalled: Vec<oneshot::Sender<()>>,
    seek_count: u32,
}

impl MemoryClip {
    /// A clip with nothing loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            frames: Vec::new(),
            duration: None,
            position: 0.0,
            presented: PresentedTime::default(),
            paused: true,
            rate: PlaybackSpeed::default(),
            behavior: SeekBehavior::default(),
            pending_behavior: None,
            stalled: Vec::new(),
            seek_count: 0,
        }
    }

    /// Builds a clip from evenly spaced frames.
    ///
    /// # Errors
    ///
    /// Returns an error if `frames` is empty, `fps` is not positive, or the
    /// frames differ in size.
    pub fn from_frames(frames: Vec<Bitmap>, fps: f64) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(Error::Io(format!("Invalid clip frame rate: {fps}")));
        }
        let step = 1.0 / fps;
        let count = frames.len();
        let timed = frames
            .into_iter()
            .enumerate()
            .map(|(i, frame)| (index_secs(i, step), frame))
            .collect();
        Self::from_timed_frames(timed, index_secs(count, step))
    }

    /// Builds a clip from frames with explicit start times.
    ///
    /// # Errors
    ///
    /// Returns an error if `frames` is empty or the frames differ in size.
    pub fn from_timed_frames(mut frames: Vec<(f64, Bitmap)>, duration_secs: f64) -> Result<Self> {
        let Some((_, first)) = frames.first() else {
            return Err(Error::Io("Clip has no frames".to_string()));
        };
        let size = first.dimensions();
        if let Some((_, odd)) = frames.iter().find(|(_, f)| f.dimensions() != size) {
            return Err(Error::DimensionMismatch {
                expected: size,
                actual: odd.dimensions(),
            });
        }
        frames.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut clip = Self::empty();
        clip.frames = frames;
        clip.duration = Some(duration_secs);
        Ok(clip)
    }

    /// Decodes an animated GIF or WebP held in memory.
    ///
    /// Frame start times accumulate the per-frame delays. A still image
    /// becomes a one-frame clip.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is not GIF/WebP or decoding fails.
    pub fn from_animation_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image_rs::guess_format(bytes)?;
        let frames: Frames<'_> = match format {
            ImageFormat::Gif => GifDecoder::new(Cursor::new(bytes))?.into_frames(),
            ImageFormat::WebP => {
                let decoder = WebPDecoder::new(Cursor::new(bytes))?;
                if !decoder.has_animation() {
                    let still = Bitmap::decode(bytes)?;
                    return Self::from_timed_frames(vec![(0.0, still)], FALLBACK_FRAME_DELAY_SECS);
                }
                decoder.into_frames()
            }
            other => {
                return Err(Error::Io(format!(
                    "Unsupported animation format: {other:?}"
                )))
            }
        };

        let mut timed = Vec::new();
        let mut start = 0.0;
        for frame in frames {
            let frame = frame?;
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_secs = if numer == 0 || denom == 0 {
                FALLBACK_FRAME_DELAY_SECS
            } else {
                f64::from(numer) / f64::from(denom) / 1000.0
            };
            timed.push((start, Bitmap::from_rgba_image(frame.into_buffer())));
            start += delay_secs;
        }

        tracing::debug!(frames = timed.len(), duration_secs = start, "decoded animation");
        Self::from_timed_frames(timed, start)
    }

    /// Reads and decodes an animated GIF or WebP file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_animation_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_animation_bytes(&bytes)
    }

    /// Frame shown at `time_secs`.
    #[must_use]
    pub fn frame_at(&self, time_secs: f64) -> Option<&Bitmap> {
        let idx = self.frames.partition_point(|(start, _)| *start <= time_secs);
        self.frames
            .get(idx.saturating_sub(1))
            .map(|(_, frame)| frame)
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Moves the playhead and presents that frame without a seek signal.
    pub fn set_position(&mut self, time_secs: f64) {
        self.position = clamp_seek_target(time_secs, self.duration);
        self.presented.set(self.position);
    }

    /// Advances the playhead by `elapsed` wall time when playing.
    ///
    /// Playback stops at the end of the clip.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.paused {
            return;
        }
        let next = self.position + elapsed.as_secs_f64() * self.rate.value();
        if let Some(duration) = self.duration.filter(|d| next >= *d) {
            self.set_position(duration);
            self.paused = true;
        } else {
            self.set_position(next);
        }
    }

    pub fn set_seek_behavior(&mut self, behavior: SeekBehavior) {
        self.behavior = behavior;
        self.pending_behavior = None;
    }

    /// Switches to `behavior` once `seeks` more seeks have completed.
    pub fn set_seek_behavior_after(&mut self, seeks: u32, behavior: SeekBehavior) {
        self.pending_behavior = Some((seeks, behavior));
    }

    /// Number of seeks requested so far.
    #[must_use]
    pub fn seek_count(&self) -> u32 {
        self.seek_count
    }

    fn next_behavior(&mut self) -> SeekBehavior {
        if let Some((remaining, behavior)) = self.pending_behavior {
            if remaining == 0 {
                self.behavior = behavior;
                self.pending_behavior = None;
            } else {
                self.pending_behavior = Some((remaining - 1, behavior));
            }
        }
        self.behavior
    }
}

impl Default for MemoryClip {
    fn default() -> Self {
        Self::empty()
    }
}

impl MediaElement for MemoryClip {
    fn video_size(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|(_, frame)| frame.dimensions())
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn playback_rate(&self) -> PlaybackSpeed {
        self.rate
    }

    fn set_playback_rate(&mut self, speed: PlaybackSpeed) {
        self.rate = speed;
    }

    fn seek(&mut self, target_secs: f64) -> SeekSignal {
        self.stalled.retain(|tx| !tx.is_closed());
        let (tx, rx) = seek_signal();
        let target = clamp_seek_target(target_secs, self.duration);
        self.position = target;
        self.seek_count += 1;

        match self.next_behavior() {
            SeekBehavior::Immediate => {
                self.presented.set(target);
                let _ = tx.send(());
            }
            SeekBehavior::Delayed(delay) => {
                let presented = self.presented.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    presented.set(target);
                    let _ = tx.send(());
                });
            }
            SeekBehavior::Stalled => self.stalled.push(tx),
            SeekBehavior::Abandoned => drop(tx),
        }
        rx
    }

    fn current_frame(&self) -> Option<Bitmap> {
        self.frame_at(self.presented.get()).cloned()
    }
}

fn index_secs(index: usize, step: f64) -> f64 {
    // Frame counts stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let index = index as f64;
    index * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, numbered_clip, solid_bitmap};
    use image_rs::codecs::gif::{GifEncoder, Repeat};
    use image_rs::{Delay, Frame};

    #[test]
    fn frame_lookup_uses_start_times() {
        let clip = numbered_clip(5);
        assert_eq!(clip.frame_at(0.0).and_then(|f| f.pixel(0, 0)), Some([0, 64, 128, 255]));
        assert_eq!(clip.frame_at(2.7).and_then(|f| f.pixel(0, 0)), Some([40, 64, 128, 255]));
        assert_eq!(clip.duration(), Some(5.0));
    }

    #[test]
    fn empty_clip_reports_no_size() {
        let clip = MemoryClip::empty();
        assert!(clip.video_size().is_none());
        assert!(clip.current_frame().is_none());
    }

    #[test]
    fn mismatched_frames_are_rejected() {
        let frames = vec![solid_bitmap(2, 2, [0; 4]), solid_bitmap(3, 2, [0; 4])];
        assert!(matches!(
            MemoryClip::from_frames(frames, 1.0),
            Err(Error::DimensionMismatch {
                expected: (2, 2),
                actual: (3, 2)
            })
        ));
    }

    #[test]
    fn tick_advances_at_playback_rate_and_stops_at_end() {
        let mut clip = numbered_clip(4);
        clip.set_playback_rate(PlaybackSpeed::new(2.0));
        clip.play();
        clip.tick(Duration::from_millis(500));
        assert_abs_diff_eq!(clip.current_time(), 1.0);
        clip.tick(Duration::from_secs(5));
        assert_abs_diff_eq!(clip.current_time(), 4.0);
        assert!(clip.is_paused());
    }

    #[tokio::test]
    async fn immediate_seek_presents_target() {
        let mut clip = numbered_clip(5);
        clip.seek(3.2).await.expect("signal");
        assert_eq!(clip.current_frame().and_then(|f| f.pixel(0, 0)), Some([60, 64, 128, 255]));
        assert_eq!(clip.seek_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_seek_keeps_old_frame_until_signal() {
        let mut clip = numbered_clip(5);
        clip.set_seek_behavior(SeekBehavior::Delayed(Duration::from_millis(100)));
        let signal = clip.seek(4.0);
        assert_abs_diff_eq!(clip.current_time(), 4.0);
        assert_eq!(clip.current_frame().and_then(|f| f.pixel(0, 0)), Some([0, 64, 128, 255]));
        signal.await.expect("signal");
        assert_eq!(clip.current_frame().and_then(|f| f.pixel(0, 0)), Some([80, 64, 128, 255]));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_seeks_are_released_once_abandoned() {
        let mut clip = numbered_clip(10);
        clip.set_seek_behavior(SeekBehavior::Stalled);
        for t in 0..50 {
            drop(clip.seek(f64::from(t % 10)));
        }
        assert_eq!(clip.stalled.len(), 1);

        let pending = clip.seek(3.0);
        drop(clip.seek(4.0));
        let kept = clip.seek(5.0);
        assert_eq!(clip.stalled.len(), 2);

        drop(pending);
        drop(clip.seek(6.0));
        assert_eq!(clip.stalled.len(), 2);
        assert!(tokio::time::timeout(Duration::from_millis(10), kept)
            .await
            .is_err());
    }

    #[test]
    fn decodes_animated_gif_with_delays() {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.set_repeat(Repeat::Infinite).expect("repeat");
            for value in [0u8, 255] {
                let frame = Frame::from_parts(
                    solid_bitmap(3, 2, [value, value, value, 255]).to_rgba_image(),
                    0,
                    0,
                    Delay::from_numer_denom_ms(250, 1),
                );
                encoder.encode_frame(frame).expect("encode frame");
            }
        }

        let clip = MemoryClip::from_animation_bytes(&bytes).expect("decode");
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.video_size(), Some((3, 2)));
        assert_abs_diff_eq!(clip.duration().expect("duration"), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn rejects_non_animation_formats() {
        let png = solid_bitmap(2, 2, [1, 2, 3, 255]).encode_png().expect("png");
        assert!(MemoryClip::from_animation_bytes(&png).is_err());
    }
}
