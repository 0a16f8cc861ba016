// SPDX-License-Identifier: MPL-2.0
//! Media element port definition.
//!
//! This module defines the [`MediaElement`] trait: the playable source the
//! frame sampler and capture orchestrator drive. Adapters (in-memory clips,
//! the `FFmpeg` decoder) implement it.
//!
//! # Design Notes
//!
//! - Seeking is **asynchronous**: [`MediaElement::seek`] returns at once with a
//!   [`SeekSignal`] that fires when the requested frame is presented
//! - Reading [`MediaElement::current_frame`] before the signal fires may yield
//!   the frame from before the seek
//! - A dropped signal sender means the seek was abandoned

use crate::domain::video::PlaybackSpeed;
use crate::media::Bitmap;
use tokio::sync::oneshot;

/// Completion signal for one seek request.
pub type SeekSignal = oneshot::Receiver<()>;

/// Creates a signal pair. Adapters keep the sender and fire it once the
/// target frame is presented.
#[must_use]
pub fn seek_signal() -> (oneshot::Sender<()>, SeekSignal) {
    oneshot::channel()
}

// =============================================================================
// MediaElement Trait
// =============================================================================

/// Port for a playable video source.
///
/// # Lifecycle
///
/// 1. The host builds an adapter and hands it to the capture session
/// 2. User controls call `play`/`pause`/`set_playback_rate`/`seek`
/// 3. Captures pause the element, seek, await the signal and read
///    `current_frame`, then restore position and paused state
///
/// # Example
///
/// ```ignore
/// async fn grab(element: &mut impl MediaElement, t: f64) -> Option<Bitmap> {
///     element.pause();
///     element.seek(t).await.ok()?;
///     element.current_frame()
/// }
/// ```
pub trait MediaElement: Send + 'static {
    /// Intrinsic frame size, `None` while nothing is loaded.
    fn video_size(&self) -> Option<(u32, u32)>;

    /// Duration in seconds, `None` while unknown.
    ///
    /// Adapters may also report non-finite or zero values while metadata is
    /// loading; callers filter those out.
    fn duration(&self) -> Option<f64>;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    fn is_paused(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn playback_rate(&self) -> PlaybackSpeed;

    fn set_playback_rate(&mut self, speed: PlaybackSpeed);

    /// Requests a seek to `target_secs` and returns its completion signal.
    ///
    /// The position reported by [`MediaElement::current_time`] changes at
    /// once; the presented frame changes when the signal fires.
    fn seek(&mut self, target_secs: f64) -> SeekSignal;

    /// Snapshot of the presented frame at intrinsic resolution.
    fn current_frame(&self) -> Option<Bitmap>;
}

impl<T: MediaElement + ?Sized> MediaElement for Box<T> {
    fn video_size(&self) -> Option<(u32, u32)> {
        (**self).video_size()
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn playback_rate(&self) -> PlaybackSpeed {
        (**self).playback_rate()
    }

    fn set_playback_rate(&mut self, speed: PlaybackSpeed) {
        (**self).set_playback_rate(speed);
    }

    fn seek(&mut self, target_secs: f64) -> SeekSignal {
        (**self).seek(target_secs)
    }

    fn current_frame(&self) -> Option<Bitmap> {
        (**self).current_frame()
    }
}
