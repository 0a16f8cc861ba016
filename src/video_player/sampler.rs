// SPDX-License-Identifier: MPL-2.0
//! Deterministic frame sampling on top of an asynchronously seeking element.
//!
//! A sampling run pauses the element, then for each target: seeks, awaits the
//! element's seek-complete signal (bounded by a timeout), waits a few refresh
//! ticks so the decoded frame is presented, and copies the frame with the
//! requested filter applied. Afterwards the element is returned to the
//! position and paused state it had before the run, whatever the outcome.

use crate::application::port::MediaElement;
use crate::config::defaults::{
    DEFAULT_REFRESH_INTERVAL_MS, DEFAULT_SEEK_TIMEOUT_MS, DEFAULT_SETTLE_TICKS,
};
use crate::domain::media::FilterState;
use crate::domain::video::{clamp_seek_target, OutputWidth};
use crate::error::{Error, Result, VideoError};
use crate::media::{apply_filter, image_transform, Bitmap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Timing & Options
// =============================================================================

/// Waits applied around every seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerTiming {
    /// Longest wait for the seek-complete signal.
    pub seek_timeout: Duration,
    /// Length of one display refresh.
    pub refresh_interval: Duration,
    /// Refresh intervals to wait after the signal before reading pixels.
    pub settle_ticks: u32,
}

impl SamplerTiming {
    fn settle_delay(&self) -> Duration {
        self.refresh_interval.max(Duration::from_millis(1)) * self.settle_ticks.max(1)
    }
}

impl Default for SamplerTiming {
    fn default() -> Self {
        Self {
            seek_timeout: Duration::from_millis(DEFAULT_SEEK_TIMEOUT_MS),
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MS),
            settle_ticks: DEFAULT_SETTLE_TICKS,
        }
    }
}

/// How each sampled frame is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleOptions {
    /// Filter baked into the copied pixels.
    pub filter: FilterState,
    /// Resample to this width, keeping aspect. `None` keeps intrinsic size.
    pub output_width: Option<OutputWidth>,
}

impl SampleOptions {
    #[must_use]
    pub fn with_filter(filter: FilterState) -> Self {
        Self {
            filter,
            output_width: None,
        }
    }
}

/// Shared cancellation flag checked between frames.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears a previous cancellation before a new run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Results
// =============================================================================

/// One sampled frame and the video time it was taken at.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame {
    pub time_secs: f64,
    pub bitmap: Bitmap,
}

/// Why a multi-frame run stopped.
#[derive(Debug, Clone)]
pub enum BatchEnd {
    /// Every requested frame was produced.
    Completed,
    /// Every planned frame was produced but the plan was cut at the duration.
    TruncatedAtDuration,
    /// The cancel flag was raised between frames.
    Cancelled,
    /// A frame failed; frames before it are kept.
    Failed(Error),
}

impl BatchEnd {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, BatchEnd::Failed(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            BatchEnd::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Items produced by a multi-frame run plus how it ended.
///
/// Partial results survive failure and cancellation.
#[derive(Debug, Clone)]
pub struct Batch<T> {
    pub items: Vec<T>,
    pub end: BatchEnd,
}

impl<T> Batch<T> {
    #[must_use]
    pub fn failed(err: Error) -> Self {
        Self {
            items: Vec::new(),
            end: BatchEnd::Failed(err),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts to a plain result, dropping partial items on failure.
    ///
    /// # Errors
    ///
    /// Returns the error carried by [`BatchEnd::Failed`].
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.end {
            BatchEnd::Failed(err) => Err(err),
            _ => Ok(self.items),
        }
    }
}

// =============================================================================
// FrameSampler
// =============================================================================

/// Produces bitmaps for target timestamps from a [`MediaElement`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSampler {
    timing: SamplerTiming,
}

impl FrameSampler {
    #[must_use]
    pub fn new(timing: SamplerTiming) -> Self {
        Self { timing }
    }

    #[must_use]
    pub fn timing(&self) -> SamplerTiming {
        self.timing
    }

    /// Copies the currently presented frame without seeking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSourceLoaded`] when the element has no frame.
    pub fn capture_current<M: MediaElement>(
        &self,
        element: &M,
        options: &SampleOptions,
    ) -> Result<SampledFrame> {
        ensure_loaded(element)?;
        let bitmap = element.current_frame().ok_or(Error::NoSourceLoaded)?;
        Ok(SampledFrame {
            time_secs: element.current_time(),
            bitmap: render(&bitmap, options),
        })
    }

    /// Samples one frame at `target_secs` and restores the element afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSourceLoaded`], [`Error::SeekTimeout`] or a
    /// [`VideoError::SeekAbandoned`] video error.
    pub async fn sample_at<M: MediaElement>(
        &self,
        element: &mut M,
        target_secs: f64,
        options: &SampleOptions,
    ) -> Result<SampledFrame> {
        let batch = self
            .sample_range(element, &[target_secs], options, &CancelFlag::new())
            .await;
        let mut items = batch.into_result()?;
        items.pop().ok_or(Error::NoFramesSelected)
    }

    /// Samples each target in order and restores the element afterwards.
    ///
    /// Stops at the first failure or when `cancel` is raised, keeping the
    /// frames produced so far.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = timestamps.len()))]
    pub async fn sample_range<M: MediaElement>(
        &self,
        element: &mut M,
        timestamps: &[f64],
        options: &SampleOptions,
        cancel: &CancelFlag,
    ) -> Batch<SampledFrame> {
        if let Err(err) = ensure_loaded(element) {
            return Batch::failed(err);
        }

        let original_time = element.current_time();
        let was_paused = element.is_paused();
        element.pause();

        let mut items = Vec::with_capacity(timestamps.len());
        let mut end = BatchEnd::Completed;

        for &target in timestamps {
            if cancel.is_cancelled() {
                tracing::debug!(sampled = items.len(), "sampling cancelled");
                end = BatchEnd::Cancelled;
                break;
            }
            match self.sample_one(element, target, options).await {
                Ok(frame) => items.push(frame),
                Err(err) => {
                    tracing::warn!(target_secs = target, error = %err, "sampling failed");
                    end = BatchEnd::Failed(err);
                    break;
                }
            }
        }

        self.restore(element, original_time, was_paused).await;
        Batch { items, end }
    }

    async fn sample_one<M: MediaElement>(
        &self,
        element: &mut M,
        target_secs: f64,
        options: &SampleOptions,
    ) -> Result<SampledFrame> {
        let target = clamp_seek_target(target_secs, element.duration());
        self.seek_and_wait(element, target).await?;
        tokio::time::sleep(self.timing.settle_delay()).await;

        let bitmap = element.current_frame().ok_or(Error::NoSourceLoaded)?;
        Ok(SampledFrame {
            time_secs: target,
            bitmap: render(&bitmap, options),
        })
    }

    async fn seek_and_wait<M: MediaElement>(&self, element: &mut M, target: f64) -> Result<()> {
        tracing::debug!(target_secs = target, "seeking");
        let signal = element.seek(target);
        match tokio::time::timeout(self.timing.seek_timeout, signal).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(Error::Video(VideoError::SeekAbandoned)),
            Err(_) => Err(Error::SeekTimeout {
                target_secs: target,
                waited: self.timing.seek_timeout,
            }),
        }
    }

    async fn restore<M: MediaElement>(&self, element: &mut M, time_secs: f64, was_paused: bool) {
        if let Err(err) = self.seek_and_wait(element, time_secs).await {
            tracing::warn!(time_secs, error = %err, "failed to restore playback position");
        }
        if !was_paused {
            element.play();
        }
    }
}

fn ensure_loaded<M: MediaElement>(element: &M) -> Result<()> {
    match element.video_size() {
        Some((w, h)) if w > 0 && h > 0 => Ok(()),
        _ => Err(Error::NoSourceLoaded),
    }
}

fn render(bitmap: &Bitmap, options: &SampleOptions) -> Bitmap {
    let filtered = apply_filter(bitmap, &options.filter);
    match options.output_width {
        Some(width) => image_transform::resize_to_width(&filtered, width),
        None => filtered,
    }
}
