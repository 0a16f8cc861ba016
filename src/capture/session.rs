// SPDX-License-Identifier: MPL-2.0
//! The capture orchestrator.
//!
//! A [`CaptureSession`] owns the loaded media element, the gallery, the live
//! filter and the export status channel. Captures and exports take the
//! element lock for their whole run; playback controls take it briefly. Any
//! call that finds the lock held fails with [`Error::CaptureBusy`] instead of
//! queueing.

use super::export::{normalize_frames, ExportArtifact, ExportStatus};
use super::gallery::{Gallery, Shot};
use super::lock::ElementLock;
use crate::animation::{encode_with_progress, FrameDelay, GifOptions};
use crate::application::port::MediaElement;
use crate::config::Config;
use crate::domain::media::FilterState;
use crate::domain::video::{
    clamp_seek_target, known_duration, plan_batch, plan_range, BatchConfig, Fps,
    GifExportConfig, GifSource, PlaybackSpeed, ShotId,
};
use crate::error::{Error, Result};
use crate::image_editor::EditSession;
use crate::media::{apply_filter, Bitmap};
use crate::video_player::{
    Batch, BatchEnd, CancelFlag, FrameSampler, SampleOptions, SampledFrame,
};
use std::path::{Path, PathBuf};
use tokio::sync::{watch, Mutex};

/// Snapshot of the element's playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    /// Known duration; `None` while the element has not reported one.
    pub duration: Option<f64>,
    pub paused: bool,
    pub speed: PlaybackSpeed,
}

/// Capture, edit and export workflow around one media element.
pub struct CaptureSession<M: MediaElement> {
    element: ElementLock<M>,
    export_lock: Mutex<()>,
    gallery: Gallery,
    filter: FilterState,
    batch: BatchConfig,
    config: Config,
    sampler: FrameSampler,
    status: watch::Sender<ExportStatus>,
    cancel: CancelFlag,
}

impl<M: MediaElement> CaptureSession<M> {
    /// Creates a session around `element` with an empty gallery.
    #[must_use]
    pub fn new(element: M, config: Config) -> Self {
        let (status, _) = watch::channel(ExportStatus::default());
        Self {
            element: ElementLock::new(element),
            export_lock: Mutex::new(()),
            gallery: Gallery::new(),
            filter: config.filter,
            batch: config.batch,
            sampler: FrameSampler::new(config.sampler.timing()),
            config,
            status,
            cancel: CancelFlag::new(),
        }
    }

    /// Replaces the media element and clears the gallery.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] while a capture holds the element.
    pub fn load(&mut self, element: M) -> Result<()> {
        self.element.replace(element)?;
        let dropped = self.gallery.len();
        self.gallery.clear();
        self.cancel.reset();
        self.status.send_replace(ExportStatus::Idle);
        tracing::info!(dropped_shots = dropped, "loaded new media");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the element, for hosts that drive it directly.
    #[must_use]
    pub fn element(&self) -> ElementLock<M> {
        self.element.clone()
    }

    #[must_use]
    pub fn filter(&self) -> FilterState {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn reset_filter(&mut self) {
        self.filter.reset();
    }

    #[must_use]
    pub fn batch_config(&self) -> BatchConfig {
        self.batch
    }

    pub fn set_batch_config(&mut self, batch: BatchConfig) {
        self.batch = batch;
    }

    /// Receiver for export progress text.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<ExportStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn current_status(&self) -> ExportStatus {
        self.status.borrow().clone()
    }

    /// Asks the running capture or range sampling to stop after the current
    /// frame.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Flag that other tasks can raise while this session is borrowed.
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    // =========================================================================
    // Playback Controls
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] while a capture holds the element.
    pub fn playback_state(&self) -> Result<PlaybackState> {
        let element = self.element.try_acquire()?;
        Ok(PlaybackState {
            current_time: element.current_time(),
            duration: known_duration(element.duration()),
            paused: element.is_paused(),
            speed: element.playback_rate(),
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] while a capture holds the element.
    pub fn play(&self) -> Result<()> {
        self.element.try_acquire()?.play();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] while a capture holds the element.
    pub fn pause(&self) -> Result<()> {
        self.element.try_acquire()?.pause();
        Ok(())
    }

    /// Plays if paused, pauses if playing. Returns whether it is now playing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] while a capture holds the element.
    pub fn toggle_playback(&self) -> Result<bool> {
        let mut element = self.element.try_acquire()?;
        if element.is_paused() {
            element.play();
            Ok(true)
        } else {
            element.pause();
            Ok(false)
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] while a capture holds the element.
    pub fn set_speed(&self, speed: PlaybackSpeed) -> Result<()> {
        self.element.try_acquire()?.set_playback_rate(speed);
        Ok(())
    }

    /// Moves the playhead without waiting for the new frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] while a capture holds the element.
    pub fn scrub(&self, time_secs: f64) -> Result<()> {
        let mut element = self.element.try_acquire()?;
        let target = clamp_seek_target(time_secs, element.duration());
        drop(element.seek(target));
        Ok(())
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// Captures the frame on screen, with the live filter, to the front of
    /// the gallery.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] or [`Error::NoSourceLoaded`].
    pub fn capture_single(&mut self) -> Result<ShotId> {
        let element = self.element.try_acquire()?;
        let options = SampleOptions::with_filter(self.filter);
        let frame = self.sampler.capture_current(&*element, &options)?;
        drop(element);

        let time_secs = frame.time_secs;
        let id = self.gallery.prepend(frame.bitmap, time_secs);
        tracing::debug!(shot = id.0, time_secs, "captured shot");
        Ok(id)
    }

    /// Captures with the session's current batch settings.
    ///
    /// # Errors
    ///
    /// Same as [`CaptureSession::capture_batch`].
    pub async fn capture_default_batch(&mut self) -> Result<Batch<ShotId>> {
        let config = self.batch;
        self.capture_batch(&config).await
    }

    /// Captures `count` frames spaced `interval_ms` apart from the current
    /// position, stopping at the end of the video.
    ///
    /// The frames go to the front of the gallery as one chronological block.
    /// Frames captured before a failure or cancellation are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`], or the first frame's error when no
    /// frame was captured at all.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(count = config.count.value(), interval_ms = config.interval_ms)
    )]
    pub async fn capture_batch(&mut self, config: &BatchConfig) -> Result<Batch<ShotId>> {
        let mut element = self.element.try_acquire()?;
        let plan = plan_batch(element.current_time(), config, element.duration());
        self.cancel.reset();
        let options = SampleOptions::with_filter(self.filter);
        let batch = self
            .sampler
            .sample_range(&mut *element, &plan.timestamps, &options, &self.cancel)
            .await;
        drop(element);

        let end = finish_end(batch.end, plan.truncated);
        if batch.items.is_empty() {
            if let BatchEnd::Failed(err) = end {
                return Err(err);
            }
        }
        let items = self.gallery.prepend_batch(batch.items);
        tracing::info!(
            captured = items.len(),
            planned = plan.len(),
            end = ?end,
            "batch capture finished"
        );
        Ok(Batch { items, end })
    }

    /// Samples `start..=end` at `fps` without touching the gallery.
    ///
    /// A reversed range yields an empty batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`], [`Error::InvalidRange`] or
    /// [`Error::RangeTooLong`] for a range that cannot be planned, or the
    /// first frame's error when no frame was sampled at all.
    #[tracing::instrument(level = "debug", skip(self, options))]
    pub async fn capture_time_range(
        &self,
        start: f64,
        end: f64,
        fps: Fps,
        options: &SampleOptions,
    ) -> Result<Batch<SampledFrame>> {
        let mut element = self.element.try_acquire()?;
        let plan = plan_range(start, end, fps, element.duration())?;
        self.cancel.reset();
        let batch = self
            .sampler
            .sample_range(&mut *element, &plan.timestamps, options, &self.cancel)
            .await;
        drop(element);

        let end = finish_end(batch.end, plan.truncated);
        if batch.items.is_empty() {
            if let BatchEnd::Failed(err) = end {
                return Err(err);
            }
        }
        Ok(Batch {
            items: batch.items,
            end,
        })
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export request prefilled from the configured defaults.
    #[must_use]
    pub fn export_request(&self, source: GifSource) -> GifExportConfig {
        self.config.export.request(source)
    }

    /// Builds an animated GIF from gallery shots or a sampled range.
    ///
    /// Progress is published on [`CaptureSession::status`]; failures end
    /// with an `Error: …` status as well as the returned error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] when another export runs (status left
    /// untouched), [`Error::NoFramesSelected`] for an empty frame list, or
    /// any sampling or encoding error.
    pub async fn export_gif(&self, request: &GifExportConfig) -> Result<ExportArtifact> {
        let Ok(_exporting) = self.export_lock.try_lock() else {
            return Err(Error::CaptureBusy);
        };
        self.status.send_replace(ExportStatus::Preparing);

        match self.run_export(request).await {
            Ok(artifact) => {
                self.status.send_replace(ExportStatus::Done {
                    frames: artifact.frame_count,
                    fps: artifact.fps.value(),
                });
                tracing::info!(
                    frames = artifact.frame_count,
                    bytes = artifact.bytes.len(),
                    "GIF export finished"
                );
                Ok(artifact)
            }
            Err(err) => {
                self.status
                    .send_replace(ExportStatus::Failed(err.to_string()));
                tracing::warn!(error = %err, "GIF export failed");
                Err(err)
            }
        }
    }

    async fn run_export(&self, request: &GifExportConfig) -> Result<ExportArtifact> {
        let filter = if request.apply_filters {
            self.filter
        } else {
            FilterState::default()
        };

        let frames = match &request.source {
            GifSource::Gallery { selection } => self
                .gallery
                .chronological(selection)
                .into_iter()
                .map(|shot: &Shot| apply_filter(&shot.bitmap, &filter))
                .collect::<Vec<Bitmap>>(),
            GifSource::VideoRange { start, end } => {
                let options = SampleOptions::with_filter(filter);
                let batch = self
                    .capture_time_range(*start, *end, request.fps, &options)
                    .await?;
                match batch.end {
                    BatchEnd::Failed(err) => return Err(err),
                    BatchEnd::Cancelled => return Err(Error::Cancelled),
                    BatchEnd::Completed | BatchEnd::TruncatedAtDuration => {}
                }
                batch.items.into_iter().map(|frame| frame.bitmap).collect()
            }
        };
        if frames.is_empty() {
            return Err(Error::NoFramesSelected);
        }

        let frames = normalize_frames(&frames, request.output_width)?;
        let options = GifOptions {
            delay: FrameDelay::from_fps(request.fps),
            looping: request.looping,
            palette: request.palette,
            sample_factor: self.config.export.quantizer_sample_factor(),
        };
        let encoded = encode_with_progress(&frames, &options, |frame, total| {
            self.status
                .send_replace(ExportStatus::Encoding { frame, total });
        })
        .await?;

        Ok(ExportArtifact::new(
            encoded.bytes,
            encoded.frame_count,
            request.fps,
        ))
    }

    // =========================================================================
    // Editing & Download
    // =========================================================================

    /// Opens the editor on the shot at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShotNotFound`] for an out-of-range index.
    pub fn open_editor(&self, index: usize) -> Result<EditSession> {
        let shot = self
            .gallery
            .get(index)
            .ok_or(Error::ShotNotFound { index })?;
        EditSession::open(shot.bitmap.clone())
    }

    /// Flattens `session` into the shot at `index`, keeping its id and time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShotNotFound`] or a compositing error.
    pub fn save_editor(&mut self, index: usize, session: &EditSession) -> Result<()> {
        if self.gallery.get(index).is_none() {
            return Err(Error::ShotNotFound { index });
        }
        let bitmap = session.flatten()?;
        self.gallery.replace_bitmap(index, bitmap)?;
        tracing::debug!(index, "saved edited shot");
        Ok(())
    }

    /// Writes the shot at `index` as `screenshot_{index+1}_{t}s.png` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShotNotFound`] or an I/O error.
    pub fn download_shot(&self, index: usize, dir: &Path) -> Result<PathBuf> {
        self.gallery.download_shot(index, dir)
    }
}

/// A completed run whose plan was cut at the duration reports truncation.
fn finish_end(end: BatchEnd, truncated: bool) -> BatchEnd {
    match end {
        BatchEnd::Completed if truncated => BatchEnd::TruncatedAtDuration,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::OutputWidth;
    use crate::test_utils::{assert_abs_diff_eq, numbered_clip, solid_bitmap};
    use crate::video_player::{MemoryClip, SeekBehavior};
    use std::io::Cursor;
    use std::time::Duration;

    fn session() -> CaptureSession<MemoryClip> {
        CaptureSession::new(numbered_clip(10), Config::default())
    }

    fn red_of(bitmap: &Bitmap) -> u8 {
        bitmap.pixel(0, 0).map_or(0, |px| px[0])
    }

    fn gif_frames(bytes: &[u8]) -> Vec<(u16, Vec<u8>)> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = options.read_info(Cursor::new(bytes)).expect("gif header");
        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame().expect("gif frame") {
            frames.push((frame.delay, frame.buffer.to_vec()));
        }
        frames
    }

    #[test]
    fn single_capture_uses_current_frame_and_filter() {
        let mut clip = numbered_clip(10);
        clip.set_position(3.0);
        let mut session = CaptureSession::new(clip, Config::default());
        session.set_filter(FilterState::new(50.0, 100.0, 100.0, 0.0));

        let id = session.capture_single().expect("capture");
        let shot = session.gallery().by_id(id).expect("shot");
        assert_abs_diff_eq!(shot.time_secs, 3.0);
        // Frame 3 has red 60; brightness 50% halves it.
        assert_eq!(red_of(&shot.bitmap), 30);
    }

    #[test]
    fn single_capture_without_media_fails() {
        let mut session = CaptureSession::new(MemoryClip::empty(), Config::default());
        assert!(matches!(session.capture_single(), Err(Error::NoSourceLoaded)));
        assert!(session.gallery().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn batch_from_start_captures_five_chronological_shots() {
        let mut session = session();
        let batch = session
            .capture_batch(&BatchConfig::new(5, 1000))
            .await
            .expect("batch");
        assert!(matches!(batch.end, BatchEnd::Completed));
        let times: Vec<f64> = session.gallery().iter().map(|s| s.time_secs).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0]);

        let state = session.playback_state().expect("state");
        assert_abs_diff_eq!(state.current_time, 0.0);
        assert!(state.paused);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_near_end_is_truncated() {
        let mut clip = numbered_clip(10);
        clip.set_position(6.0);
        let mut session = CaptureSession::new(clip, Config::default());
        let batch = session
            .capture_batch(&BatchConfig::new(20, 1000))
            .await
            .expect("batch");
        assert_eq!(batch.len(), 4);
        assert!(matches!(batch.end, BatchEnd::TruncatedAtDuration));
        let reds: Vec<u8> = session.gallery().iter().map(|s| red_of(&s.bitmap)).collect();
        assert_eq!(reds, vec![120, 140, 160, 180]);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_resumes_playback() {
        let mut session = session();
        session.play().expect("play");
        session
            .capture_batch(&BatchConfig::new(2, 500))
            .await
            .expect("batch");
        assert!(!session.playback_state().expect("state").paused);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_keeps_frames_already_captured() {
        let mut clip = numbered_clip(10);
        clip.set_seek_behavior(SeekBehavior::Delayed(Duration::from_millis(100)));
        let mut session = CaptureSession::new(clip, Config::default());
        let flag = session.cancel_flag();
        let config = BatchConfig::new(5, 1000);

        let (result, ()) = tokio::join!(session.capture_batch(&config), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.cancel();
        });
        let batch = result.expect("batch");
        assert!(matches!(batch.end, BatchEnd::Cancelled));
        assert_eq!(batch.len(), 1);
        assert_eq!(session.gallery().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn controls_are_rejected_during_capture() {
        let mut clip = numbered_clip(10);
        clip.set_seek_behavior(SeekBehavior::Delayed(Duration::from_millis(100)));
        let session = CaptureSession::new(clip, Config::default());
        let options = SampleOptions::default();

        let (range, play) = tokio::join!(
            session.capture_time_range(0.0, 1.0, Fps::new(2), &options),
            async { session.play() }
        );
        assert_eq!(range.expect("range").len(), 3);
        assert!(matches!(play, Err(Error::CaptureBusy)));
        assert!(session.play().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_export_is_rejected() {
        let mut clip = numbered_clip(10);
        clip.set_seek_behavior(SeekBehavior::Delayed(Duration::from_millis(100)));
        let session = CaptureSession::new(clip, Config::default());
        let request = session.export_request(GifSource::VideoRange {
            start: 0.0,
            end: 1.0,
        });

        let (first, second) =
            tokio::join!(session.export_gif(&request), session.export_gif(&request));
        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::CaptureBusy)));
    }

    #[tokio::test(start_paused = true)]
    async fn time_range_leaves_gallery_alone() {
        let session = session();
        let batch = session
            .capture_time_range(2.0, 4.0, Fps::new(1), &SampleOptions::default())
            .await
            .expect("range");
        let times: Vec<f64> = batch.items.iter().map(|f| f.time_secs).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0]);
        assert!(session.gallery().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_range_is_rejected_before_sampling() {
        let session = session();
        let result = session
            .capture_time_range(0.0, f64::INFINITY, Fps::new(8), &SampleOptions::default())
            .await;
        assert!(matches!(result, Err(Error::InvalidRange { .. })));

        let request = session.export_request(GifSource::VideoRange {
            start: 0.0,
            end: f64::INFINITY,
        });
        assert!(session.export_gif(&request).await.is_err());
        assert!(session
            .current_status()
            .to_string()
            .starts_with("Error: Invalid time range"));
    }

    #[tokio::test(start_paused = true)]
    async fn sliver_frames_too_tall_for_gif_fail_the_export() {
        let clip = MemoryClip::from_frames(vec![solid_bitmap(1, 300, [9, 9, 9, 255])], 1.0)
            .expect("clip");
        let mut session = CaptureSession::new(clip, Config::default());
        session.capture_single().expect("capture");

        let mut request = session.export_request(GifSource::Gallery {
            selection: session.gallery().all_ids(),
        });
        request.output_width = OutputWidth::new(400);
        let err = session.export_gif(&request).await.expect_err("too tall");
        assert!(matches!(err, Error::EncodeFailure(_)));
        assert!(session
            .current_status()
            .to_string()
            .contains("exceeds the GIF limit"));
    }

    #[tokio::test(start_paused = true)]
    async fn export_orders_gallery_selection_chronologically() {
        let mut session = session();
        session.scrub(5.0).expect("scrub");
        let late = session.capture_single().expect("late");
        session.scrub(2.0).expect("scrub");
        let early = session.capture_single().expect("early");

        let mut request = session.export_request(GifSource::Gallery {
            selection: vec![late, early],
        });
        request.output_width = OutputWidth::new(4);
        let artifact = session.export_gif(&request).await.expect("export");

        assert_eq!(artifact.frame_count, 2);
        assert_eq!(artifact.file_name, "export.gif");
        let frames = gif_frames(&artifact.bytes);
        assert_eq!(frames[0].1[0], 40);
        assert_eq!(frames[1].1[0], 100);
        assert_eq!(session.current_status().to_string(), "Done • 2 frames @ 8 fps");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_selection_reports_no_frames() {
        let session = session();
        let request = session.export_request(GifSource::default());
        let err = session.export_gif(&request).await.expect_err("no frames");
        assert!(matches!(err, Error::NoFramesSelected));
        assert_eq!(session.current_status().to_string(), "Error: No frames selected");
    }

    #[tokio::test(start_paused = true)]
    async fn range_export_uses_fps_for_delay() {
        let session = session();
        let mut request = session.export_request(GifSource::VideoRange {
            start: 0.0,
            end: 1.0,
        });
        request.fps = Fps::new(4);
        request.output_width = OutputWidth::new(8);
        let artifact = session.export_gif(&request).await.expect("export");

        let frames = gif_frames(&artifact.bytes);
        assert_eq!(frames.len(), 5);
        assert!(frames.iter().all(|(delay, _)| *delay == 25));
        assert_eq!(frames[0].1.len(), 8 * 8 * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn load_clears_gallery() {
        let mut session = session();
        session.capture_single().expect("capture");
        session.load(numbered_clip(3)).expect("load");
        assert!(session.gallery().is_empty());
        let state = session.playback_state().expect("state");
        assert_eq!(state.duration, Some(3.0));
    }

    #[test]
    fn editor_save_replaces_pixels_in_place() {
        let mut session = session();
        let id = session.capture_single().expect("capture");

        let mut editor = session.open_editor(0).expect("editor");
        editor.begin_stroke((0.0, 2.0));
        editor.stroke_to((4.0, 2.0));
        editor.end_stroke();
        session.save_editor(0, &editor).expect("save");

        let shot = session.gallery().get(0).expect("shot");
        assert_eq!(shot.id, id);
        assert_eq!(shot.bitmap.pixel(2, 2), Some([0xff, 0x8a, 0x3d, 255]));
        assert!(matches!(
            session.open_editor(3),
            Err(Error::ShotNotFound { index: 3 })
        ));
    }

    #[test]
    fn toggle_flips_playback() {
        let session = session();
        assert!(session.toggle_playback().expect("toggle"));
        assert!(!session.toggle_playback().expect("toggle"));
        session.set_speed(PlaybackSpeed::new(2.0)).expect("speed");
        assert_abs_diff_eq!(session.playback_state().expect("state").speed.value(), 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn default_batch_uses_stored_settings() {
        let mut session = session();
        assert_eq!(session.batch_config(), Config::default().batch);
        session.set_batch_config(BatchConfig::new(3, 2000));

        let batch = session.capture_default_batch().await.expect("batch");
        assert!(!batch.end.is_failure());
        let times: Vec<f64> = session.gallery().iter().map(|s| s.time_secs).collect();
        assert_eq!(times, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn reset_filter_restores_identity() {
        let mut session = session();
        session.set_filter(FilterState::new(150.0, 80.0, 0.0, 90.0));
        assert!(!session.filter().is_identity());
        session.reset_filter();
        assert!(session.filter().is_identity());
    }
}
