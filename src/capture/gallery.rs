// SPDX-License-Identifier: MPL-2.0
//! Captured shots, newest first.
//!
//! Indices are stable between capture and load events, so an editor opened
//! on index `i` saves back to the same shot. Export order is chronological
//! and computed on demand.

use crate::domain::video::ShotId;
use crate::error::{Error, Result};
use crate::media::{save_png, screenshot_filename, Bitmap};
use crate::video_player::SampledFrame;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One captured frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub id: ShotId,
    pub bitmap: Bitmap,
    /// Source video time the frame was taken at.
    pub time_secs: f64,
}

/// Ordered shot collection for the current video.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    shots: Vec<Shot>,
    next_id: u64,
}

impl Gallery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Shots in display order (newest first).
    #[must_use]
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shot> {
        self.shots.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Shot> {
        self.shots.get(index)
    }

    #[must_use]
    pub fn by_id(&self, id: ShotId) -> Option<&Shot> {
        self.shots.iter().find(|shot| shot.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: ShotId) -> Option<usize> {
        self.shots.iter().position(|shot| shot.id == id)
    }

    fn allocate_id(&mut self) -> ShotId {
        self.next_id += 1;
        ShotId(self.next_id)
    }

    /// Inserts a single shot at the front.
    pub fn prepend(&mut self, bitmap: Bitmap, time_secs: f64) -> ShotId {
        let id = self.allocate_id();
        self.shots.insert(
            0,
            Shot {
                id,
                bitmap,
                time_secs,
            },
        );
        id
    }

    /// Inserts a batch at the front as one block, keeping the batch's own
    /// chronological order.
    pub fn prepend_batch(&mut self, frames: Vec<SampledFrame>) -> Vec<ShotId> {
        let block: Vec<Shot> = frames
            .into_iter()
            .map(|frame| Shot {
                id: self.allocate_id(),
                bitmap: frame.bitmap,
                time_secs: frame.time_secs,
            })
            .collect();
        let ids = block.iter().map(|shot| shot.id).collect();
        self.shots.splice(0..0, block);
        ids
    }

    /// Replaces the pixels of the shot at `index`, keeping its id and time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShotNotFound`] for an out-of-range index.
    pub fn replace_bitmap(&mut self, index: usize, bitmap: Bitmap) -> Result<()> {
        let shot = self
            .shots
            .get_mut(index)
            .ok_or(Error::ShotNotFound { index })?;
        shot.bitmap = bitmap;
        Ok(())
    }

    /// Removes every shot. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.shots.clear();
    }

    /// Selected shots sorted by capture time, ties broken by capture order.
    ///
    /// Unknown and repeated ids are ignored.
    #[must_use]
    pub fn chronological(&self, selection: &[ShotId]) -> Vec<&Shot> {
        let wanted: HashSet<ShotId> = selection.iter().copied().collect();
        let mut picked: Vec<&Shot> = self
            .shots
            .iter()
            .filter(|shot| wanted.contains(&shot.id))
            .collect();
        picked.sort_by(|a, b| a.time_secs.total_cmp(&b.time_secs).then(a.id.cmp(&b.id)));
        picked
    }

    /// Ids of every shot, for "select all".
    #[must_use]
    pub fn all_ids(&self) -> Vec<ShotId> {
        self.shots.iter().map(|shot| shot.id).collect()
    }

    /// Download name for the shot at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShotNotFound`] for an out-of-range index.
    pub fn file_name(&self, index: usize) -> Result<String> {
        let shot = self.get(index).ok_or(Error::ShotNotFound { index })?;
        Ok(screenshot_filename(index, shot.time_secs))
    }

    /// Writes the shot at `index` as a PNG into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShotNotFound`] or an I/O error.
    pub fn download_shot(&self, index: usize, dir: &Path) -> Result<PathBuf> {
        let shot = self.get(index).ok_or(Error::ShotNotFound { index })?;
        let path = dir.join(screenshot_filename(index, shot.time_secs));
        save_png(&shot.bitmap, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::solid_bitmap;
    use tempfile::tempdir;

    fn shot_bitmap(red: u8) -> Bitmap {
        solid_bitmap(2, 2, [red, 0, 0, 255])
    }

    fn frame(time_secs: f64) -> SampledFrame {
        SampledFrame {
            time_secs,
            bitmap: shot_bitmap(0),
        }
    }

    fn times(gallery: &Gallery) -> Vec<f64> {
        gallery.iter().map(|shot| shot.time_secs).collect()
    }

    #[test]
    fn singles_are_newest_first() {
        let mut gallery = Gallery::new();
        gallery.prepend(shot_bitmap(1), 1.0);
        gallery.prepend(shot_bitmap(2), 2.0);
        assert_eq!(times(&gallery), vec![2.0, 1.0]);
    }

    #[test]
    fn batch_is_a_chronological_block_before_older_shots() {
        let mut gallery = Gallery::new();
        gallery.prepend(shot_bitmap(1), 9.0);
        let ids = gallery.prepend_batch(vec![frame(0.0), frame(1.0), frame(2.0)]);
        assert_eq!(times(&gallery), vec![0.0, 1.0, 2.0, 9.0]);
        assert_eq!(ids.len(), 3);
        assert_eq!(gallery.index_of(ids[2]), Some(2));
    }

    #[test]
    fn ids_increase_across_clear() {
        let mut gallery = Gallery::new();
        let first = gallery.prepend(shot_bitmap(1), 0.0);
        gallery.clear();
        assert!(gallery.is_empty());
        let second = gallery.prepend(shot_bitmap(1), 0.0);
        assert!(second > first);
    }

    #[test]
    fn replace_keeps_identity_and_time() {
        let mut gallery = Gallery::new();
        let id = gallery.prepend(shot_bitmap(1), 3.25);
        gallery.replace_bitmap(0, shot_bitmap(200)).expect("replace");
        let shot = gallery.by_id(id).expect("shot");
        assert_eq!(shot.bitmap.pixel(0, 0), Some([200, 0, 0, 255]));
        assert!((shot.time_secs - 3.25).abs() < f64::EPSILON);
        assert!(matches!(
            gallery.replace_bitmap(5, shot_bitmap(0)),
            Err(Error::ShotNotFound { index: 5 })
        ));
    }

    #[test]
    fn chronological_sorts_selection_by_time() {
        let mut gallery = Gallery::new();
        let late = gallery.prepend(shot_bitmap(1), 5.0);
        let early = gallery.prepend(shot_bitmap(2), 1.0);
        let unpicked = gallery.prepend(shot_bitmap(3), 3.0);

        let picked = gallery.chronological(&[late, early, late, ShotId(999)]);
        let ids: Vec<ShotId> = picked.iter().map(|shot| shot.id).collect();
        assert_eq!(ids, vec![early, late]);
        assert!(!ids.contains(&unpicked));
    }

    #[test]
    fn equal_times_keep_capture_order() {
        let mut gallery = Gallery::new();
        let a = gallery.prepend(shot_bitmap(1), 2.0);
        let b = gallery.prepend(shot_bitmap(2), 2.0);
        let ids: Vec<ShotId> = gallery
            .chronological(&[b, a])
            .iter()
            .map(|shot| shot.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn download_uses_display_index_and_time() {
        let mut gallery = Gallery::new();
        gallery.prepend(shot_bitmap(1), 1.5);
        gallery.prepend(shot_bitmap(2), 12.0);
        assert_eq!(gallery.file_name(1).expect("name"), "screenshot_2_1.50s.png");

        let dir = tempdir().expect("temp dir");
        let path = gallery.download_shot(0, dir.path()).expect("download");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("screenshot_1_12.00s.png"));
        let decoded = Bitmap::decode(&std::fs::read(&path).expect("read")).expect("png");
        assert_eq!(decoded.pixel(0, 0), Some([2, 0, 0, 255]));
    }
}
