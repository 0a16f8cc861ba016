// SPDX-License-Identifier: MPL-2.0
//! Timestamp planning for batch and range captures.
//!
//! Planning is pure: it turns a request plus the element's known duration into
//! the ordered list of seek targets, so the cadence rules can be tested without
//! a media element.

use super::capture::BatchConfig;
use super::newtypes::Fps;
use crate::config::defaults::MAX_RANGE_FRAMES;
use crate::error::{Error, Result};

/// Slack allowed when deciding whether a range end is reached.
const RANGE_END_TOLERANCE_SECS: f64 = 1e-6;

/// Ordered seek targets for one capture run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimestampPlan {
    /// Targets in the order they must be sampled.
    pub timestamps: Vec<f64>,
    /// True when the request was cut short by the media duration.
    pub truncated: bool,
}

impl TimestampPlan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Returns the duration only when the element actually knows it.
///
/// Elements report `NaN`, infinity or zero while metadata is still loading.
#[must_use]
pub fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

/// Clamps a seek target to `[0, duration]`, or `[0, target]` when the
/// duration is unknown.
#[must_use]
pub fn clamp_seek_target(target_secs: f64, duration: Option<f64>) -> f64 {
    let lower = target_secs.max(0.0);
    match known_duration(duration) {
        Some(duration) => lower.min(duration),
        None => lower,
    }
}

/// Plans a count/interval batch starting at `start_secs`.
///
/// Produces `count` targets spaced `interval_ms` apart and stops before the
/// first target at or past the known duration.
#[must_use]
pub fn plan_batch(start_secs: f64, config: &BatchConfig, duration: Option<f64>) -> TimestampPlan {
    let duration = known_duration(duration);
    let interval = config.interval_secs();
    let mut plan = TimestampPlan::default();

    for i in 0..config.count.value() {
        let t = start_secs + f64::from(i) * interval;
        if duration.is_some_and(|d| t >= d) {
            plan.truncated = true;
            break;
        }
        plan.timestamps.push(t);
    }

    plan
}

/// Plans a time-range sampling from `start_secs` to `end_secs` inclusive.
///
/// Targets are `1/fps` apart. A reversed range yields an empty plan.
///
/// # Errors
///
/// Returns [`Error::InvalidRange`] when a bound is not finite and
/// [`Error::RangeTooLong`] when the range would need more than
/// [`MAX_RANGE_FRAMES`] targets.
pub fn plan_range(
    start_secs: f64,
    end_secs: f64,
    fps: Fps,
    duration: Option<f64>,
) -> Result<TimestampPlan> {
    if !start_secs.is_finite() || !end_secs.is_finite() {
        return Err(Error::InvalidRange {
            start_secs,
            end_secs,
        });
    }
    let mut plan = TimestampPlan::default();
    if start_secs > end_secs {
        return Ok(plan);
    }

    let duration = known_duration(duration);
    let step = fps.frame_interval_secs();
    let last_end = match duration {
        Some(d) => end_secs.min(d),
        None => end_secs,
    };
    let span = ((last_end - start_secs) / step + RANGE_END_TOLERANCE_SECS).floor();
    if span >= MAX_RANGE_FRAMES as f64 {
        // Saturating float-to-int cast; the value is only reported.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frames = (span as usize).saturating_add(1);
        return Err(Error::RangeTooLong {
            frames,
            max: MAX_RANGE_FRAMES,
        });
    }

    for i in 0..MAX_RANGE_FRAMES {
        #[allow(clippy::cast_precision_loss)]
        let t = start_secs + i as f64 * step;
        if t > end_secs + RANGE_END_TOLERANCE_SECS {
            break;
        }
        if duration.is_some_and(|d| t >= d) {
            plan.truncated = true;
            break;
        }
        plan.timestamps.push(t);
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn clamp_respects_known_duration() {
        assert_abs_diff_eq!(clamp_seek_target(12.0, Some(10.0)), 10.0);
        assert_abs_diff_eq!(clamp_seek_target(-1.0, Some(10.0)), 0.0);
        assert_abs_diff_eq!(clamp_seek_target(4.5, Some(10.0)), 4.5);
    }

    #[test]
    fn clamp_without_duration_has_no_upper_bound() {
        assert_abs_diff_eq!(clamp_seek_target(42.0, None), 42.0);
        assert_abs_diff_eq!(clamp_seek_target(42.0, Some(f64::NAN)), 42.0);
        assert_abs_diff_eq!(clamp_seek_target(-3.0, None), 0.0);
    }

    #[test]
    fn batch_from_start_of_ten_second_clip() {
        let plan = plan_batch(0.0, &BatchConfig::new(5, 1000), Some(10.0));
        assert_eq!(plan.timestamps, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(!plan.truncated);
    }

    #[test]
    fn batch_stops_before_exceeding_duration() {
        let plan = plan_batch(6.0, &BatchConfig::new(20, 1000), Some(10.0));
        assert_eq!(plan.timestamps, vec![6.0, 7.0, 8.0, 9.0]);
        assert!(plan.truncated);
    }

    #[test]
    fn batch_spacing_is_exact_interval() {
        let plan = plan_batch(1.0, &BatchConfig::new(8, 40), None);
        assert_eq!(plan.len(), 8);
        for pair in plan.timestamps.windows(2) {
            assert_abs_diff_eq!(pair[1] - pair[0], 0.04, epsilon = 1e-9);
        }
    }

    #[test]
    fn batch_with_unknown_duration_is_never_truncated() {
        let plan = plan_batch(100.0, &BatchConfig::new(3, 500), None);
        assert_eq!(plan.len(), 3);
        assert!(!plan.truncated);
    }

    #[test]
    fn range_is_inclusive_of_end() {
        let plan = plan_range(0.0, 1.0, Fps::new(4), Some(10.0)).expect("plan");
        assert_eq!(plan.timestamps, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn range_tolerates_float_accumulation_at_end() {
        // 0.1 steps do not land exactly on 0.3 in binary floating point.
        let plan = plan_range(0.0, 0.3, Fps::new(10), None).expect("plan");
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn reversed_range_is_empty_not_error() {
        let plan = plan_range(5.0, 2.0, Fps::new(8), Some(10.0)).expect("plan");
        assert!(plan.is_empty());
        assert!(!plan.truncated);
    }

    #[test]
    fn range_stops_at_duration() {
        let plan = plan_range(8.0, 12.0, Fps::new(1), Some(10.0)).expect("plan");
        assert_eq!(plan.timestamps, vec![8.0, 9.0]);
        assert!(plan.truncated);
    }

    #[test]
    fn range_with_infinite_end_is_rejected() {
        let result = plan_range(0.0, f64::INFINITY, Fps::new(8), None);
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
        let result = plan_range(f64::NAN, 2.0, Fps::new(8), Some(10.0));
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn range_past_frame_limit_is_rejected() {
        let result = plan_range(0.0, 1.0e6, Fps::new(30), None);
        match result {
            Err(Error::RangeTooLong { frames, max }) => {
                assert_eq!(max, MAX_RANGE_FRAMES);
                assert!(frames > 29_000_000);
            }
            other => panic!("expected RangeTooLong, got {other:?}"),
        }
    }

    #[test]
    fn long_range_is_fine_when_duration_cuts_it_short() {
        let plan = plan_range(0.0, 1.0e6, Fps::new(1), Some(10.0)).expect("plan");
        assert_eq!(plan.len(), 10);
        assert!(plan.truncated);
    }

    #[test]
    fn range_at_frame_limit_is_accepted() {
        let plan = plan_range(0.0, 3599.0, Fps::new(1), None).expect("plan");
        assert_eq!(plan.len(), MAX_RANGE_FRAMES);
        assert!(matches!(
            plan_range(0.0, 3600.0, Fps::new(1), None),
            Err(Error::RangeTooLong { frames: 3601, .. })
        ));
    }
}
