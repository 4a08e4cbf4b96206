//! Elapsed-time arithmetic for stays.
//!
//! All math runs on whole seconds between two absolute instants; wall-clock
//! strings are never involved, so a stay that crosses midnight or a daylight
//! shift cannot pick up a phantom day.

use chrono::{DateTime, Utc};

/// An elapsed interval split into display components: whole days, then an
/// `HH:MM:SS` remainder.
///
/// Negative intervals (clock skew between the two writes) clamp to zero and
/// set [`clamped`](StayDuration::clamped); callers decide whether to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDuration {
  pub days:    i64,
  pub hours:   i64,
  pub minutes: i64,
  pub seconds: i64,
  /// True when the raw interval was negative and was clamped to zero.
  pub clamped: bool,
}

impl StayDuration {
  /// Elapsed time from `from` to `to`, truncated to whole seconds and
  /// clamped to be non-negative.
  pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
    let raw = (to - from).num_seconds();
    let total = raw.max(0);
    Self {
      days:    total / 86_400,
      hours:   (total % 86_400) / 3_600,
      minutes: (total % 3_600) / 60,
      seconds: total % 60,
      clamped: raw < 0,
    }
  }

  /// Whole elapsed minutes, the value persisted as `duration_minutes`.
  pub fn total_minutes(&self) -> i64 {
    (self.days * 24 + self.hours) * 60 + self.minutes
  }

  /// The form persisted as `duration_text`: `"3d 04:05:06"` once a full day
  /// has passed, plain `"04:05:06"` under one.
  pub fn text(&self) -> String {
    if self.days > 0 {
      format!(
        "{}d {:02}:{:02}:{:02}",
        self.days, self.hours, self.minutes, self.seconds
      )
    } else {
      format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
  }
}
