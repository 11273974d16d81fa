use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use thiserror::Error;

use crate::exam::model::ExamInfo;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("exam payload has neither a start instant nor a start time")]
    MissingStart,
    #[error("unparseable start time {0:?} (expected HH:MM, 24-hour)")]
    BadStartTime(String),
}

/// Absolute end instant of the exam. Derived once at load; every tick only
/// recomputes the difference against the current clock.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    end: DateTime<Utc>,
}

/// Display value for the countdown, recomputed per tick and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRemaining {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    pub const ZERO: TimeRemaining = TimeRemaining {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn total_seconds(&self) -> i64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl Deadline {
    /// Preferred form: the backend supplies the full start instant, so the
    /// deadline is valid across midnight and on any viewing day.
    pub fn from_instant(starts_at: DateTime<Utc>, total_minutes: i64) -> Self {
        Self {
            end: starts_at + Duration::minutes(total_minutes),
        }
    }

    /// Legacy form: bare "HH:MM" interpreted on today's local date. Parse
    /// failures are typed errors so the caller can degrade to "--:--:--"
    /// instead of rendering garbage.
    pub fn from_clock_time(
        start_time: &str,
        total_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, TimerError> {
        let time = NaiveTime::parse_from_str(start_time.trim(), "%H:%M")
            .map_err(|_| TimerError::BadStartTime(start_time.to_string()))?;
        let today = now.with_timezone(&Local).date_naive();
        let start_local = Local
            .from_local_datetime(&today.and_time(time))
            .earliest()
            .ok_or_else(|| TimerError::BadStartTime(start_time.to_string()))?;
        Ok(Self::from_instant(start_local.with_timezone(&Utc), total_minutes))
    }

    /// Derive the deadline from the exam payload, preferring the full start
    /// instant over the legacy time-of-day field.
    pub fn from_exam(info: &ExamInfo, now: DateTime<Utc>) -> Result<Self, TimerError> {
        if let Some(starts_at) = info.starts_at {
            return Ok(Self::from_instant(starts_at, info.total_exam_time));
        }
        match info.start_time.as_deref() {
            Some(start_time) => Self::from_clock_time(start_time, info.total_exam_time, now),
            None => Err(TimerError::MissingStart),
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Time left until the deadline, floored to whole seconds and clamped at
    /// zero so the display never goes negative.
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeRemaining {
        let secs = (self.end - now).num_seconds().max(0);
        TimeRemaining {
            hours: secs / 3600,
            minutes: (secs % 3600) / 60,
            seconds: secs % 60,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }
}
