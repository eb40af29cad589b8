// src/clock/mod.rs

//! Event time stamps and the clock that produces them.
//!
//! Every stamp carries the instant the clock was anchored at plus a monotonic
//! offset, so durations are computed from `Instant` arithmetic only and never
//! drift with wall-clock adjustments.

use std::fmt::Debug;
use std::ops::Sub;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};

pub mod mock;

/// A point in time produced by a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTime {
    /// Wall-clock instant the producing clock was anchored at.
    pub start: DateTime<Utc>,
    /// Monotonic time elapsed since `start`.
    pub offset: Duration,
}

impl EventTime {
    pub fn new(start: DateTime<Utc>, offset: Duration) -> Self {
        Self { start, offset }
    }

    /// Absolute wall-clock time of this stamp.
    pub fn at(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.offset)
            .ok()
            .and_then(|d| self.start.checked_add_signed(d))
            .unwrap_or(self.start)
    }
}

impl Sub for EventTime {
    type Output = ExecutionTime;

    fn sub(self, rhs: EventTime) -> ExecutionTime {
        ExecutionTime::between(rhs, self)
    }
}

/// Start and duration of something that ran between two [`EventTime`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionTime {
    pub start: DateTime<Utc>,
    pub duration: Duration,
}

impl ExecutionTime {
    /// Normalise two stamps: the earlier one becomes the start, the absolute
    /// difference becomes the duration. Argument order does not matter.
    pub fn between(a: EventTime, b: EventTime) -> Self {
        let (early, late) = if a.offset <= b.offset { (a, b) } else { (b, a) };
        Self {
            start: early.at(),
            duration: late.offset - early.offset,
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        EventTime::new(self.start, self.duration).at()
    }
}

/// Source of [`EventTime`] stamps.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> EventTime;
}

/// Production clock: one wall-clock reading at construction, then
/// `Instant`-based offsets only.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: DateTime<Utc>,
    anchor: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Utc::now(),
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> EventTime {
        EventTime::new(self.start, self.anchor.elapsed())
    }
}
