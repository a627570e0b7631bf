use std::time::{Duration, Instant};

use super::{Histogram, HistogramSnapshot, Meter, MeterSnapshot};

/// Histogram of elapsed times (nanoseconds) plus a meter of how often
/// they occur.
#[derive(Debug, Default)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

/// Immutable point-in-time copy of a [`Timer`].
#[derive(Debug, Clone)]
pub struct TimerSnapshot {
    pub histogram: HistogramSnapshot,
    pub meter: MeterSnapshot,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence that took `elapsed`.
    pub fn update(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.histogram.update(nanos);
        self.meter.mark(1);
    }

    /// Record the time since `start`.
    pub fn update_since(&self, start: Instant) {
        self.update(start.elapsed());
    }

    /// Run `f` and record how long it took.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        let t0 = Instant::now();
        let out = f();
        self.update_since(t0);
        out
    }

    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            histogram: self.histogram.snapshot(),
            meter: self.meter.snapshot(),
        }
    }
}
