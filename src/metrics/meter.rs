use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

// ─── Configuration ───────────────────────────────────────────────

/// EWMA tick period. Rates are folded in once per tick.
const TICK_INTERVAL: Duration = Duration::from_secs(5);

// ─── EWMA ────────────────────────────────────────────────────────

/// Exponentially-weighted moving average of a per-second rate.
#[derive(Debug, Clone, Copy)]
struct Ewma {
    alpha: f64,
    rate: f64,
    initialised: bool,
}

impl Ewma {
    /// Average over a window of `minutes`, ticked every [`TICK_INTERVAL`].
    fn with_window(minutes: f64) -> Self {
        let alpha = 1.0 - (-TICK_INTERVAL.as_secs_f64() / 60.0 / minutes).exp();
        Self {
            alpha,
            rate: 0.0,
            initialised: false,
        }
    }

    fn tick(&mut self, events: u64) {
        let instant_rate = events as f64 / TICK_INTERVAL.as_secs_f64();
        if self.initialised {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialised = true;
        }
    }

    /// Equivalent to `n` ticks with no events.
    fn decay(&mut self, n: u32) {
        self.rate *= (1.0 - self.alpha).powi(n as i32);
    }
}

// ─── Meter ───────────────────────────────────────────────────────

/// Rate of events over time: 1, 5 and 15-minute moving averages plus
/// the mean rate since creation.
///
/// Ticking is lazy. Every `mark()` and `snapshot()` first folds in the
/// ticks that elapsed since the last call, so no background task is
/// needed to keep the averages moving.
#[derive(Debug)]
pub struct Meter {
    count: AtomicU64,
    start: Instant,
    state: Mutex<MeterState>,
}

#[derive(Debug)]
struct MeterState {
    uncounted: u64,
    last_tick: Instant,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
}

/// Immutable point-in-time copy of a [`Meter`]. Rates are per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeterSnapshot {
    pub count: u64,
    pub rate1: f64,
    pub rate5: f64,
    pub rate15: f64,
    pub rate_mean: f64,
}

impl Meter {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    fn started_at(start: Instant) -> Self {
        Self {
            count: AtomicU64::new(0),
            start,
            state: Mutex::new(MeterState {
                uncounted: 0,
                last_tick: start,
                m1: Ewma::with_window(1.0),
                m5: Ewma::with_window(5.0),
                m15: Ewma::with_window(15.0),
            }),
        }
    }

    /// Record `n` events.
    pub fn mark(&self, n: u64) {
        self.mark_at(n, Instant::now());
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        self.snapshot_at(Instant::now())
    }

    fn mark_at(&self, n: u64, now: Instant) {
        let mut state = self.state.lock();
        state.tick_until(now);
        state.uncounted += n;
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    fn snapshot_at(&self, now: Instant) -> MeterSnapshot {
        let mut state = self.state.lock();
        state.tick_until(now);

        let count = self.count();
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        let rate_mean = if elapsed > 0.0 {
            count as f64 / elapsed
        } else {
            0.0
        };

        MeterSnapshot {
            count,
            rate1: state.m1.rate,
            rate5: state.m5.rate,
            rate15: state.m15.rate,
            rate_mean,
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeterState {
    /// Apply every whole tick between `last_tick` and `now`.
    fn tick_until(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick);
        let ticks = (elapsed.as_nanos() / TICK_INTERVAL.as_nanos()) as u32;
        if ticks == 0 {
            return;
        }
        self.last_tick += TICK_INTERVAL * ticks;

        // Pending events belong to the first elapsed tick; the rest were idle.
        let events = std::mem::take(&mut self.uncounted);
        for ewma in [&mut self.m1, &mut self.m5, &mut self.m15] {
            ewma.tick(events);
            ewma.decay(ticks - 1);
        }
    }
}
