use hdrhistogram::Histogram as HdrHistogram;
use parking_lot::Mutex;

// ─── Configuration ───────────────────────────────────────────────

/// HdrHistogram range: 1 ns → 1 h, 3 significant figures.
/// Only quantiles come from the buckets; larger values are clamped there
/// but still counted exactly in min, max and mean.
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 3_600_000_000_000;
const HIST_SIGFIG: u8 = 3;

fn new_hdr() -> HdrHistogram<u64> {
    HdrHistogram::<u64>::new_with_bounds(HIST_LOW, HIST_HIGH, HIST_SIGFIG)
        .expect("histogram creation")
}

// ─── Exact running statistics ────────────────────────────────────

/// Count, extremes, sum and Welford variance of the values actually
/// recorded, independent of bucket resolution.
#[derive(Debug, Clone, Copy)]
struct Moments {
    count: u64,
    min: u64,
    max: u64,
    sum: u128,
    mean: f64,
    m2: f64,
}

impl Moments {
    const EMPTY: Self = Self {
        count: 0,
        min: u64::MAX,
        max: 0,
        sum: 0,
        mean: 0.0,
        m2: 0.0,
    };

    fn record(&mut self, value: u64) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += u128::from(value);

        let x = value as f64;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }
}

struct Inner {
    hdr: HdrHistogram<u64>,
    moments: Moments,
}

// ─── Histogram ───────────────────────────────────────────────────

/// Distribution of recorded non-negative integer values.
///
/// The domain is `u64`: timers record nanoseconds, and byte sizes or
/// queue lengths fit as well. Signed quantities belong in a [`Gauge`].
///
/// Writers call `update()`, the reporter calls `snapshot()`; both go
/// through the same lock, so a snapshot is never torn.
///
/// [`Gauge`]: super::Gauge
pub struct Histogram {
    inner: Mutex<Inner>,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                hdr: new_hdr(),
                moments: Moments::EMPTY,
            }),
        }
    }

    pub fn update(&self, value: u64) {
        let mut inner = self.inner.lock();
        inner.hdr.saturating_record(value);
        inner.moments.record(value);
    }

    /// Drop every recorded value.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.hdr.reset();
        inner.moments = Moments::EMPTY;
    }

    pub fn count(&self) -> u64 {
        self.inner.lock().moments.count
    }

    /// Copy the current sample out from under the lock.
    pub fn snapshot(&self) -> HistogramSnapshot {
        let inner = self.inner.lock();
        HistogramSnapshot {
            hist: inner.hdr.clone(),
            moments: inner.moments,
        }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Histogram")
            .field("count", &self.count())
            .finish()
    }
}

// ─── Snapshot ────────────────────────────────────────────────────

/// Immutable point-in-time copy of a [`Histogram`].
/// Every statistic is zero while the snapshot holds no samples.
#[derive(Clone)]
pub struct HistogramSnapshot {
    hist: HdrHistogram<u64>,
    moments: Moments,
}

impl HistogramSnapshot {
    pub fn empty() -> Self {
        Self {
            hist: new_hdr(),
            moments: Moments::EMPTY,
        }
    }

    pub fn count(&self) -> u64 {
        self.moments.count
    }

    pub fn is_empty(&self) -> bool {
        self.moments.count == 0
    }

    pub fn min(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.moments.min
    }

    pub fn max(&self) -> u64 {
        self.moments.max
    }

    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.moments.sum as f64 / self.moments.count as f64
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.moments.m2 / self.moments.count as f64).sqrt()
    }

    /// Value at each requested quantile (`0.0..=1.0`), in request order.
    ///
    /// Quantiles are bucket-resolution estimates, clamped into the exact
    /// `[min, max]` of the recorded values.
    pub fn percentiles(&self, quantiles: &[f64]) -> Vec<f64> {
        if self.is_empty() {
            return vec![0.0; quantiles.len()];
        }
        let (lo, hi) = (self.min() as f64, self.max() as f64);
        quantiles
            .iter()
            .map(|&q| (self.hist.value_at_quantile(q) as f64).clamp(lo, hi))
            .collect()
    }
}

impl std::fmt::Debug for HistogramSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistogramSnapshot")
            .field("count", &self.count())
            .field("min", &self.min())
            .field("max", &self.max())
            .finish()
    }
}
