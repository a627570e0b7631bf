use serde::Serialize;

use super::HistogramSnapshot;

/// The fixed quantile request shared by every output style:
/// median, 75th, 95th, 99th and 99.9th.
pub const PERCENTILES: [f64; 5] = [0.5, 0.75, 0.95, 0.99, 0.999];

/// Summary statistics for one histogram or timer snapshot.
/// Values are in the instrument's native unit (nanoseconds for timers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionStats {
    pub count: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub std_dev: f64,
    /// One value per entry of [`PERCENTILES`], non-decreasing.
    pub percentiles: [f64; 5],
}

impl DistributionStats {
    /// Derive the full set from a snapshot.
    /// Returns zeroed values if the snapshot is empty.
    pub fn from_snapshot(snap: &HistogramSnapshot) -> Self {
        if snap.is_empty() {
            return Self::empty();
        }

        let mut percentiles = [0.0; 5];
        for (slot, v) in percentiles.iter_mut().zip(snap.percentiles(&PERCENTILES)) {
            *slot = v;
        }

        Self {
            count: snap.count(),
            min: snap.min(),
            max: snap.max(),
            mean: snap.mean(),
            std_dev: snap.std_dev(),
            percentiles,
        }
    }

    /// All-zero placeholder used before any samples are recorded.
    pub fn empty() -> Self {
        Self {
            count: 0,
            min: 0,
            max: 0,
            mean: 0.0,
            std_dev: 0.0,
            percentiles: [0.0; 5],
        }
    }

    pub fn median(&self) -> f64 {
        self.percentiles[0]
    }

    pub fn p75(&self) -> f64 {
        self.percentiles[1]
    }

    pub fn p95(&self) -> f64 {
        self.percentiles[2]
    }

    pub fn p99(&self) -> f64 {
        self.percentiles[3]
    }

    pub fn p999(&self) -> f64 {
        self.percentiles[4]
    }
}
