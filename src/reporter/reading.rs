use crate::metrics::{DistributionStats, Metric, MeterSnapshot};

/// Everything one output line (or block) needs from an instrument,
/// read once and shared by both styles.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Counter { count: u64 },
    Gauge { value: i64 },
    GaugeFloat64 { value: f64 },
    Healthcheck { error: Option<String> },
    Histogram(DistributionStats),
    Meter(MeterSnapshot),
    Timer {
        stats: DistributionStats,
        rates: MeterSnapshot,
    },
}

impl Reading {
    /// Snapshot `metric` and derive its statistics.
    ///
    /// Healthchecks run their probe here, on the calling thread.
    /// Returns `None` for kinds the reporter does not render.
    pub fn take(metric: &Metric) -> Option<Self> {
        let reading = match metric {
            Metric::Counter(c) => Self::Counter { count: c.count() },
            Metric::Gauge(g) => Self::Gauge { value: g.value() },
            Metric::GaugeFloat64(g) => Self::GaugeFloat64 { value: g.value() },
            Metric::Healthcheck(h) => {
                h.check();
                Self::Healthcheck { error: h.error() }
            }
            Metric::Histogram(h) => {
                Self::Histogram(DistributionStats::from_snapshot(&h.snapshot()))
            }
            Metric::Meter(m) => Self::Meter(m.snapshot()),
            Metric::Timer(t) => {
                let snap = t.snapshot();
                Self::Timer {
                    stats: DistributionStats::from_snapshot(&snap.histogram),
                    rates: snap.meter,
                }
            }
            Metric::Opaque(_) => return None,
        };
        Some(reading)
    }
}
