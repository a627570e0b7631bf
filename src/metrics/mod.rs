pub mod counter;
pub mod gauge;
pub mod healthcheck;
pub mod histogram;
pub mod meter;
pub mod percentiles;
pub mod registry;
pub mod timer;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use counter::Counter;
pub use gauge::{Gauge, GaugeFloat64};
pub use healthcheck::Healthcheck;
pub use histogram::{Histogram, HistogramSnapshot};
pub use meter::{Meter, MeterSnapshot};
pub use percentiles::{DistributionStats, PERCENTILES};
pub use registry::{MetricSource, Registry};
pub use timer::{Timer, TimerSnapshot};

/// Nanoseconds per second. Histogram and timer values are recorded in
/// nanoseconds; compact output divides by this.
pub const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// A registered instrument.
///
/// The set of kinds the reporter knows how to render is closed. Anything
/// else an application wants to keep in the same registry goes in
/// [`Metric::Opaque`], which the reporter skips without a word.
#[derive(Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    GaugeFloat64(Arc<GaugeFloat64>),
    Healthcheck(Arc<Healthcheck>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    Timer(Arc<Timer>),
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Metric {
    /// Short kind label, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Counter(_) => "counter",
            Self::Gauge(_) => "gauge",
            Self::GaugeFloat64(_) => "gauge_f64",
            Self::Healthcheck(_) => "healthcheck",
            Self::Histogram(_) => "histogram",
            Self::Meter(_) => "meter",
            Self::Timer(_) => "timer",
            Self::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Metric").field(&self.kind()).finish()
    }
}

impl From<Arc<Counter>> for Metric {
    fn from(m: Arc<Counter>) -> Self {
        Self::Counter(m)
    }
}

impl From<Arc<Gauge>> for Metric {
    fn from(m: Arc<Gauge>) -> Self {
        Self::Gauge(m)
    }
}

impl From<Arc<GaugeFloat64>> for Metric {
    fn from(m: Arc<GaugeFloat64>) -> Self {
        Self::GaugeFloat64(m)
    }
}

impl From<Arc<Healthcheck>> for Metric {
    fn from(m: Arc<Healthcheck>) -> Self {
        Self::Healthcheck(m)
    }
}

impl From<Arc<Histogram>> for Metric {
    fn from(m: Arc<Histogram>) -> Self {
        Self::Histogram(m)
    }
}

impl From<Arc<Meter>> for Metric {
    fn from(m: Arc<Meter>) -> Self {
        Self::Meter(m)
    }
}

impl From<Arc<Timer>> for Metric {
    fn from(m: Arc<Timer>) -> Self {
        Self::Timer(m)
    }
}
