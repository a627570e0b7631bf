use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Signed integer point-in-time value.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Floating point gauge. The `f64` is kept as its bit pattern so reads and
/// writes stay single atomic operations.
#[derive(Debug)]
pub struct GaugeFloat64 {
    bits: AtomicU64,
}

impl GaugeFloat64 {
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn update(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for GaugeFloat64 {
    fn default() -> Self {
        Self::new()
    }
}
