use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::Result;
use crate::metrics::{
    Counter, Gauge, GaugeFloat64, Healthcheck, Histogram, Meter, Metric, Registry, Timer,
};

// ─── Configuration ───────────────────────────────────────────────

/// Error ratio above which the `upstream` healthcheck reports unhealthy.
const UNHEALTHY_ERROR_RATIO: f64 = 0.05;

/// Percentage of simulated requests that fail.
const ERROR_PCT: u8 = 3;

// ─── Instruments ─────────────────────────────────────────────────

/// The demo instrument set, shared by every worker.
#[derive(Clone)]
pub struct Workload {
    pub requests: Arc<Counter>,
    pub errors: Arc<Counter>,
    pub inflight: Arc<Gauge>,
    pub hit_ratio: Arc<GaugeFloat64>,
    pub payload_bytes: Arc<Histogram>,
    pub events: Arc<Meter>,
    pub latency: Arc<Timer>,
    inflight_now: Arc<AtomicI64>,
}

impl Workload {
    /// Build the instruments and register them, together with an
    /// `upstream` healthcheck and an opaque `build.info` entry.
    pub fn register(registry: &Registry) -> Result<Self> {
        let workload = Self {
            requests: Arc::new(Counter::new()),
            errors: Arc::new(Counter::new()),
            inflight: Arc::new(Gauge::new()),
            hit_ratio: Arc::new(GaugeFloat64::new()),
            payload_bytes: Arc::new(Histogram::new()),
            events: Arc::new(Meter::new()),
            latency: Arc::new(Timer::new()),
            inflight_now: Arc::new(AtomicI64::new(0)),
        };

        registry.register("requests", workload.requests.clone())?;
        registry.register("errors", workload.errors.clone())?;
        registry.register("inflight", workload.inflight.clone())?;
        registry.register("cache.hit_ratio", workload.hit_ratio.clone())?;
        registry.register("payload.bytes", workload.payload_bytes.clone())?;
        registry.register("events", workload.events.clone())?;
        registry.register("handler.latency", workload.latency.clone())?;

        let requests = workload.requests.clone();
        let errors = workload.errors.clone();
        registry.register(
            "upstream",
            Arc::new(Healthcheck::new(move |h| {
                let total = requests.count();
                let failed = errors.count();
                if total > 0 && failed as f64 / total as f64 > UNHEALTHY_ERROR_RATIO {
                    h.unhealthy(format!("{failed} of {total} requests failed"));
                } else {
                    h.healthy();
                }
            })),
        )?;

        registry.register(
            "build.info",
            Metric::Opaque(Arc::new(env!("CARGO_PKG_VERSION"))),
        )?;

        Ok(workload)
    }
}

// ─── Public entry point ──────────────────────────────────────────

/// Spawns `concurrency` Tokio tasks that keep updating the workload's
/// instruments until the deadline (if any) or until `running` is
/// cleared.
pub async fn run(
    running: Arc<AtomicBool>,
    workload: Workload,
    concurrency: u32,
    duration: Option<Duration>,
) {
    let deadline = duration.map(|d| Instant::now() + d);

    let mut handles = Vec::with_capacity(concurrency as usize);

    for worker_id in 0..concurrency {
        let running = running.clone();
        let workload = workload.clone();

        handles.push(tokio::spawn(async move {
            worker(worker_id, running, workload, deadline).await;
        }));
    }

    // Wait for all workers to finish
    for h in handles {
        let _ = h.await;
    }

    running.store(false, Ordering::SeqCst);
}

// ─── Worker loop ─────────────────────────────────────────────────

async fn worker(id: u32, running: Arc<AtomicBool>, w: Workload, deadline: Option<Instant>) {
    // Each worker gets its own deterministic RNG seeded uniquely.
    let mut rng = StdRng::seed_from_u64(1000 + id as u64);

    while running.load(Ordering::Relaxed) && deadline.map_or(true, |d| Instant::now() < d) {
        simulate_request(&mut rng, &w).await;
    }
}

async fn simulate_request(rng: &mut StdRng, w: &Workload) {
    let inflight = w.inflight_now.fetch_add(1, Ordering::Relaxed) + 1;
    w.inflight.update(inflight);

    // Long-tailed service time: mostly 1–5 ms, occasionally up to 50 ms.
    let micros = if rng.gen_bool(0.95) {
        rng.gen_range(1_000..5_000u64)
    } else {
        rng.gen_range(5_000..50_000u64)
    };
    let t0 = Instant::now();
    tokio::time::sleep(Duration::from_micros(micros)).await;
    w.latency.update(t0.elapsed());

    w.requests.inc(1);
    if rng.gen_range(0u8..100) < ERROR_PCT {
        w.errors.inc(1);
    }
    w.payload_bytes.update(rng.gen_range(128..64 * 1024u64));
    w.events.mark(rng.gen_range(1..4u64));

    // Drifts around 0.8
    let ratio = (0.8 + rng.gen_range(-0.1..0.1f64)).clamp(0.0, 1.0);
    w.hit_ratio.update(ratio);

    let inflight = w.inflight_now.fetch_sub(1, Ordering::Relaxed) - 1;
    w.inflight.update(inflight);
}
