use std::any::Any;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use metrics_log::metrics::{Counter, Gauge, Healthcheck, Histogram, Metric, Timer, NANOS_PER_SEC};
use metrics_log::reporter::{render, Reading};
use metrics_log::{MemorySink, Registry, Reporter, Style};

fn registry_with_counter(name: &str, n: u64) -> Arc<Registry> {
    let registry = Arc::new(Registry::new());
    let c = Arc::new(Counter::new());
    c.inc(n);
    registry.register(name, c).unwrap();
    registry
}

/// Pull the `key:value` number out of a compact line.
fn field(line: &str, key: &str) -> f64 {
    let start = line.find(&format!(",{key}:")).unwrap() + key.len() + 2;
    let rest = &line[start..];
    let end = rest.find(',').unwrap_or(rest.len());
    rest[..end].trim().parse().unwrap()
}

#[test]
fn test_verbose_counter_block() {
    let registry = registry_with_counter("requests", 42);
    let sink = MemorySink::new();

    Reporter::new(registry, Style::Verbose, sink.clone()).report_once();

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "counter requests");
    assert!(lines[1].trim_end().ends_with("42"));
}

#[test]
fn test_compact_histogram_in_seconds() {
    let registry = Arc::new(Registry::new());
    let h = Arc::new(Histogram::new());
    for v in [10, 20, 30, 40, 50] {
        h.update(v);
    }
    registry.register("latency", h).unwrap();
    let sink = MemorySink::new();

    Reporter::new(registry, Style::Compact, sink.clone()).report_once();

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("hgram              latency,count:        5,"));
    // At two decimals nanosecond values collapse to zero seconds.
    assert!(lines[0].ends_with("min:0.00,mean:0.00,95%:0.00,99%: 0.00,max: 0.00"));
}

#[test]
fn test_compact_durations_match_verbose_over_same_snapshot() {
    let t = Timer::new();
    for ms in [120, 250, 900, 1_500, 2_750] {
        t.update(Duration::from_millis(ms));
    }
    let reading = Reading::take(&Metric::Timer(Arc::new(t))).unwrap();
    let Reading::Timer { stats, .. } = &reading else {
        panic!("expected a timer reading");
    };

    let compact = &render("io", &reading, Style::Compact)[0];
    let verbose = render("io", &reading, Style::Verbose);

    let verbose_min: f64 = verbose[2].split(':').nth(1).unwrap().trim().parse().unwrap();
    let verbose_max: f64 = verbose[3].split(':').nth(1).unwrap().trim().parse().unwrap();
    assert_eq!(verbose_min, stats.min as f64);
    assert_eq!(verbose_max, stats.max as f64);

    let close = |secs: f64, nanos: f64| (secs - nanos / NANOS_PER_SEC).abs() <= 0.005;
    assert!(close(field(compact, "min"), stats.min as f64));
    assert!(close(field(compact, "mean"), stats.mean));
    assert!(close(field(compact, "95%"), stats.p95()));
    assert!(close(field(compact, "99%"), stats.p99()));
    assert!(close(field(compact, "max"), stats.max as f64));
    assert_eq!(field(compact, "count"), 5.0);
}

#[test]
fn test_large_timer_value_renders_exactly() {
    let registry = Arc::new(Registry::new());
    let t = Arc::new(Timer::new());
    t.update(Duration::from_nanos(1_234_567_891));
    registry.register("slow", t).unwrap();
    let sink = MemorySink::new();

    Reporter::new(registry, Style::Verbose, sink.clone()).report_once();

    let lines = sink.lines();
    assert_eq!(lines[2], "  min:         1234567891");
    assert_eq!(lines[3], "  max:         1234567891");
    assert_eq!(lines[4], "  mean:        1234567891.00");
    assert_eq!(lines[9], "  99%:         1234567891.00");
}

#[test]
fn test_passing_healthcheck_shows_no_error_marker() {
    for style in [Style::Verbose, Style::Compact] {
        let registry = Arc::new(Registry::new());
        registry
            .register("db", Arc::new(Healthcheck::new(|h| h.healthy())))
            .unwrap();
        let sink = MemorySink::new();

        Reporter::new(registry, style, sink.clone()).report_once();

        let last = sink.lines().pop().unwrap();
        assert!(last.ends_with("error: none") || last.ends_with("error:       none"), "{last}");
    }
}

#[test]
fn test_empty_registry_writes_nothing() {
    let sink = MemorySink::new();
    let summary =
        Reporter::new(Arc::new(Registry::new()), Style::Verbose, sink.clone()).report_once();

    assert_eq!(summary.lines, 0);
    assert!(sink.is_empty());
}

#[test]
fn test_unknown_kind_is_skipped_silently() {
    let registry = registry_with_counter("requests", 1);
    let other: Arc<dyn Any + Send + Sync> = Arc::new(vec![1u8, 2, 3]);
    registry.register("mystery", Metric::Opaque(other)).unwrap();
    let sink = MemorySink::new();

    let summary = Reporter::new(registry, Style::Compact, sink.clone()).report_once();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.reported, 1);
    assert_eq!(sink.lines(), vec!["count             requests,count:        1"]);
}

#[test]
fn test_pass_while_instruments_change() {
    let registry = Arc::new(Registry::new());
    let counter = Arc::new(Counter::new());
    let gauge = Arc::new(Gauge::new());
    let hist = Arc::new(Histogram::new());
    registry.register("c", counter.clone()).unwrap();
    registry.register("g", gauge.clone()).unwrap();
    registry.register("h", hist.clone()).unwrap();

    let writer = thread::spawn(move || {
        for i in 0..20_000u64 {
            counter.inc(1);
            gauge.update(i as i64);
            hist.update(i);
        }
    });

    let sink = MemorySink::new();
    let mut reporter = Reporter::new(registry, Style::Compact, sink.clone());
    for _ in 0..50 {
        assert_eq!(reporter.report_once().reported, 3);
    }
    writer.join().unwrap();

    assert_eq!(sink.len(), 150);
}

#[tokio::test(start_paused = true)]
async fn test_one_pass_per_interval() {
    let registry = registry_with_counter("requests", 42);
    let sink = MemorySink::new();

    let handle =
        Reporter::new(registry, Style::Compact, sink.clone()).spawn(Duration::from_secs(10));
    tokio::time::sleep(Duration::from_secs(35)).await;
    handle.stop();

    assert_eq!(sink.len(), 3);

    // Nothing more once stopped.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(sink.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_log_entry_points() {
    let registry = registry_with_counter("requests", 7);
    let verbose = MemorySink::new();
    let compact = MemorySink::new();

    let interval = Duration::from_secs(1);
    let a = tokio::spawn(metrics_log::log(registry.clone(), interval, verbose.clone()));
    let b = tokio::spawn(metrics_log::log_compact(registry, interval, compact.clone()));
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    a.abort();
    b.abort();

    assert_eq!(verbose.len(), 4);
    assert_eq!(compact.len(), 2);
    assert_eq!(verbose.lines()[0], "counter requests");
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_never_reports() {
    let registry = registry_with_counter("requests", 7);
    let sink = MemorySink::new();

    let handle = Reporter::new(registry, Style::Verbose, sink.clone()).spawn(Duration::ZERO);
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(sink.is_empty());
    assert!(!handle.is_finished());
    handle.stop();
}
