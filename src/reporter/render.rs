use std::fmt;

use serde::{Deserialize, Serialize};

use super::reading::Reading;
use crate::metrics::{DistributionStats, MeterSnapshot, NANOS_PER_SEC};

/// Shown in place of a healthcheck error when there is none.
pub const NO_ERROR: &str = "none";

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// One labelled block per instrument, one field per line, native units.
    #[default]
    Verbose,
    /// One comma-separated line per instrument, durations in seconds.
    Compact,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Verbose => "verbose",
            Self::Compact => "compact",
        })
    }
}

/// Native time unit (nanoseconds) → seconds.
pub fn to_seconds(nanos: f64) -> f64 {
    nanos / NANOS_PER_SEC
}

/// Lay out one reading as sink lines.
pub fn render(name: &str, reading: &Reading, style: Style) -> Vec<String> {
    match style {
        Style::Verbose => verbose(name, reading),
        Style::Compact => vec![compact(name, reading)],
    }
}

// ─── Verbose ─────────────────────────────────────────────────────

fn verbose(name: &str, reading: &Reading) -> Vec<String> {
    match reading {
        Reading::Counter { count } => vec![
            format!("counter {name}"),
            format!("  count:       {count:9}"),
        ],
        Reading::Gauge { value } => vec![
            format!("gauge {name}"),
            format!("  value:       {value:9}"),
        ],
        Reading::GaugeFloat64 { value } => vec![
            format!("gauge {name}"),
            format!("  value:       {value:.6}"),
        ],
        Reading::Healthcheck { error } => vec![
            format!("healthcheck {name}"),
            format!("  error:       {}", error.as_deref().unwrap_or(NO_ERROR)),
        ],
        Reading::Histogram(stats) => {
            let mut lines = vec![format!("histogram {name}")];
            push_distribution(&mut lines, stats);
            lines
        }
        Reading::Meter(rates) => {
            let mut lines = vec![
                format!("meter {name}"),
                format!("  count:       {:9}", rates.count),
            ];
            push_rates(&mut lines, rates);
            lines
        }
        Reading::Timer { stats, rates } => {
            let mut lines = vec![format!("timer {name}")];
            push_distribution(&mut lines, stats);
            push_rates(&mut lines, rates);
            lines
        }
    }
}

fn push_distribution(lines: &mut Vec<String>, s: &DistributionStats) {
    lines.push(format!("  count:       {:9}", s.count));
    lines.push(format!("  min:         {:9}", s.min));
    lines.push(format!("  max:         {:9}", s.max));
    lines.push(format!("  mean:        {:12.2}", s.mean));
    lines.push(format!("  stddev:      {:12.2}", s.std_dev));
    lines.push(format!("  median:      {:12.2}", s.median()));
    lines.push(format!("  75%:         {:12.2}", s.p75()));
    lines.push(format!("  95%:         {:12.2}", s.p95()));
    lines.push(format!("  99%:         {:12.2}", s.p99()));
    lines.push(format!("  99.9%:       {:12.2}", s.p999()));
}

fn push_rates(lines: &mut Vec<String>, m: &MeterSnapshot) {
    lines.push(format!("  1-min rate:  {:12.2}", m.rate1));
    lines.push(format!("  5-min rate:  {:12.2}", m.rate5));
    lines.push(format!("  15-min rate: {:12.2}", m.rate15));
    lines.push(format!("  mean rate:   {:12.2}", m.rate_mean));
}

// ─── Compact ─────────────────────────────────────────────────────

fn compact(name: &str, reading: &Reading) -> String {
    match reading {
        Reading::Counter { count } => format!("count {name:>20},count:{count:9}"),
        Reading::Gauge { value } => format!("gauge {name:>20},value:{value:9}"),
        Reading::GaugeFloat64 { value } => format!("gauge {name:>20},value:{value:9.6}"),
        Reading::Healthcheck { error } => format!(
            "check {name:>20},error: {}",
            error.as_deref().unwrap_or(NO_ERROR)
        ),
        Reading::Histogram(s) => format!(
            "hgram {name:>20},count:{:9},{}",
            s.count,
            compact_durations(s)
        ),
        Reading::Meter(m) => format!(
            "meter {name:>20},count:{:9},1mrate:{:12.2},5mrate:{:12.2},meanrate:{:12.2}/s",
            m.count, m.rate1, m.rate5, m.rate_mean
        ),
        Reading::Timer { stats, rates } => format!(
            "timer {name:>20},count:{:9},meanrate:{:4.2}/s,{}",
            stats.count,
            rates.rate_mean,
            compact_durations(stats)
        ),
    }
}

/// `min`, `mean`, 95th, 99th and `max`, converted to seconds.
fn compact_durations(s: &DistributionStats) -> String {
    format!(
        "min:{:4.2},mean:{:4.2},95%:{:4.2},99%:{:5.2},max:{:5.2}",
        to_seconds(s.min as f64),
        to_seconds(s.mean),
        to_seconds(s.p95()),
        to_seconds(s.p99()),
        to_seconds(s.max as f64),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latency_stats() -> DistributionStats {
        DistributionStats {
            count: 5,
            min: 10,
            max: 50,
            mean: 30.0,
            std_dev: 14.14,
            percentiles: [30.0, 40.0, 50.0, 50.0, 50.0],
        }
    }

    fn rates() -> MeterSnapshot {
        MeterSnapshot {
            count: 120,
            rate1: 1.5,
            rate5: 1.25,
            rate15: 1.1,
            rate_mean: 2.0,
        }
    }

    #[test]
    fn test_verbose_counter() {
        let lines = render("requests", &Reading::Counter { count: 42 }, Style::Verbose);
        assert_eq!(lines, vec!["counter requests", "  count:              42"]);
    }

    #[test]
    fn test_verbose_gauges() {
        let lines = render("queue", &Reading::Gauge { value: -7 }, Style::Verbose);
        assert_eq!(lines[1], "  value:              -7");

        let lines = render("load", &Reading::GaugeFloat64 { value: 0.5 }, Style::Verbose);
        assert_eq!(lines, vec!["gauge load", "  value:       0.500000"]);
    }

    #[test]
    fn test_verbose_histogram_block() {
        let lines = render("latency", &Reading::Histogram(latency_stats()), Style::Verbose);

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "histogram latency");
        assert_eq!(lines[2], "  min:                10");
        assert_eq!(lines[4], "  mean:               30.00");
        assert_eq!(lines[6], "  median:             30.00");
        assert_eq!(lines[10], "  99.9%:              50.00");
    }

    #[test]
    fn test_verbose_timer_has_rates() {
        let reading = Reading::Timer {
            stats: latency_stats(),
            rates: rates(),
        };
        let lines = render("db", &reading, Style::Verbose);

        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "timer db");
        assert_eq!(lines[11], "  1-min rate:          1.50");
        assert_eq!(lines[14], "  mean rate:           2.00");
    }

    #[test]
    fn test_verbose_meter() {
        let lines = render("events", &Reading::Meter(rates()), Style::Verbose);
        assert_eq!(
            lines,
            vec![
                "meter events",
                "  count:             120",
                "  1-min rate:          1.50",
                "  5-min rate:          1.25",
                "  15-min rate:         1.10",
                "  mean rate:           2.00",
            ]
        );
    }

    #[test]
    fn test_compact_is_single_line() {
        let reading = Reading::Counter { count: 42 };
        let lines = render("requests", &reading, Style::Compact);
        assert_eq!(lines, vec!["count             requests,count:       42"]);
    }

    #[test]
    fn test_compact_histogram_in_seconds() {
        let stats = DistributionStats {
            count: 3,
            min: 250_000_000,
            max: 4_000_000_000,
            mean: 1_500_000_000.0,
            std_dev: 0.0,
            percentiles: [1e9, 2e9, 3e9, 3.5e9, 4e9],
        };
        let line = compact("render", &Reading::Histogram(stats));
        assert_eq!(
            line,
            concat!(
                "hgram               render,count:        3,",
                "min:0.25,mean:1.50,95%:3.00,99%: 3.50,max: 4.00",
            )
        );
    }

    #[test]
    fn test_compact_meter_and_timer() {
        let line = compact("events", &Reading::Meter(rates()));
        assert_eq!(
            line,
            concat!(
                "meter               events,count:      120,",
                "1mrate:        1.50,5mrate:        1.25,meanrate:        2.00/s",
            )
        );

        let reading = Reading::Timer {
            stats: DistributionStats::empty(),
            rates: rates(),
        };
        let line = compact("db", &reading);
        assert!(line.starts_with("timer                   db,count:        0,meanrate:2.00/s,"));
        assert!(line.ends_with("min:0.00,mean:0.00,95%:0.00,99%: 0.00,max: 0.00"));
    }

    #[test]
    fn test_no_error_marker_in_both_styles() {
        let ok = Reading::Healthcheck { error: None };
        assert_eq!(render("db", &ok, Style::Verbose)[1], "  error:       none");
        assert_eq!(
            render("db", &ok, Style::Compact),
            vec!["check                   db,error: none"]
        );

        let failing = Reading::Healthcheck {
            error: Some("timeout".into()),
        };
        assert_eq!(render("db", &failing, Style::Verbose)[1], "  error:       timeout");
    }
}
