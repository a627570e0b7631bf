//! Command-line interface for the demo binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::ReporterConfig;
use crate::error::Result;
use crate::reporter::Style;

/// Where report lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Timestamped lines on stdout
    Stdout,
    /// Timestamped lines on stderr
    Stderr,
    /// `info` events through the tracing subscriber
    Tracing,
}

/// Periodically log a live set of demo metrics.
#[derive(Parser, Debug)]
#[command(name = "metrics-log")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON reporter config; flags below override it
    #[arg(short, long, env = "METRICS_LOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Time between reporting passes in milliseconds
    #[arg(long, env = "METRICS_LOG_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Output layout
    #[arg(long, value_enum, env = "METRICS_LOG_STYLE")]
    pub style: Option<Style>,

    /// Report destination
    #[arg(long, value_enum, default_value = "stdout", env = "METRICS_LOG_SINK")]
    pub sink: SinkKind,

    /// Number of concurrent load-generator tasks
    #[arg(long, default_value = "4")]
    pub workers: u32,

    /// Stop after this many seconds (default: run until Ctrl-C)
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, env = "METRICS_LOG_DEBUG")]
    pub debug: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Resolve the reporter config:
    /// 1. CLI flags / environment (highest priority)
    /// 2. Config file
    /// 3. Defaults
    pub fn reporter_config(&self) -> Result<ReporterConfig> {
        let mut config = match &self.config {
            Some(path) => ReporterConfig::from_json_file(path)?,
            None => ReporterConfig::default(),
        };
        if let Some(ms) = self.interval_ms {
            config.interval_ms = ms;
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        config.validate()?;
        Ok(config)
    }

    /// Initialize logging. `RUST_LOG` wins over `--debug`.
    pub fn init_logging(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let level = if self.debug { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).compact())
            .try_init();
    }
}
