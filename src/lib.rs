//! Periodic, human-readable metrics reporting.
//!
//! A [`Reporter`](reporter::Reporter) wakes on a fixed interval, takes a
//! consistent read of every instrument in a [`Registry`](metrics::Registry)
//! and writes the result as text lines to a [`LogSink`](sink::LogSink),
//! either as one labelled block per instrument ([`Style::Verbose`]) or as
//! one line per instrument ([`Style::Compact`]).

pub mod cli;
pub mod config;
pub mod error;
pub mod load_generator;
pub mod metrics;
pub mod reporter;
pub mod sink;

pub use config::ReporterConfig;
pub use error::{Error, Result};
pub use metrics::{Metric, MetricSource, Registry};
pub use reporter::{log, log_compact, Reporter, ReporterHandle, Style};
pub use sink::{LogSink, MemorySink, TracingSink, WriterSink};
