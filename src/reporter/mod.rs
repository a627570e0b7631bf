pub mod reading;
pub mod render;

use std::any::Any;
use std::future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};

pub use reading::Reading;
pub use render::{render, Style, NO_ERROR};

use crate::metrics::MetricSource;
use crate::sink::LogSink;

// ─── Public entry points ─────────────────────────────────────────

/// Report every instrument in `registry` every `interval`, one labelled
/// block per instrument. Never returns.
pub async fn log<R, S>(registry: Arc<R>, interval: Duration, sink: S)
where
    R: MetricSource,
    S: LogSink,
{
    Reporter::new(registry, Style::Verbose, sink).run(interval).await
}

/// Like [`log`], but one line per instrument with durations in seconds.
pub async fn log_compact<R, S>(registry: Arc<R>, interval: Duration, sink: S)
where
    R: MetricSource,
    S: LogSink,
{
    Reporter::new(registry, Style::Compact, sink).run(interval).await
}

// ─── Reporter ────────────────────────────────────────────────────

/// Drives reporting passes over a [`MetricSource`].
///
/// A pass reads every instrument, renders it in the chosen [`Style`] and
/// writes the lines to the sink. Passes never overlap: the next tick is
/// only awaited once the current pass has finished.
pub struct Reporter<R, S> {
    source: Arc<R>,
    style: Style,
    sink: S,
}

/// What one pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Instruments rendered.
    pub reported: usize,
    /// Entries of a kind the renderer does not know.
    pub skipped: usize,
    /// Instruments abandoned because reading them panicked.
    pub faulted: usize,
    /// Lines handed to the sink, whether or not the write succeeded.
    pub lines: usize,
}

/// Cancellation handle for a reporter started with [`Reporter::spawn`].
#[derive(Debug)]
pub struct ReporterHandle {
    task: JoinHandle<()>,
}

impl ReporterHandle {
    /// Stop reporting. A pass already in progress is not interrupted;
    /// no further pass starts.
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<R, S> Reporter<R, S>
where
    R: MetricSource,
    S: LogSink,
{
    pub fn new(source: Arc<R>, style: Style, sink: S) -> Self {
        Self {
            source,
            style,
            sink,
        }
    }

    /// Run a single reporting pass right now.
    pub fn report_once(&mut self) -> PassSummary {
        let mut summary = PassSummary::default();

        for (name, metric) in self.source.entries() {
            // A probe may panic; that costs this one instrument only.
            let reading = match panic::catch_unwind(AssertUnwindSafe(|| Reading::take(&metric))) {
                Ok(Some(reading)) => reading,
                Ok(None) => {
                    summary.skipped += 1;
                    continue;
                }
                Err(cause) => {
                    tracing::warn!(
                        metric = %name,
                        kind = metric.kind(),
                        "instrument read panicked: {}",
                        panic_message(cause.as_ref())
                    );
                    summary.faulted += 1;
                    continue;
                }
            };

            for line in render(&name, &reading, self.style) {
                if let Err(e) = self.sink.write_line(&line) {
                    tracing::debug!(metric = %name, error = %e, "dropped report line");
                }
                summary.lines += 1;
            }
            summary.reported += 1;
        }

        summary
    }

    /// One pass per item of `ticks`, until the stream ends.
    pub async fn run_with<St>(&mut self, ticks: St)
    where
        St: Stream,
    {
        tokio::pin!(ticks);
        while ticks.next().await.is_some() {
            let started = Instant::now();
            let summary = self.report_once();
            tracing::trace!(
                style = %self.style,
                reported = summary.reported,
                skipped = summary.skipped,
                faulted = summary.faulted,
                lines = summary.lines,
                elapsed_us = started.elapsed().as_micros() as u64,
                "reporting pass done"
            );
        }
    }

    /// One pass every `interval`, forever. The first pass happens one
    /// interval from now.
    ///
    /// A zero interval has no schedule, so the future just stays pending.
    pub async fn run(&mut self, interval: Duration) {
        if interval.is_zero() {
            tracing::warn!("zero reporting interval, no passes will run");
            return future::pending().await;
        }
        self.run_with(ticker(interval)).await
    }
}

impl<R, S> Reporter<R, S>
where
    R: MetricSource + Send + Sync + 'static,
    S: LogSink + 'static,
{
    /// Move the reporter onto its own task.
    pub fn spawn(mut self, interval: Duration) -> ReporterHandle {
        ReporterHandle {
            task: tokio::spawn(async move { self.run(interval).await }),
        }
    }
}

// ─── Internals ───────────────────────────────────────────────────

/// Periodic ticks starting one `interval` from now. Ticks missed while a
/// pass runs long are skipped rather than replayed.
fn ticker(interval: Duration) -> IntervalStream {
    let mut interval_timer = tokio::time::interval_at(Instant::now() + interval, interval);
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    IntervalStream::new(interval_timer)
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(s) = cause.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
