use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use metrics_log::cli::{Cli, SinkKind};
use metrics_log::load_generator::{self, Workload};
use metrics_log::{Registry, Reporter, ReporterHandle, Style, TracingSink, WriterSink};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    cli.init_logging();

    // ── 1. Resolve config ────────────────────────────────────────
    let config = match cli.reporter_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── 2. Register instruments ──────────────────────────────────
    let registry = Arc::new(Registry::new());
    let workload = match Workload::register(&registry) {
        Ok(w) => w,
        Err(e) => {
            tracing::error!("cannot register demo metrics: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── 3. Start the load generator ──────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let duration = cli.duration_secs.map(Duration::from_secs);
    let load = tokio::spawn(load_generator::run(
        running.clone(),
        workload,
        cli.workers,
        duration,
    ));

    // ── 4. Start the reporter ────────────────────────────────────
    tracing::info!(
        interval_ms = config.interval_ms,
        style = %config.style,
        sink = ?cli.sink,
        workers = cli.workers,
        "reporting metrics"
    );
    let reporter = spawn_reporter(registry, config.style, cli.sink, config.interval());

    // ── 5. Run until the deadline or Ctrl-C ──────────────────────
    match duration {
        Some(d) => tokio::time::sleep(d).await,
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("cannot listen for Ctrl-C: {e}");
            }
        }
    }

    running.store(false, Ordering::SeqCst);
    reporter.stop();
    let _ = load.await;
    tracing::info!("stopped");

    ExitCode::SUCCESS
}

fn spawn_reporter(
    registry: Arc<Registry>,
    style: Style,
    sink: SinkKind,
    interval: Duration,
) -> ReporterHandle {
    match sink {
        SinkKind::Stdout => Reporter::new(registry, style, WriterSink::stdout()).spawn(interval),
        SinkKind::Stderr => Reporter::new(registry, style, WriterSink::stderr()).spawn(interval),
        SinkKind::Tracing => Reporter::new(registry, style, TracingSink).spawn(interval),
    }
}
