//! hackathon-radar binary entrypoint.
//! Resolves configuration, wires the pipeline, then runs one cycle (`--once`) or
//! cycles on the configured interval until Ctrl-C.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hackathon_radar::telemetry::Metrics;
use hackathon_radar::{run_cycle, run_periodic, AppConfig, Pipeline};

/// `LOG_FORMAT=json` for machine-readable logs, compact text otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hackathon_radar=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Configuration errors are the only fatal ones, and only here.
    let cfg = AppConfig::from_env()?;
    tracing::info!(
        destination = %cfg.transport.describe(),
        sources = ?cfg.sources_enabled,
        interval_secs = cfg.interval.as_secs(),
        cap = cfg.max_items_per_cycle,
        state_file = %cfg.state_file.display(),
        "starting hackathon-radar"
    );

    let metrics = Metrics::init()?;
    let _metrics_task = match cfg.metrics_addr {
        Some(addr) => Some(metrics.serve(addr).await?),
        None => None,
    };

    let pipeline = Pipeline::from_config(&cfg)?;

    if std::env::args().any(|a| a == "--once") {
        let report = run_cycle(&pipeline).await;
        tracing::info!(?report, "single cycle done");
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("ctrl-c handler failed: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown requested");
    };
    run_periodic(&pipeline, cfg.interval, shutdown).await;
    Ok(())
}
