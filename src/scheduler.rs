// src/scheduler.rs
use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::cycle::{run_cycle, Pipeline};

/// Run cycles back to back on a fixed interval until `shutdown` resolves.
///
/// The first cycle starts immediately. A cycle that overruns the interval delays
/// the next tick instead of stacking up, so cycles never overlap. If shutdown
/// lands mid-cycle the cycle is dropped before its ledger commit.
/// Returns the number of completed cycles.
pub async fn run_periodic<F>(pipeline: &Pipeline, every: Duration, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    // interval() rejects a zero period.
    let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut completed = 0usize;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::warn!("shutdown during cycle; ledger left at last commit");
                break;
            }
            report = run_cycle(pipeline) => {
                completed += 1;
                tracing::debug!(cycle = completed, delivered = report.emit.delivered, "cycle finished");
            }
        }
    }

    tracing::info!(cycles = completed, "scheduler stopped");
    completed
}
