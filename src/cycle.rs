// src/cycle.rs
//! One cycle: load ledger → gather sources → emission walk → save ledger once.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use metrics::{counter, gauge};

use crate::config::AppConfig;
use crate::emit::{emit_pending, EmitPolicy, EmitReport};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::ingest::providers::build_adapters;
use crate::ingest::types::SourceAdapter;
use crate::ingest::{ensure_metrics_described, gather};
use crate::ledger::{FileLedgerStore, LedgerStore};
use crate::normalize::TargetZone;
use crate::notify::{build_notifier, Notifier};
use crate::relevance::Gazetteer;

/// Everything a cycle needs. Built once at startup, immutable afterwards.
pub struct Pipeline {
    pub adapters: Vec<Box<dyn SourceAdapter>>,
    pub fetcher: Arc<dyn Fetcher>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<dyn LedgerStore>,
    pub policy: EmitPolicy,
    pub adapter_timeout: Duration,
    pub zone: TargetZone,
}

impl Pipeline {
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let gazetteer = Arc::new(Gazetteer::with_terms(&cfg.region_terms));
        let adapters = build_adapters(&cfg.sources_enabled, gazetteer, &cfg.zone);
        if adapters.is_empty() {
            tracing::warn!(enabled = ?cfg.sources_enabled, "no known sources enabled; cycles will post nothing");
        }

        let fetcher = HttpFetcher::new(&cfg.user_agent, cfg.request_timeout)?;
        let notifier: Arc<dyn Notifier> =
            Arc::from(build_notifier(&cfg.transport, cfg.request_timeout));

        Ok(Self {
            adapters,
            fetcher: Arc::new(fetcher),
            notifier,
            store: Arc::new(FileLedgerStore::new(cfg.state_file.clone())),
            policy: EmitPolicy {
                cap: cfg.max_items_per_cycle,
                pacing: cfg.pacing,
            },
            adapter_timeout: cfg.adapter_timeout,
            zone: cfg.zone.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub gathered: usize,
    pub emit: EmitReport,
    pub ledger_size: usize,
}

/// Run one full cycle. Never fails: sources, ledger I/O and the transport all
/// degrade to logged warnings.
pub async fn run_cycle(p: &Pipeline) -> CycleReport {
    ensure_metrics_described();

    let ledger = p.store.load().await;
    let listings = gather(&p.adapters, p.fetcher.as_ref(), p.adapter_timeout).await;

    let (ledger, emit) =
        emit_pending(&listings, ledger, p.notifier.as_ref(), &p.policy, &p.zone).await;

    p.store.save(&ledger).await;

    counter!("cycles_total").increment(1);
    gauge!("ledger_entries").set(ledger.len() as f64);
    gauge!("cycle_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    tracing::info!(
        gathered = listings.len(),
        skipped = emit.skipped_seen,
        failed = emit.failed,
        deferred = emit.deferred,
        "Posted {} items",
        emit.delivered
    );

    CycleReport {
        gathered: listings.len(),
        emit,
        ledger_size: ledger.len(),
    }
}
