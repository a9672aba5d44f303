// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod cycle;
pub mod emit;
pub mod fetch;
pub mod ingest;
pub mod ledger;
pub mod listing;
pub mod normalize;
pub mod notify;
pub mod relevance;
pub mod scheduler;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, TransportConfig};
pub use crate::cycle::{run_cycle, CycleReport, Pipeline};
pub use crate::emit::{emit_pending, EmitPolicy, EmitReport};
pub use crate::ingest::{dedup_by_url, gather};
pub use crate::ledger::{FileLedgerStore, Ledger, LedgerStore};
pub use crate::listing::Listing;
pub use crate::notify::{Notification, Notifier};
pub use crate::relevance::is_region_text;
pub use crate::scheduler::run_periodic;
