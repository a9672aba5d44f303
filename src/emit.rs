// src/emit.rs
//! # Emission walk
//! Walks gathered listings in order and hands not-yet-delivered ones to the
//! transport, at most `cap` per cycle, pausing `pacing` between posts.
//!
//! A listing is marked in the ledger only after the transport accepted it. Failed
//! listings stay pending and are retried next cycle; the walk moves on.

use std::time::Duration;

use chrono::Utc;
use metrics::counter;

use crate::ledger::Ledger;
use crate::listing::Listing;
use crate::normalize::TargetZone;
use crate::notify::{Notification, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitPolicy {
    pub cap: usize,
    pub pacing: Duration,
}

impl Default for EmitPolicy {
    fn default() -> Self {
        Self {
            cap: 6,
            pacing: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub delivered: usize,
    pub skipped_seen: usize,
    pub failed: usize,
    /// Pending listings left for the next cycle because the cap was reached.
    pub deferred: usize,
}

pub async fn emit_pending(
    listings: &[Listing],
    mut ledger: Ledger,
    notifier: &dyn Notifier,
    policy: &EmitPolicy,
    zone: &TargetZone,
) -> (Ledger, EmitReport) {
    let mut report = EmitReport::default();

    for (idx, listing) in listings.iter().enumerate() {
        if ledger.is_delivered(&listing.url) {
            report.skipped_seen += 1;
            continue;
        }
        if report.delivered >= policy.cap {
            report.deferred = listings[idx..]
                .iter()
                .filter(|l| !ledger.is_delivered(&l.url))
                .count();
            break;
        }

        let item = Notification::from_listing(listing, Utc::now().with_timezone(&zone.offset));
        match notifier.deliver(&item).await {
            Ok(()) => {
                ledger.mark_delivered(listing.url.clone());
                report.delivered += 1;
                counter!("deliveries_total", "transport" => notifier.name()).increment(1);
                tracing::info!(url = %listing.url, source = %listing.source, "delivered");

                if report.delivered < policy.cap && !policy.pacing.is_zero() {
                    tokio::time::sleep(policy.pacing).await;
                }
            }
            Err(e) => {
                report.failed += 1;
                counter!("delivery_failures_total", "transport" => notifier.name()).increment(1);
                tracing::warn!(url = %listing.url, error = %format!("{e:#}"), "send error");
            }
        }
    }

    (ledger, report)
}
