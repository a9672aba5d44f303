// src/ingest/mod.rs
pub mod providers;
pub mod types;

use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

use crate::fetch::Fetcher;
use crate::ingest::types::{AdapterError, SourceAdapter};
use crate::listing::Listing;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "source_listings_total",
            "Listings admitted per source after normalization + region filter."
        );
        describe_counter!(
            "source_errors_total",
            "Source fetch/parse failures (source yielded nothing)."
        );
        describe_counter!(
            "aggregate_dedup_total",
            "Listings dropped because an earlier source had the same url."
        );
        describe_histogram!("source_fetch_ms", "Source fetch + parse time in milliseconds.");
        describe_counter!("deliveries_total", "Listings handed to the transport.");
        describe_counter!("delivery_failures_total", "Transport failures (listing stays pending).");
        describe_counter!("cycles_total", "Completed fetch → deliver cycles.");
        describe_gauge!("cycle_last_run_ts", "Unix ts when the last cycle finished.");
        describe_gauge!("ledger_entries", "Urls recorded as delivered.");
    });
}

/// Keep the first listing per `url`, preserving order. Returns (kept, dropped).
pub fn dedup_by_url(listings: Vec<Listing>) -> (Vec<Listing>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(listings.len());
    let mut keep = Vec::with_capacity(listings.len());
    let mut dropped = 0usize;
    for l in listings {
        if seen.insert(l.url.clone()) {
            keep.push(l);
        } else {
            dropped += 1;
        }
    }
    (keep, dropped)
}

/// Run one adapter under a time budget. Errors, timeouts and panics all become an
/// empty result here, so nothing a single site does can reach the rest of the cycle.
pub async fn run_adapter(
    adapter: &dyn SourceAdapter,
    fetch: &dyn Fetcher,
    budget: Duration,
) -> Vec<Listing> {
    // AssertUnwindSafe: the adapter and fetcher are only read, never left half-updated.
    let guarded = AssertUnwindSafe(adapter.extract(fetch)).catch_unwind();
    let res = match tokio::time::timeout(budget, guarded).await {
        Ok(Ok(res)) => res,
        Ok(Err(panic)) => Err(AdapterError::Panicked {
            adapter: adapter.name().to_string(),
            message: panic_message(panic.as_ref()),
        }),
        Err(_) => Err(AdapterError::Timeout {
            adapter: adapter.name().to_string(),
            secs: budget.as_secs(),
        }),
    };
    match res {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, source = adapter.name(), "source error");
            counter!("source_errors_total", "source" => adapter.name().to_string()).increment(1);
            Vec::new()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run every adapter in order, concatenate, and dedup by url (first seen wins).
pub async fn gather(
    adapters: &[Box<dyn SourceAdapter>],
    fetch: &dyn Fetcher,
    budget: Duration,
) -> Vec<Listing> {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for a in adapters {
        let mut v = run_adapter(a.as_ref(), fetch, budget).await;
        raw.append(&mut v);
    }

    let total = raw.len();
    let (kept, dropped) = dedup_by_url(raw);
    counter!("aggregate_dedup_total").increment(dropped as u64);
    tracing::info!(
        target: "ingest",
        sources = adapters.len(),
        total,
        kept = kept.len(),
        dedup = dropped,
        "sources gathered"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(url: &str, title: &str) -> Listing {
        Listing {
            title: title.into(),
            host: "H".into(),
            when: String::new(),
            location: "India".into(),
            url: url.into(),
            source: "S".into(),
        }
    }

    #[test]
    fn dedup_keeps_first_and_order() {
        let input = vec![
            listing("https://x.com/e1", "Hack One"),
            listing("https://x.com/e2", "Two"),
            listing("https://x.com/e1", "HACK ONE"),
            listing("https://x.com/e3", "Three"),
        ];
        let (kept, dropped) = dedup_by_url(input);
        assert_eq!(dropped, 1);
        let urls: Vec<&str> = kept.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x.com/e1", "https://x.com/e2", "https://x.com/e3"]);
        assert_eq!(kept[0].title, "Hack One");
    }

    #[test]
    fn dedup_is_idempotent() {
        let input = vec![
            listing("https://x.com/a", "A"),
            listing("https://x.com/a", "A2"),
            listing("https://x.com/b", "B"),
        ];
        let (once, _) = dedup_by_url(input.clone());
        let (again, dropped) = dedup_by_url(once.clone());
        assert_eq!(once, again);
        assert_eq!(dropped, 0);
        assert_eq!(dedup_by_url(input).0, once);
    }
}
