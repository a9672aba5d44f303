// tests/emit_scheduler.rs
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;

use hackathon_radar::normalize::TargetZone;
use hackathon_radar::{emit_pending, EmitPolicy, Ledger, Listing, Notification, Notifier};

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<Notification>>,
    down: Mutex<bool>,
}

impl Recorder {
    fn urls(&self) -> Vec<String> {
        self.sent.lock().iter().map(|n| n.url.clone()).collect()
    }
}

#[async_trait]
impl Notifier for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    async fn deliver(&self, n: &Notification) -> anyhow::Result<()> {
        if *self.down.lock() {
            return Err(anyhow!("transport down"));
        }
        self.sent.lock().push(n.clone());
        Ok(())
    }
}

fn listing(n: u32) -> Listing {
    Listing {
        title: format!("Hack {n}"),
        host: "Acme".into(),
        when: String::new(),
        location: "Pune".into(),
        url: format!("https://x.com/e{n}"),
        source: "Unstop".into(),
    }
}

fn policy(cap: usize) -> EmitPolicy {
    EmitPolicy {
        cap,
        pacing: Duration::ZERO,
    }
}

#[tokio::test]
async fn seen_listing_is_skipped_and_new_ones_are_posted() {
    let rec = Recorder::default();
    let ledger: Ledger = ["https://x.com/e1"].into_iter().collect();
    let items = vec![listing(1), listing(2), listing(3)];

    let (ledger, report) = emit_pending(&items, ledger, &rec, &policy(2), &TargetZone::ist()).await;

    assert_eq!(rec.urls(), vec!["https://x.com/e2", "https://x.com/e3"]);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.skipped_seen, 1);
    assert_eq!(report.deferred, 0);
    assert!(["https://x.com/e1", "https://x.com/e2", "https://x.com/e3"]
        .iter()
        .all(|u| ledger.is_delivered(u)));
}

#[tokio::test]
async fn nothing_is_delivered_twice_across_cycles() {
    let rec = Recorder::default();
    let items: Vec<Listing> = (1..=5).map(listing).collect();
    let zone = TargetZone::ist();

    let (ledger, first) = emit_pending(&items, Ledger::new(), &rec, &policy(3), &zone).await;
    assert_eq!(first.delivered, 3);
    assert_eq!(first.deferred, 2);

    let (ledger, second) = emit_pending(&items, ledger, &rec, &policy(3), &zone).await;
    assert_eq!(second.delivered, 2);
    assert_eq!(second.skipped_seen, 3);

    let (_, third) = emit_pending(&items, ledger, &rec, &policy(3), &zone).await;
    assert_eq!(third.delivered, 0);

    let mut urls = rec.urls();
    urls.dedup();
    assert_eq!(urls.len(), 5);
}

#[tokio::test]
async fn exactly_cap_posts_when_enough_are_pending() {
    for cap in [1usize, 4, 6] {
        let rec = Recorder::default();
        let items: Vec<Listing> = (0..10).map(listing).collect();
        let (ledger, report) = emit_pending(&items, Ledger::new(), &rec, &policy(cap), &TargetZone::ist()).await;
        assert_eq!(rec.urls().len(), cap);
        assert_eq!(ledger.len(), cap);
        assert_eq!(report.deferred, 10 - cap);
    }
}

#[tokio::test]
async fn transport_outage_leaves_everything_pending() {
    let rec = Recorder::default();
    *rec.down.lock() = true;
    let items = vec![listing(1), listing(2)];

    let (ledger, report) = emit_pending(&items, Ledger::new(), &rec, &policy(6), &TargetZone::ist()).await;
    assert_eq!(report.failed, 2);
    assert!(ledger.is_empty());

    *rec.down.lock() = false;
    let (ledger, report) = emit_pending(&items, ledger, &rec, &policy(6), &TargetZone::ist()).await;
    assert_eq!(report.delivered, 2);
    assert_eq!(ledger.len(), 2);
}

#[tokio::test]
async fn notification_carries_listing_fields_and_zone_timestamp() {
    let rec = Recorder::default();
    emit_pending(&[listing(7)], Ledger::new(), &rec, &policy(1), &TargetZone::ist()).await;

    let sent = rec.sent.lock();
    let n = &sent[0];
    assert_eq!(n.title, "Hack 7");
    assert_eq!(n.location, "Pune");
    assert_eq!(n.timestamp.offset().local_minus_utc(), 330 * 60);
    assert_eq!(n.description(), "**Host:** Acme\n**When:** TBA\n**Location:** Pune");
    assert!(n.footer().starts_with("Source: Unstop \u{2022} "));
}

#[tokio::test(start_paused = true)]
async fn pacing_follows_each_post_under_the_cap() {
    let rec = Recorder::default();
    let items: Vec<Listing> = (1..=3).map(listing).collect();
    let policy = EmitPolicy {
        cap: 6,
        pacing: Duration::from_secs(2),
    };
    let t0 = tokio::time::Instant::now();
    let (_, report) = emit_pending(&items, Ledger::new(), &rec, &policy, &TargetZone::ist()).await;
    assert_eq!(report.delivered, 3);
    // Three posts under a cap of six: three pauses.
    assert_eq!(t0.elapsed(), Duration::from_secs(6));
}
