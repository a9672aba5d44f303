// src/notify/dry_run.rs
use anyhow::Result;

use super::{Notification, Notifier};

/// Dry-run sink: every item goes to the log and counts as delivered.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, n: &Notification) -> Result<()> {
        tracing::info!(
            target: "notify",
            title = %n.title,
            url = %n.url,
            host = %n.host,
            when = %n.when,
            location = %n.location,
            source = %n.source,
            "dry-run delivery"
        );
        Ok(())
    }
}
