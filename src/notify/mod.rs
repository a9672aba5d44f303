// src/notify/mod.rs
pub mod discord;
pub mod dry_run;
pub mod slack;

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};

use crate::config::TransportConfig;
use crate::listing::Listing;

pub use discord::{DiscordNotifier, DiscordTarget};
pub use dry_run::LogNotifier;
pub use slack::SlackNotifier;

/// One listing as handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub url: String,
    pub host: String,
    pub when: String,
    pub location: String,
    pub source: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl Notification {
    pub fn from_listing(l: &Listing, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            title: l.title.clone(),
            url: l.url.clone(),
            host: l.host.clone(),
            when: l.when.clone(),
            location: l.location.clone(),
            source: l.source.clone(),
            timestamp,
        }
    }

    /// Host / When / Location block shared by the chat transports.
    pub fn description(&self) -> String {
        format!(
            "**Host:** {}\n**When:** {}\n**Location:** {}",
            or_placeholder(&self.host, "Unknown"),
            or_placeholder(&self.when, "TBA"),
            or_placeholder(&self.location, "Unknown"),
        )
    }

    /// "Source: Devpost • 05 Oct 2025, 10:00 AM"
    pub fn footer(&self) -> String {
        format!(
            "Source: {} \u{2022} {}",
            self.source,
            self.timestamp.format("%d %b %Y, %I:%M %p")
        )
    }
}

fn or_placeholder<'a>(s: &'a str, placeholder: &'a str) -> &'a str {
    if s.trim().is_empty() {
        placeholder
    } else {
        s
    }
}

/// Publishes one item to the configured destination. No pacing here: the
/// emission walk owns rate limiting.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn deliver(&self, n: &Notification) -> Result<()>;
}

pub fn build_notifier(transport: &TransportConfig, timeout: Duration) -> Box<dyn Notifier> {
    let secs = timeout.as_secs().max(1);
    match transport {
        TransportConfig::DryRun => Box::new(LogNotifier),
        TransportConfig::DiscordWebhook { url } => Box::new(
            DiscordNotifier::new(DiscordTarget::Webhook(url.clone())).with_timeout(secs),
        ),
        TransportConfig::DiscordChannel { token, channel_id } => Box::new(
            DiscordNotifier::new(DiscordTarget::Channel {
                token: token.clone(),
                channel_id: *channel_id,
            })
            .with_timeout(secs),
        ),
        TransportConfig::SlackWebhook { url } => {
            Box::new(SlackNotifier::new(url.clone()).with_timeout(secs))
        }
    }
}
