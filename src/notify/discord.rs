use super::{Notification, Notifier};
use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

const DISCORD_API: &str = "https://discord.com/api/v10";
const EMBED_TITLE_MAX: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscordTarget {
    /// Post as the bot into a channel (needs `Send Messages` + `Embed Links`).
    Channel { token: String, channel_id: u64 },
    Webhook(String),
}

#[derive(Clone)]
pub struct DiscordNotifier {
    target: DiscordTarget,
    api_base: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl DiscordNotifier {
    pub fn new(target: DiscordTarget) -> Self {
        Self {
            target,
            api_base: DISCORD_API.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Bot-channel mode only; webhook urls are already absolute.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        match &self.target {
            DiscordTarget::Channel { channel_id, .. } => {
                format!("{}/channels/{channel_id}/messages", self.api_base)
            }
            DiscordTarget::Webhook(url) => url.clone(),
        }
    }

    fn backoff(attempt: u8) -> Duration {
        Duration::from_millis(500u64 << (attempt - 1))
    }

    async fn post_embed(&self, payload: &DiscordMessage) -> Result<()> {
        let url = self.endpoint();
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let mut req = self.client.post(&url).timeout(self.timeout).json(payload);
            if let DiscordTarget::Channel { token, .. } = &self.target {
                req = req.header(reqwest::header::AUTHORIZATION, format!("Bot {token}"));
            }

            match req.send().await {
                Ok(rsp) => {
                    let status = rsp.status();
                    if status.is_success() {
                        return Ok(());
                    }
                    let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    if retryable && attempt < self.max_retries {
                        let wait = retry_after(&rsp).unwrap_or_else(|| Self::backoff(attempt));
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    return Err(anyhow!("Discord HTTP error: {status}"));
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Self::backoff(attempt)).await;
                        continue;
                    }
                    return Err(anyhow!("Discord request failed: {e}"));
                }
            }
        }
    }
}

/// Discord sends `Retry-After` in (possibly fractional) seconds on 429.
fn retry_after(rsp: &reqwest::Response) -> Option<Duration> {
    rsp.headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(|s| Duration::from_secs_f64(s.min(60.0)))
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn deliver(&self, n: &Notification) -> Result<()> {
        self.post_embed(&DiscordMessage::embed(n)).await
    }
}

#[derive(Serialize, Debug)]
struct EmbedFooter {
    text: String,
}

#[derive(Serialize, Debug)]
struct DiscordEmbed {
    title: String,
    url: String,
    description: String,
    footer: EmbedFooter,
}

#[derive(Serialize, Debug)]
struct DiscordMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    embeds: Vec<DiscordEmbed>,
}

impl DiscordMessage {
    fn embed(n: &Notification) -> Self {
        Self {
            content: None,
            embeds: vec![DiscordEmbed {
                title: n.title.chars().take(EMBED_TITLE_MAX).collect(),
                url: n.url.clone(),
                description: n.description(),
                footer: EmbedFooter { text: n.footer() },
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn sample(title: &str) -> Notification {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        Notification {
            title: title.into(),
            url: "https://devpost.com/h/1".into(),
            host: "Acme".into(),
            when: "05 Oct 2025, 10:00 AM IST".into(),
            location: "India / Online".into(),
            source: "Devpost".into(),
            timestamp: ist.with_ymd_and_hms(2025, 10, 1, 9, 5, 0).unwrap(),
        }
    }

    #[test]
    fn embed_payload_shape() {
        let v = serde_json::to_value(DiscordMessage::embed(&sample("Build for Bharat"))).unwrap();
        assert!(v.get("content").is_none());
        let e = &v["embeds"][0];
        assert_eq!(e["title"], "Build for Bharat");
        assert_eq!(e["url"], "https://devpost.com/h/1");
        assert_eq!(
            e["description"],
            "**Host:** Acme\n**When:** 05 Oct 2025, 10:00 AM IST\n**Location:** India / Online"
        );
        assert_eq!(e["footer"]["text"], "Source: Devpost \u{2022} 01 Oct 2025, 09:05 AM");
    }

    #[test]
    fn long_titles_are_clipped() {
        let m = DiscordMessage::embed(&sample(&"x".repeat(400)));
        assert_eq!(m.embeds[0].title.chars().count(), EMBED_TITLE_MAX);
    }

    #[test]
    fn endpoints_per_target() {
        let bot = DiscordNotifier::new(DiscordTarget::Channel {
            token: "t".into(),
            channel_id: 99,
        });
        assert_eq!(bot.endpoint(), "https://discord.com/api/v10/channels/99/messages");
        let hook = DiscordNotifier::new(DiscordTarget::Webhook("https://discord.test/wh".into()));
        assert_eq!(hook.endpoint(), "https://discord.test/wh");

        let local = DiscordNotifier::new(DiscordTarget::Channel {
            token: "t".into(),
            channel_id: 5,
        })
        .with_api_base("http://127.0.0.1:9/api/");
        assert_eq!(local.endpoint(), "http://127.0.0.1:9/api/channels/5/messages");
    }
}
