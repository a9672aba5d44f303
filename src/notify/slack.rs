use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use super::{Notification, Notifier};

pub struct SlackNotifier {
    webhook_url: String,
    client: Client,
    timeout: Duration,
}

impl SlackNotifier {
    pub fn new(url: String) -> Self {
        Self {
            webhook_url: url,
            client: Client::new(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Slack mrkdwn uses single `*` for bold and `<url|label>` for links.
fn slack_text(n: &Notification) -> String {
    format!(
        "*<{}|{}>*\n{}\n_{}_",
        n.url,
        n.title.replace(['<', '>', '|'], " "),
        n.description().replace("**", "*"),
        n.footer()
    )
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn deliver(&self, n: &Notification) -> Result<()> {
        let body = serde_json::json!({ "text": slack_text(n) });

        self.client
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("slack post")?
            .error_for_status()
            .context("slack non-2xx")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn text_uses_mrkdwn_link_and_bold() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let n = Notification {
            title: "Hack <Delhi>".into(),
            url: "https://unstop.com/h/1".into(),
            host: "Unstop".into(),
            when: "".into(),
            location: "India".into(),
            source: "Unstop".into(),
            timestamp: ist.with_ymd_and_hms(2025, 10, 5, 18, 30, 0).unwrap(),
        };
        let t = slack_text(&n);
        assert!(t.starts_with("*<https://unstop.com/h/1|Hack  Delhi >*\n"));
        assert!(t.contains("*Host:* Unstop\n*When:* TBA\n*Location:* India"));
        assert!(t.ends_with("_Source: Unstop \u{2022} 05 Oct 2025, 06:30 PM_"));
    }
}
