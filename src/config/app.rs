// src/config/app.rs
//! Process configuration: optional TOML file, then environment overrides.
//! Resolved once before the first cycle and never mutated afterwards.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::fetch::DEFAULT_USER_AGENT;
use crate::ingest::providers::SOURCE_KEYS;
use crate::normalize::TargetZone;
use crate::relevance::INDIA_TERMS;

pub const ENV_CONFIG_PATH: &str = "HACKATHON_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/hackathon_radar.toml";
pub const DEFAULT_STATE_FILE: &str = "posted_hackathons.json";
const MAX_TZ_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Everything the TOML file may set. Secrets (bot token, webhook urls) are env-only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub interval_hours: Option<f64>,
    pub max_items_per_cycle: Option<usize>,
    pub sources_enabled: Option<Vec<String>>,
    pub state_file: Option<PathBuf>,
    pub pacing_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub adapter_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub region_terms: Option<Vec<String>>,
    pub tz_offset_minutes: Option<i32>,
    pub tz_label: Option<String>,
    pub channel_id: Option<u64>,
    pub dry_run: Option<bool>,
    pub metrics_addr: Option<String>,
}

impl FileConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// 1) $HACKATHON_CONFIG_PATH (must exist)
    /// 2) config/hackathon_radar.toml if present
    /// 3) nothing
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        Ok(Self::default())
    }
}

/// Where delivered listings go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Log each item instead of posting it.
    DryRun,
    DiscordWebhook { url: String },
    DiscordChannel { token: String, channel_id: u64 },
    SlackWebhook { url: String },
}

impl TransportConfig {
    /// Destination description that is safe to log (no token, no webhook secret).
    pub fn describe(&self) -> String {
        match self {
            TransportConfig::DryRun => "dry-run (log only)".to_string(),
            TransportConfig::DiscordWebhook { .. } => "discord webhook".to_string(),
            TransportConfig::DiscordChannel { channel_id, .. } => {
                format!("discord channel {channel_id}")
            }
            TransportConfig::SlackWebhook { .. } => "slack webhook".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub transport: TransportConfig,
    pub interval: Duration,
    pub max_items_per_cycle: usize,
    pub sources_enabled: Vec<String>,
    pub state_file: PathBuf,
    pub pacing: Duration,
    pub request_timeout: Duration,
    pub adapter_timeout: Duration,
    pub user_agent: String,
    pub region_terms: Vec<String>,
    pub zone: TargetZone,
    pub metrics_addr: Option<SocketAddr>,
}

impl AppConfig {
    /// Config file (if any) + process environment.
    pub fn from_env() -> Result<Self> {
        let file = FileConfig::load_default()?;
        Self::resolve(file, |k| std::env::var(k).ok())
    }

    /// Merge the file layer with an environment lookup. Env wins field by field.
    pub fn resolve<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| env(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let interval_hours = parse_var::<f64>(&var, "SCRAPE_INTERVAL_HOURS")?
            .or(file.interval_hours)
            .unwrap_or(6.0);
        let interval = match Duration::try_from_secs_f64(interval_hours * 3600.0) {
            Ok(d) if !d.is_zero() => d,
            _ => bail!("SCRAPE_INTERVAL_HOURS must be a positive number of hours, got {interval_hours}"),
        };

        let max_items_per_cycle = parse_var::<usize>(&var, "MAX_ITEMS_PER_CYCLE")?
            .or(file.max_items_per_cycle)
            .unwrap_or(6);

        let sources_enabled = match var("SOURCES_ENABLED") {
            Some(list) => split_list(&list),
            None => file
                .sources_enabled
                .map(|v| split_list(&v.join(",")))
                .unwrap_or_else(|| SOURCE_KEYS.iter().map(|s| s.to_string()).collect()),
        };

        let state_file = var("STATE_FILE")
            .map(PathBuf::from)
            .or(file.state_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let pacing_ms = parse_var::<u64>(&var, "POST_PACING_MS")?
            .or(file.pacing_ms)
            .unwrap_or(2_000);
        let request_timeout_secs = parse_var::<u64>(&var, "REQUEST_TIMEOUT_SECS")?
            .or(file.request_timeout_secs)
            .unwrap_or(20)
            .max(1);
        let adapter_timeout_secs = parse_var::<u64>(&var, "ADAPTER_TIMEOUT_SECS")?
            .or(file.adapter_timeout_secs)
            .unwrap_or(60)
            .max(1);

        let user_agent = var("HTTP_USER_AGENT")
            .or(file.user_agent)
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let region_terms = file
            .region_terms
            .unwrap_or_else(|| INDIA_TERMS.iter().map(|s| s.to_string()).collect());

        let tz_offset_minutes = parse_var::<i32>(&var, "TZ_OFFSET_MINUTES")?
            .or(file.tz_offset_minutes)
            .unwrap_or(330);
        // FixedOffset needs strictly less than a day either way.
        if !(-MAX_TZ_OFFSET_MINUTES..=MAX_TZ_OFFSET_MINUTES).contains(&tz_offset_minutes) {
            bail!("TZ_OFFSET_MINUTES must be within ±{MAX_TZ_OFFSET_MINUTES}, got {tz_offset_minutes}");
        }
        let zone = TargetZone::new(
            tz_offset_minutes,
            var("TZ_LABEL").or(file.tz_label).unwrap_or_else(|| "IST".to_string()),
        );

        let metrics_addr = match var("METRICS_ADDR").or(file.metrics_addr) {
            Some(a) => Some(
                a.parse::<SocketAddr>()
                    .with_context(|| format!("invalid METRICS_ADDR {a:?}"))?,
            ),
            None => None,
        };

        let dry_run = var("DRY_RUN")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .or(file.dry_run)
            .unwrap_or(false);
        let channel_id = parse_var::<u64>(&var, "HACKATHON_CHANNEL_ID")?
            .or(file.channel_id)
            .unwrap_or(0);

        let transport = if dry_run {
            TransportConfig::DryRun
        } else if let Some(url) = var("DISCORD_WEBHOOK_URL") {
            TransportConfig::DiscordWebhook { url }
        } else if let (Some(token), true) = (var("DISCORD_TOKEN"), channel_id != 0) {
            TransportConfig::DiscordChannel { token, channel_id }
        } else if let Some(url) = var("SLACK_WEBHOOK_URL") {
            TransportConfig::SlackWebhook { url }
        } else {
            bail!(
                "missing DISCORD_TOKEN or HACKATHON_CHANNEL_ID \
                 (or set DISCORD_WEBHOOK_URL / SLACK_WEBHOOK_URL / DRY_RUN=1)"
            );
        };

        Ok(Self {
            transport,
            interval,
            max_items_per_cycle,
            sources_enabled,
            state_file,
            pacing: Duration::from_millis(pacing_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
            adapter_timeout: Duration::from_secs(adapter_timeout_secs),
            user_agent,
            region_terms,
            zone,
            metrics_addr,
        })
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("invalid {key} {raw:?}: {e}")),
        None => Ok(None),
    }
}

/// "HackerEarth, devpost,,MLH" → ["hackerearth", "devpost", "mlh"]
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
