// src/ledger.rs
//! Seen-ledger: which listing urls were already delivered.
//!
//! Loaded once per cycle, mutated in memory by the emission walk, saved once at the
//! end. Both directions fail soft: a missing or corrupt file reads as empty and a
//! failed write is logged, never raised.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// `url → delivered`, stored as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(BTreeMap<String, bool>);

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_delivered(&self, url: &str) -> bool {
        self.0.get(url).copied().unwrap_or(false)
    }

    pub fn mark_delivered(&mut self, url: impl Into<String>) {
        self.0.insert(url.into(), true);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Ledger {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut l = Ledger::new();
        for url in iter {
            l.mark_delivered(url);
        }
        l
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Never fails: anything unreadable is an empty ledger.
    async fn load(&self) -> Ledger;
    /// Best effort: failures are logged and swallowed.
    async fn save(&self, ledger: &Ledger);
}

/// JSON file on local disk. Writes go to a sibling temp file and are renamed into
/// place, so a crash mid-write leaves the previous ledger intact.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn try_save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let body = serde_json::to_vec(ledger).context("serializing ledger")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn load(&self) -> Ledger {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ledger::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ledger unreadable, starting empty");
                return Ledger::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ledger corrupt, starting empty");
                Ledger::new()
            }
        }
    }

    async fn save(&self, ledger: &Ledger) {
        if let Err(e) = self.try_save(ledger).await {
            tracing::warn!(path = %self.path.display(), "ledger save failed: {e:#}");
        }
    }
}

// --- Test helper ---

/// In-memory store; counts saves so tests can check the once-per-cycle commit.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    inner: std::sync::Mutex<(Ledger, usize)>,
}

impl MemoryLedgerStore {
    pub fn new(initial: Ledger) -> Self {
        Self {
            inner: std::sync::Mutex::new((initial, 0)),
        }
    }

    pub fn snapshot(&self) -> Ledger {
        self.inner.lock().map(|g| g.0.clone()).unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|g| g.1).unwrap_or_default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn load(&self) -> Ledger {
        self.snapshot()
    }

    async fn save(&self, ledger: &Ledger) {
        if let Ok(mut g) = self.inner.lock() {
            g.0 = ledger.clone();
            g.1 += 1;
        }
    }
}
