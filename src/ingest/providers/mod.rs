// src/ingest/providers/mod.rs
//! Listing sites. Each site is a [`SourceProfile`] (selectors + region rule) run by
//! the shared [`HtmlAdapter`]; adding a site means adding a profile file and one
//! line in [`profile_for`].

pub mod devfolio;
pub mod devpost;
pub mod hackerearth;
pub mod html;
pub mod mlh;
pub mod techgig;
pub mod unstop;

use std::sync::Arc;

use async_trait::async_trait;
use metrics::{counter, histogram};

use crate::fetch::Fetcher;
use crate::ingest::types::{AdapterError, SourceAdapter};
use crate::listing::Listing;
use crate::normalize::{normalize_listing, Provenance, TargetZone};
use crate::relevance::Gazetteer;

/// Every known source key, in default invocation order.
pub const SOURCE_KEYS: &[&str] = &["hackerearth", "devpost", "techgig", "devfolio", "unstop", "mlh"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRule {
    /// Whole card text is the title (cards that are a single `<a>`).
    CardText,
    Select(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRule {
    /// The card element carries the `href` itself.
    CardHref,
    /// First descendant `a[href]`, falling back to the card's own `href`.
    FirstAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRule {
    /// The listing page is already limited to the region.
    Scoped,
    /// Global listing: keep cards whose title mentions the region.
    Title,
    /// Global listing: keep cards whose location mentions the region.
    Location,
}

#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub key: &'static str,
    pub label: &'static str,
    pub listing_url: &'static str,
    pub origin: &'static str,
    pub card: &'static str,
    pub title: TitleRule,
    pub link: LinkRule,
    pub host: Option<&'static str>,
    pub when: Option<&'static str>,
    pub location: Option<&'static str>,
    pub default_location: &'static str,
    pub region: RegionRule,
    /// Title must contain one of these (case-insensitive); empty = no requirement.
    pub title_keywords: &'static [&'static str],
}

pub fn profile_for(key: &str) -> Option<SourceProfile> {
    match key {
        "hackerearth" => Some(hackerearth::profile()),
        "devpost" => Some(devpost::profile()),
        "techgig" => Some(techgig::profile()),
        "devfolio" => Some(devfolio::profile()),
        "unstop" => Some(unstop::profile()),
        "mlh" => Some(mlh::profile()),
        _ => None,
    }
}

pub struct HtmlAdapter {
    profile: SourceProfile,
    gazetteer: Arc<Gazetteer>,
    zone: TargetZone,
}

impl HtmlAdapter {
    pub fn new(profile: SourceProfile, gazetteer: Arc<Gazetteer>, zone: TargetZone) -> Self {
        Self {
            profile,
            gazetteer,
            zone,
        }
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    /// Parse a fetched page into admitted listings.
    pub fn listings_from_page(&self, body: &str) -> Result<Vec<Listing>, AdapterError> {
        let raw = html::extract_candidates(&self.profile, body)?;
        let from = Provenance {
            source: self.profile.label,
            origin: self.profile.origin,
            default_location: self.profile.default_location,
        };
        Ok(raw
            .into_iter()
            .filter_map(|r| normalize_listing(r, from, &self.zone))
            .filter(|l| self.admits(l))
            .collect())
    }

    fn admits(&self, l: &Listing) -> bool {
        if !self.profile.title_keywords.is_empty() {
            let title = l.title.to_lowercase();
            if !self.profile.title_keywords.iter().any(|k| title.contains(k)) {
                return false;
            }
        }
        match self.profile.region {
            RegionRule::Scoped => true,
            RegionRule::Title => self.gazetteer.matches(&l.title),
            RegionRule::Location => self.gazetteer.matches(&l.location),
        }
    }
}

#[async_trait]
impl SourceAdapter for HtmlAdapter {
    fn name(&self) -> &str {
        self.profile.label
    }

    async fn extract(&self, fetch: &dyn Fetcher) -> Result<Vec<Listing>, AdapterError> {
        let t0 = std::time::Instant::now();
        let body = fetch.get_text(self.profile.listing_url).await?;
        let out = self.listings_from_page(&body)?;

        histogram!("source_fetch_ms", "source" => self.profile.key)
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("source_listings_total", "source" => self.profile.key).increment(out.len() as u64);
        tracing::debug!(source = self.profile.label, count = out.len(), "source extracted");
        Ok(out)
    }
}

/// Adapters for the enabled keys, in the given order. Keys are trimmed and
/// lower-cased; unknown and repeated keys are skipped.
pub fn build_adapters(
    enabled: &[String],
    gazetteer: Arc<Gazetteer>,
    zone: &TargetZone,
) -> Vec<Box<dyn SourceAdapter>> {
    let mut seen: Vec<String> = Vec::new();
    let mut out: Vec<Box<dyn SourceAdapter>> = Vec::new();
    for key in enabled {
        let key = key.trim().to_lowercase();
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        match profile_for(&key) {
            Some(profile) => {
                out.push(Box::new(HtmlAdapter::new(
                    profile,
                    gazetteer.clone(),
                    zone.clone(),
                )));
                seen.push(key);
            }
            None => tracing::debug!(source = %key, "unknown source skipped"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_every_key() {
        for key in SOURCE_KEYS {
            let p = profile_for(key).unwrap();
            assert_eq!(&p.key, key);
            assert!(p.listing_url.starts_with(p.origin));
        }
        assert!(profile_for("meetup").is_none());
    }

    #[test]
    fn build_skips_unknown_and_duplicate_keys() {
        let enabled: Vec<String> = [" MLH", "meetup", "devpost", "mlh", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let adapters = build_adapters(&enabled, Arc::new(Gazetteer::default()), &TargetZone::ist());
        let names: Vec<&str> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["MLH", "Devpost"]);
    }

    #[test]
    fn three_sources_are_region_filtered() {
        let filtered: Vec<&str> = SOURCE_KEYS
            .iter()
            .filter_map(|k| profile_for(k))
            .filter(|p| p.region != RegionRule::Scoped)
            .map(|p| p.key)
            .collect();
        assert_eq!(filtered, vec!["devfolio", "unstop", "mlh"]);
    }
}
