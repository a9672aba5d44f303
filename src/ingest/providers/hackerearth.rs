// src/ingest/providers/hackerearth.rs
use super::{LinkRule, RegionRule, SourceProfile, TitleRule};

/// HackerEarth hackathon listing, pre-filtered to India by the query string.
pub fn profile() -> SourceProfile {
    SourceProfile {
        key: "hackerearth",
        label: "HackerEarth",
        listing_url: "https://www.hackerearth.com/challenges/hackathon/?country=india",
        origin: "https://www.hackerearth.com",
        card: ".challenge-card-modern, .challenge-card",
        title: TitleRule::Select("h3, .challenge-card__title"),
        link: LinkRule::FirstAnchor,
        host: Some(".company-name, .challenge-card-modern__company"),
        when: Some(".challenge-card__details"),
        location: None,
        default_location: "India",
        region: RegionRule::Scoped,
        title_keywords: &[],
    }
}
