// src/ingest/providers/mlh.rs
use super::{LinkRule, RegionRule, SourceProfile, TitleRule};

/// MLH season page lists events worldwide; the card's location line decides.
// TODO: derive the season year from the current date instead of pinning 2025.
pub fn profile() -> SourceProfile {
    SourceProfile {
        key: "mlh",
        label: "MLH",
        listing_url: "https://mlh.io/seasons/2025/events",
        origin: "https://mlh.io",
        card: ".event-wrapper",
        title: TitleRule::Select("h3"),
        link: LinkRule::FirstAnchor,
        host: None,
        when: Some(".event-date"),
        location: Some(".event-location"),
        default_location: "",
        region: RegionRule::Location,
        title_keywords: &[],
    }
}
