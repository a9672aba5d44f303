// src/ingest/providers/devpost.rs
use super::{LinkRule, RegionRule, SourceProfile, TitleRule};

pub fn profile() -> SourceProfile {
    SourceProfile {
        key: "devpost",
        label: "Devpost",
        listing_url: "https://devpost.com/hackathons?search=india&sort_by=recent",
        origin: "https://devpost.com",
        card: ".hackathon-tile, .challenge-listing",
        title: TitleRule::Select(".title, h3"),
        link: LinkRule::FirstAnchor,
        host: Some(".organizer, .subtitle"),
        when: Some(".submission-period, .dates"),
        location: None,
        default_location: "India / Online",
        region: RegionRule::Scoped,
        title_keywords: &[],
    }
}
