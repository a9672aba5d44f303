// src/ingest/providers/devfolio.rs
use super::{LinkRule, RegionRule, SourceProfile, TitleRule};

pub fn profile() -> SourceProfile {
    SourceProfile {
        key: "devfolio",
        label: "Devfolio",
        listing_url: "https://devfolio.co/hackathons",
        origin: "https://devfolio.co",
        card: "a[href*='/hackathons/']",
        title: TitleRule::CardText,
        link: LinkRule::CardHref,
        host: None,
        when: None,
        location: None,
        default_location: "India",
        region: RegionRule::Title,
        title_keywords: &[],
    }
}
