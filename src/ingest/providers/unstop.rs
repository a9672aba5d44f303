// src/ingest/providers/unstop.rs
use super::{LinkRule, RegionRule, SourceProfile, TitleRule};

pub fn profile() -> SourceProfile {
    SourceProfile {
        key: "unstop",
        label: "Unstop",
        listing_url: "https://unstop.com/hackathons",
        origin: "https://unstop.com",
        card: "a.event-card",
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
