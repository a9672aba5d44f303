// src/ingest/providers/techgig.rs
use super::{LinkRule, RegionRule, SourceProfile, TitleRule};

/// TechGig is an Indian platform, but its challenge page mixes in quizzes and
/// webinars; only links whose text names a hackathon or challenge are kept.
pub fn profile() -> SourceProfile {
    SourceProfile {
        key: "techgig",
        label: "TechGig",
        listing_url: "https://www.techgig.com/challenge",
        origin: "https://www.techgig.com",
        card: "a[href*='/challenge/']",
        title: TitleRule::CardText,
        link: LinkRule::CardHref,
        host: None,
        when: None,
        location: None,
        default_location: "India / Online",
        region: RegionRule::Scoped,
        title_keywords: &["hackathon", "challenge"],
    }
}
