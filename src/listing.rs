// src/listing.rs
use serde::{Deserialize, Serialize};

/// One canonical hackathon record.
///
/// `url` is the identity key: two listings with the same `url` are the same
/// listing no matter how the other fields differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub host: String,     // organizer, falls back to the source label
    pub when: String,     // canonical date, free text, or "" when unknown
    pub location: String, // free text
    pub url: String,      // absolute
    pub source: String,   // e.g. "Devpost", "MLH"
}

/// Raw candidate pulled out of a source page before cleaning.
/// Any field may still carry markup whitespace or a site-relative link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub title: Option<String>,
    pub link: Option<String>,
    pub host: Option<String>,
    pub when: Option<String>,
    pub location: Option<String>,
}
