// src/normalize.rs
//! Pure transforms shared by every source: whitespace cleanup, link resolution,
//! best-effort date parsing and the raw → canonical listing conversion.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use url::Url;

use crate::listing::{Listing, RawListing};

/// Returned by [`parse_date_guess`] when nothing could be parsed.
pub const UNKNOWN_WHEN: &str = "unknown";

/// Fixed-offset zone every timestamp is rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetZone {
    pub offset: FixedOffset,
    pub label: String,
}

impl TargetZone {
    /// `offset_minutes` east of UTC; out-of-range values fall back to UTC.
    pub fn new(offset_minutes: i32, label: impl Into<String>) -> Self {
        let offset = FixedOffset::east_opt(offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Self {
            offset,
            label: label.into(),
        }
    }

    /// Asia/Kolkata has no DST, so a fixed +05:30 is exact.
    pub fn ist() -> Self {
        Self::new(330, "IST")
    }

    /// "05 Oct 2025, 10:00 AM IST"
    pub fn format(&self, dt: &DateTime<FixedOffset>) -> String {
        format!(
            "{} {}",
            dt.with_timezone(&self.offset).format("%d %b %Y, %I:%M %p"),
            self.label
        )
    }
}

impl Default for TargetZone {
    fn default() -> Self {
        Self::ist()
    }
}

/// Collapse any whitespace run (newlines, tabs, nbsp) into one space and trim.
pub fn clean_text(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    re_ws.replace_all(s, " ").trim().to_string()
}

/// Resolve `href` against the source origin. Site-relative, protocol-relative and
/// absolute links are accepted; anything that is not http(s) afterwards is rejected.
///
/// Absolute http(s) links are returned exactly as written (no trailing slash or
/// percent-encoding rewrite), so ledger keys stay stable across versions.
pub fn resolve_link(origin: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if let Ok(abs) = Url::parse(href) {
        return matches!(abs.scheme(), "http" | "https").then(|| href.to_string());
    }
    let base = Url::parse(origin).ok()?;
    let joined = base.join(href).ok()?;
    match joined.scheme() {
        "http" | "https" => Some(joined.to_string()),
        _ => None,
    }
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
    "%d %b %Y %H:%M %z",
    "%d %B %Y %H:%M %z",
];

// Day before month wherever the order is ambiguous.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %I:%M %p",
    "%d.%m.%Y %H:%M",
    "%d %b %Y %H:%M",
    "%d %b %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%d %B %Y %I:%M %p",
    "%b %d %Y %H:%M",
    "%b %d %Y %I:%M %p",
    "%B %d %Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Best-effort parse of a free-text date/time.
///
/// Naive values are taken as local to `zone`, aware values are converted into it.
/// Returns [`UNKNOWN_WHEN`] instead of failing.
pub fn parse_date_guess(text: &str, zone: &TargetZone) -> String {
    guess_datetime(text, zone)
        .map(|dt| zone.format(&dt))
        .unwrap_or_else(|| UNKNOWN_WHEN.to_string())
}

fn guess_datetime(text: &str, zone: &TargetZone) -> Option<DateTime<FixedOffset>> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(dt.with_timezone(&zone.offset));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&cleaned) {
        return Some(dt.with_timezone(&zone.offset));
    }

    let s = simplify(&cleaned, &zone.label);
    for fmt in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Some(dt.with_timezone(&zone.offset));
        }
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    zone.offset.from_local_datetime(&naive).single()
}

/// Drop commas and ordinal suffixes, and a trailing label of the target zone,
/// so "Sunday, 5th Oct 2025, 10:00 AM IST" reads as "Sunday 5 Oct 2025 10:00 AM".
fn simplify(s: &str, zone_label: &str) -> String {
    static RE_ORD: OnceCell<Regex> = OnceCell::new();
    let re_ord =
        RE_ORD.get_or_init(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("static regex"));

    let mut out = re_ord.replace_all(s, "$1").replace(',', " ");
    out = clean_text(&out);

    if !zone_label.is_empty() {
        let lower = out.to_ascii_lowercase();
        let suffix = format!(" {}", zone_label.to_ascii_lowercase());
        if lower.ends_with(&suffix) {
            out.truncate(out.len() - suffix.len());
        }
    }

    strip_weekday(&out).to_string()
}

fn strip_weekday(s: &str) -> &str {
    const DAYS: &[&str] = &[
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "mon",
        "tue", "wed", "thu", "fri", "sat", "sun",
    ];
    let Some((first, rest)) = s.split_once(' ') else {
        return s;
    };
    if DAYS.contains(&first.to_ascii_lowercase().as_str()) {
        rest
    } else {
        s
    }
}

/// Where a raw candidate came from; drives host/location defaults and link resolution.
#[derive(Debug, Clone, Copy)]
pub struct Provenance<'a> {
    pub source: &'a str,
    pub origin: &'a str,
    pub default_location: &'a str,
}

/// Raw candidate → canonical listing. `None` when title or link is missing.
///
/// `when` becomes the canonical timestamp if it parses and stays as cleaned
/// free text otherwise (ranges such as "Oct 3 - 5" carry more than "unknown").
pub fn normalize_listing(raw: RawListing, from: Provenance<'_>, zone: &TargetZone) -> Option<Listing> {
    let title = raw.title.as_deref().map(clean_text).unwrap_or_default();
    if title.is_empty() {
        return None;
    }
    let url = raw
        .link
        .as_deref()
        .and_then(|href| resolve_link(from.origin, href))?;

    let host = raw
        .host
        .as_deref()
        .map(clean_text)
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| from.source.to_string());

    let when_raw = raw.when.as_deref().map(clean_text).unwrap_or_default();
    let when = if when_raw.is_empty() {
        when_raw
    } else {
        match guess_datetime(&when_raw, zone) {
            Some(dt) => zone.format(&dt),
            None => when_raw,
        }
    };

    let location = raw
        .location
        .as_deref()
        .map(clean_text)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| from.default_location.to_string());

    Some(Listing {
        title,
        host,
        when,
        location,
        url,
        source: from.source.to_string(),
    })
}
