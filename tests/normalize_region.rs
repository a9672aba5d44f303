// tests/normalize_region.rs
use hackathon_radar::is_region_text;
use hackathon_radar::normalize::{clean_text, parse_date_guess, resolve_link, TargetZone, UNKNOWN_WHEN};

#[test]
fn region_text_examples() {
    assert!(is_region_text("Hackathon in Bangalore"));
    assert!(is_region_text("NOIDA devs meetup"));
    assert!(is_region_text("#HackBengaluru2025"));
    assert!(!is_region_text("Global AI Challenge"));
    assert!(!is_region_text(""));
}

#[test]
fn whitespace_collapses() {
    assert_eq!(clean_text("  Hack \n\t Delhi  "), "Hack Delhi");
    assert_eq!(clean_text("\n \t"), "");
}

#[test]
fn relative_and_absolute_links() {
    let origin = "https://unstop.com";
    assert_eq!(
        resolve_link(origin, "/hackathons/x-1").as_deref(),
        Some("https://unstop.com/hackathons/x-1")
    );
    assert_eq!(
        resolve_link(origin, "https://devpost.com/h").as_deref(),
        Some("https://devpost.com/h")
    );
    // Already-absolute links keep their exact spelling (ledger keys).
    assert_eq!(
        resolve_link(origin, "https://hackmit.org").as_deref(),
        Some("https://hackmit.org")
    );
    assert_eq!(resolve_link(origin, "javascript:void(0)"), None);
    assert_eq!(resolve_link(origin, "#"), None);
}

#[test]
fn dates_land_in_the_target_zone() {
    let ist = TargetZone::ist();
    assert_eq!(parse_date_guess("05/10/2025 18:30", &ist), "05 Oct 2025, 06:30 PM IST");
    assert_eq!(parse_date_guess("2025-10-05T13:00:00Z", &ist), "05 Oct 2025, 06:30 PM IST");
    assert_eq!(parse_date_guess("Sunday, 5th Oct 2025, 10:00 AM", &ist), "05 Oct 2025, 10:00 AM IST");
    assert_eq!(parse_date_guess("whenever", &ist), UNKNOWN_WHEN);

    let utc = TargetZone::new(0, "UTC");
    assert_eq!(parse_date_guess("2025-10-05T13:00:00+05:30", &utc), "05 Oct 2025, 07:30 AM UTC");
}
