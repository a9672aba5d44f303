// src/ingest/providers/html.rs
//! Selector-driven card extraction. Synchronous on purpose: `scraper::Html` is not
//! `Send`, so the parsed document never lives across an `.await`.

use scraper::{ElementRef, Html, Selector};

use super::{LinkRule, SourceProfile, TitleRule};
use crate::ingest::types::AdapterError;
use crate::listing::RawListing;

fn selector(css: &str) -> Result<Selector, AdapterError> {
    Selector::parse(css).map_err(|e| AdapterError::Selector {
        selector: css.to_string(),
        message: format!("{e:?}"),
    })
}

fn optional_selector(css: Option<&str>) -> Result<Option<Selector>, AdapterError> {
    css.map(selector).transpose()
}

/// Text of an element with one space between text nodes, so
/// `<h3>Hack<span>Delhi</span></h3>` does not glue into "HackDelhi".
fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

fn first_text(card: ElementRef<'_>, sel: &Selector) -> Option<String> {
    card.select(sel).next().map(text_of)
}

/// Pull raw candidates out of one listing page, in document order.
pub fn extract_candidates(
    profile: &SourceProfile,
    body: &str,
) -> Result<Vec<RawListing>, AdapterError> {
    let doc = Html::parse_document(body);

    let card_sel = selector(profile.card)?;
    let anchor_sel = selector("a[href]")?;
    let title_sel = match profile.title {
        TitleRule::CardText => None,
        TitleRule::Select(css) => Some(selector(css)?),
    };
    let host_sel = optional_selector(profile.host)?;
    let when_sel = optional_selector(profile.when)?;
    let location_sel = optional_selector(profile.location)?;

    let mut out = Vec::new();
    for card in doc.select(&card_sel) {
        let title = match &title_sel {
            Some(sel) => first_text(card, sel),
            None => Some(text_of(card)),
        };

        let own_href = card.value().attr("href").map(str::to_string);
        let link = match profile.link {
            LinkRule::CardHref => own_href,
            LinkRule::FirstAnchor => card
                .select(&anchor_sel)
                .find_map(|a| a.value().attr("href"))
                .map(str::to_string)
                .or(own_href),
        };

        out.push(RawListing {
            title,
            link,
            host: host_sel.as_ref().and_then(|s| first_text(card, s)),
            when: when_sel.as_ref().and_then(|s| first_text(card, s)),
            location: location_sel.as_ref().and_then(|s| first_text(card, s)),
        });
    }
    Ok(out)
}
