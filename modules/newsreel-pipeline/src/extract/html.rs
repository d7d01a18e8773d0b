//! Selector-driven HTML extraction helpers.
//!
//! Shared by every chain technique that has HTML in hand: apply a profile's
//! selector set, collect preview images from meta tags, filter junk.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use newsreel_common::SelectorSet;

/// Paragraphs shorter than this are discarded before body assembly.
const MIN_PARAGRAPH_LEN: usize = 40;

/// Subscription, newsletter and consent boilerplate dropped from bodies.
static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)subscribe|sign up for|newsletter|accept (all )?cookies|cookie settings",
        r"|consent|sign in to continue|log in to continue|advertisement",
        r"|all rights reserved|terms of service|privacy policy",
    ))
    .expect("valid regex")
});

/// Challenge text served from behind bot detection, where content should be.
const BLOCKING_INDICATORS: [&str; 7] = [
    "you are blocked",
    "access blocked",
    "request blocked",
    "captcha",
    "cloudflare",
    "checking your browser",
    "are you a robot",
];

/// Placeholder image markers (tracking pixels, sprites, spacers).
const PLACEHOLDER_MARKERS: [&str; 6] = ["1x1", "pixel", "sprite", "spacer", "placeholder", "blank."];

/// Fields one technique managed to populate. Later techniques in the chain
/// only fill what is still missing.
#[derive(Debug, Default, Clone)]
pub struct Partial {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl Partial {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.body.is_none()
            && self.images.is_empty()
            && self.videos.is_empty()
            && self.author.is_none()
            && self.published.is_none()
    }
}

/// Apply one selector set to an HTML document.
///
/// Images always include the og:image/twitter:image floor — preview images
/// are typically unrestricted even behind access walls — plus in-body images
/// matching the allowlist.
pub fn apply_selectors(
    html: &str,
    base_url: &str,
    selectors: &SelectorSet,
    allowlist: &[&str],
) -> Partial {
    let doc = Html::parse_document(html);

    let mut partial = Partial {
        title: first_text(&doc, &selectors.title).filter(|t| !looks_blocked(t)),
        description: first_text(&doc, &selectors.description).filter(|t| !looks_blocked(t)),
        body: extract_body(&doc, &selectors.body),
        ..Partial::default()
    };

    partial.images = collect_images(&doc, base_url, &selectors.image, allowlist);
    partial.videos = collect_videos(&doc, base_url, allowlist);
    partial
}

/// First non-empty text for the first selector that hits. Meta elements
/// yield their `content` attribute.
pub fn first_text(doc: &Html, selectors: &[&'static str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(el) = doc.select(&selector).next() {
            let text = element_text(&el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn element_text(el: &ElementRef) -> String {
    if el.value().name() == "meta" {
        squeeze_ws(el.value().attr("content").unwrap_or(""))
    } else {
        squeeze_ws(&el.text().collect::<String>())
    }
}

/// Assemble the body from the first selector that yields any kept
/// paragraphs. Short and boilerplate paragraphs are discarded first.
pub fn extract_body(doc: &Html, selectors: &[&'static str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        let paragraphs: Vec<String> = doc
            .select(&selector)
            .map(|el| squeeze_ws(&el.text().collect::<String>()))
            .filter(|p| keep_paragraph(p))
            .collect();

        if !paragraphs.is_empty() {
            return Some(paragraphs.join("\n\n"));
        }
    }
    None
}

fn keep_paragraph(p: &str) -> bool {
    p.chars().count() >= MIN_PARAGRAPH_LEN && !BOILERPLATE.is_match(p) && !looks_blocked(p)
}

pub fn looks_blocked(text: &str) -> bool {
    let lower = text.to_lowercase();
    BLOCKING_INDICATORS.iter().any(|i| lower.contains(i))
}

/// og:image / twitter:image preview images.
pub fn meta_images(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for raw in [
        "meta[property=\"og:image\"]",
        "meta[property=\"og:image:url\"]",
        "meta[name=\"twitter:image\"]",
    ] {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for el in doc.select(&selector) {
            if let Some(content) = el.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    out.push(content.to_string());
                }
            }
        }
    }
    out
}

fn collect_images(
    doc: &Html,
    base_url: &str,
    selectors: &[&'static str],
    allowlist: &[&str],
) -> Vec<String> {
    let mut candidates = meta_images(doc);

    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for el in doc.select(&selector) {
            if let Some(src) = el.value().attr("src").or_else(|| el.value().attr("data-src")) {
                candidates.push(src.trim().to_string());
            }
        }
    }

    normalize_media_urls(candidates, base_url, allowlist)
}

fn collect_videos(doc: &Html, base_url: &str, allowlist: &[&str]) -> Vec<String> {
    let mut candidates = Vec::new();
    for raw in ["video[src]", "video source[src]"] {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for el in doc.select(&selector) {
            if let Some(src) = el.value().attr("src") {
                candidates.push(src.trim().to_string());
            }
        }
    }
    normalize_media_urls(candidates, base_url, allowlist)
}

/// Resolve relative URLs against the page, drop junk, dedupe in order.
fn normalize_media_urls(candidates: Vec<String>, base_url: &str, allowlist: &[&str]) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for raw in candidates {
        let resolved = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw
        } else if raw.starts_with("data:") || raw.starts_with("blob:") {
            continue;
        } else if let Some(ref b) = base {
            match b.join(&raw) {
                Ok(u) => u.to_string(),
                Err(_) => continue,
            }
        } else {
            continue;
        };

        if acceptable_media(&resolved, allowlist) && seen.insert(resolved.clone()) {
            out.push(resolved);
        }
    }
    out
}

/// Reject data/blob URIs, placeholder images and non-allowlisted hosts.
/// An empty allowlist accepts any host.
pub fn acceptable_media(url: &str, allowlist: &[&str]) -> bool {
    if url.starts_with("data:") || url.starts_with("blob:") {
        return false;
    }
    let lower = url.to_lowercase();
    if PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m)) {
        return false;
    }
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    allowlist.is_empty() || allowlist.iter().any(|a| host.contains(a))
}

pub fn squeeze_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
