//! Structured-metadata extraction: JSON-LD article nodes plus og meta tags.
//!
//! JSON-LD ships in the initial server-rendered HTML and frequently survives
//! access walls that strip the article body.

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use serde_json::Value;

use super::html::{acceptable_media, meta_images, squeeze_ws, Partial};

const ARTICLE_TYPES: [&str; 4] = ["NewsArticle", "Article", "ReportageNewsArticle", "BlogPosting"];

pub fn extract_structured(html: &str, allowlist: &[&str]) -> Partial {
    let doc = Html::parse_document(html);
    let mut partial = Partial::default();

    let selector = Selector::parse("script[type=\"application/ld+json\"]").expect("valid selector");
    for script in doc.select(&selector) {
        let raw = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        for node in candidate_nodes(&value) {
            if !is_article(node) {
                continue;
            }
            fill_from_article(&mut partial, node, allowlist);
        }
    }

    // og meta floor: title/description/images even when no JSON-LD exists.
    if partial.title.is_none() {
        partial.title = meta_content(&doc, "meta[property=\"og:title\"]");
    }
    if partial.description.is_none() {
        partial.description = meta_content(&doc, "meta[property=\"og:description\"]")
            .or_else(|| meta_content(&doc, "meta[name=\"description\"]"));
    }
    for url in meta_images(&doc) {
        if acceptable_media(&url, allowlist) && !partial.images.contains(&url) {
            partial.images.push(url);
        }
    }

    partial
}

/// JSON-LD payloads come as a single node, an array, or a node carrying an
/// `@graph` array.
fn candidate_nodes(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => match obj.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph.iter().collect(),
            None => vec![value],
        },
        _ => vec![],
    }
}

fn is_article(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => ARTICLE_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| ARTICLE_TYPES.contains(&t)),
        _ => false,
    }
}

fn fill_from_article(partial: &mut Partial, node: &Value, allowlist: &[&str]) {
    if partial.title.is_none() {
        partial.title = str_field(node, "headline");
    }
    if partial.description.is_none() {
        partial.description = str_field(node, "description");
    }
    if partial.body.is_none() {
        partial.body = str_field(node, "articleBody");
    }
    if partial.author.is_none() {
        partial.author = node.get("author").and_then(author_name);
    }
    if partial.published.is_none() {
        partial.published = node
            .get("datePublished")
            .and_then(Value::as_str)
            .and_then(parse_timestamp);
    }
    for url in node.get("image").map(image_urls).unwrap_or_default() {
        if acceptable_media(&url, allowlist) && !partial.images.contains(&url) {
            partial.images.push(url);
        }
    }
}

fn str_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(squeeze_ws)
        .filter(|s| !s.is_empty())
}

/// `author` can be an object, an array of objects, or a bare string.
fn author_name(author: &Value) -> Option<String> {
    match author {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(String::from),
        Value::Array(items) => items.first().and_then(author_name),
        _ => None,
    }
}

/// `image` can be a URL string, an ImageObject, or an array of either.
fn image_urls(image: &Value) -> Vec<String> {
    match image {
        Value::String(s) => vec![s.clone()],
        Value::Object(obj) => obj
            .get("url")
            .and_then(Value::as_str)
            .map(|s| vec![s.to_string()])
            .unwrap_or_default(),
        Value::Array(items) => items.iter().flat_map(image_urls).collect(),
        _ => vec![],
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(squeeze_ws)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWLIST: [&str; 1] = ["example.com"];

    #[test]
    fn extracts_news_article_fields() {
        let html = r#"<html><head><script type="application/ld+json">
        {
            "@type": "NewsArticle",
            "headline": "Budget approved",
            "description": "The council signed off on the budget.",
            "articleBody": "After weeks of negotiation the council approved the budget late Tuesday.",
            "author": {"@type": "Person", "name": "Jane Doe"},
            "datePublished": "2026-08-20T14:30:00Z",
            "image": ["https://example.com/lead.jpg"]
        }
        </script></head><body></body></html>"#;

        let p = extract_structured(html, &ALLOWLIST);
        assert_eq!(p.title.as_deref(), Some("Budget approved"));
        assert_eq!(p.author.as_deref(), Some("Jane Doe"));
        assert!(p.body.unwrap().contains("approved the budget"));
        assert_eq!(p.images, vec!["https://example.com/lead.jpg"]);
        assert!(p.published.is_some());
    }

    #[test]
    fn handles_graph_wrapper() {
        let html = r#"<html><head><script type="application/ld+json">
        {"@graph": [
            {"@type": "WebSite", "name": "Example"},
            {"@type": "Article", "headline": "Graph headline"}
        ]}
        </script></head><body></body></html>"#;

        let p = extract_structured(html, &ALLOWLIST);
        assert_eq!(p.title.as_deref(), Some("Graph headline"));
    }

    #[test]
    fn falls_back_to_og_meta_without_json_ld() {
        let html = r#"<html><head>
            <meta property="og:title" content="Preview title">
            <meta property="og:image" content="https://example.com/preview.jpg">
            </head><body></body></html>"#;

        let p = extract_structured(html, &ALLOWLIST);
        assert_eq!(p.title.as_deref(), Some("Preview title"));
        assert_eq!(p.images, vec!["https://example.com/preview.jpg"]);
        assert!(p.body.is_none());
    }

    #[test]
    fn malformed_json_ld_is_ignored() {
        let html = r#"<html><head><script type="application/ld+json">
        {not json at all
        </script></head><body></body></html>"#;

        let p = extract_structured(html, &[]);
        assert!(p.title.is_none());
    }
}
