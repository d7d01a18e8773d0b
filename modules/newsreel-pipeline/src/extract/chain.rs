//! Ordered fallback chain.
//!
//! Techniques run in fixed order until the record has both a non-empty title
//! and body, or the chain is exhausted. Earlier techniques win: a later
//! technique only fills fields still empty. Each technique runs under a time
//! budget and builds into a scratch partial, so an abandoned technique
//! leaks nothing into the record.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use newsreel_common::{
    AttemptOutcome, ContentLocator, ContentType, ExtractedContent, ExtractionFailure, MediaRef,
    SourceProfile, Technique, TechniqueAttempt,
};

use super::html::{apply_selectors, Partial};
use super::metadata::extract_structured;
use super::snapshot::fetch_snapshot;
use crate::traits::{HttpFetcher, PageRenderer};

const CHAIN: [Technique; 6] = [
    Technique::RenderedPrimary,
    Technique::RenderedSecondary,
    Technique::ArchiveSnapshot,
    Technique::StructuredMetadata,
    Technique::CrawlerIdentity,
    Technique::StaticHtml,
];

pub struct ExtractionChain {
    renderer: Arc<dyn PageRenderer>,
    fetcher: Arc<dyn HttpFetcher>,
    /// Per-technique time budget.
    budget: Duration,
}

impl ExtractionChain {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        fetcher: Arc<dyn HttpFetcher>,
        budget: Duration,
    ) -> Self {
        Self {
            renderer,
            fetcher,
            budget,
        }
    }

    /// Run the fallback chain for one URL locator.
    pub async fn extract(
        &self,
        locator: &ContentLocator,
        profile: &SourceProfile,
    ) -> Result<ExtractedContent, ExtractionFailure> {
        let mut record = ExtractedContent::empty(
            locator.clone(),
            profile.display_name,
            ContentType::NewsArticle,
        );
        let mut attempts = Vec::new();
        // The rendered DOM is fetched once and shared by the techniques
        // that read it.
        let mut rendered_dom: Option<String> = None;

        for technique in CHAIN {
            let outcome = self
                .run_technique(technique, locator, profile, &mut rendered_dom, &mut record)
                .await;
            debug!(%locator, technique = %technique, outcome = ?outcome, "Technique finished");
            attempts.push(TechniqueAttempt { technique, outcome });

            if record.is_complete() {
                info!(
                    %locator,
                    technique = %technique,
                    title = %record.title,
                    body_len = record.body.len(),
                    "Extraction complete"
                );
                return Ok(record);
            }
        }

        warn!(%locator, attempts = attempts.len(), "Extraction chain exhausted");
        Err(ExtractionFailure {
            locator: locator.clone(),
            attempts,
        })
    }

    async fn run_technique(
        &self,
        technique: Technique,
        locator: &ContentLocator,
        profile: &SourceProfile,
        rendered_dom: &mut Option<String>,
        record: &mut ExtractedContent,
    ) -> AttemptOutcome {
        let url = locator.as_str();
        let produced = tokio::time::timeout(
            self.budget,
            self.produce(technique, url, profile, rendered_dom),
        )
        .await;

        match produced {
            Err(_) => {
                warn!(url, technique = %technique, budget_secs = self.budget.as_secs(), "Technique timed out");
                AttemptOutcome::TimedOut
            }
            Ok(Err(e)) => AttemptOutcome::Failed(e.to_string()),
            Ok(Ok(partial)) => {
                if merge(record, partial) {
                    AttemptOutcome::Contributed
                } else {
                    AttemptOutcome::Empty
                }
            }
        }
    }

    async fn produce(
        &self,
        technique: Technique,
        url: &str,
        profile: &SourceProfile,
        rendered_dom: &mut Option<String>,
    ) -> Result<Partial> {
        match technique {
            Technique::RenderedPrimary => {
                let dom = self.rendered_dom(url, rendered_dom).await?;
                Ok(apply_selectors(
                    &dom,
                    url,
                    &profile.primary,
                    &profile.media_allowlist,
                ))
            }
            Technique::RenderedSecondary => {
                let dom = self.rendered_dom(url, rendered_dom).await?;
                Ok(apply_selectors(
                    &dom,
                    url,
                    &profile.secondary,
                    &profile.media_allowlist,
                ))
            }
            Technique::ArchiveSnapshot => {
                match fetch_snapshot(self.fetcher.as_ref(), url).await {
                    Some(html) => Ok(self.both_selector_sets(&html, url, profile)),
                    None => Ok(Partial::default()),
                }
            }
            Technique::StructuredMetadata => {
                // Prefer the DOM already in hand; fall back to a plain GET.
                let html = match rendered_dom {
                    Some(dom) => dom.clone(),
                    None => self.fetcher.get_text(url).await?,
                };
                Ok(extract_structured(&html, &profile.media_allowlist))
            }
            Technique::CrawlerIdentity => {
                let dom = self.renderer.render_as_crawler(url).await?;
                Ok(self.both_selector_sets(&dom, url, profile))
            }
            Technique::StaticHtml => {
                let html = self.fetcher.get_text(url).await?;
                Ok(self.both_selector_sets(&html, url, profile))
            }
            // Inline posts are extracted in the pipeline before the chain
            // runs; this technique is never part of CHAIN.
            Technique::InlinePost => unreachable!("InlinePost is not part of the fallback chain"),
        }
    }

    /// Primary selectors first; secondary only for what primary missed.
    fn both_selector_sets(&self, html: &str, url: &str, profile: &SourceProfile) -> Partial {
        let mut partial = apply_selectors(html, url, &profile.primary, &profile.media_allowlist);
        let secondary = apply_selectors(html, url, &profile.secondary, &profile.media_allowlist);
        fill_missing(&mut partial, secondary);
        partial
    }

    async fn rendered_dom(&self, url: &str, cache: &mut Option<String>) -> Result<String> {
        if let Some(dom) = cache {
            return Ok(dom.clone());
        }
        let dom = self.renderer.render(url).await?;
        *cache = Some(dom.clone());
        Ok(dom)
    }
}

/// Merge a technique's partial into the record: fill only empty fields.
/// Images and videos are additive with order-preserving dedupe, since the
/// meta-tag floor and in-body media complement each other across
/// techniques. Returns true if anything new landed.
pub(crate) fn merge(record: &mut ExtractedContent, partial: Partial) -> bool {
    let mut contributed = false;

    if record.title.trim().is_empty() {
        if let Some(title) = partial.title {
            record.title = title;
            contributed = true;
        }
    }
    if record.description.trim().is_empty() {
        if let Some(description) = partial.description {
            record.description = description;
            contributed = true;
        }
    }
    if record.body.trim().is_empty() {
        if let Some(body) = partial.body {
            record.body = body;
            contributed = true;
        }
    }
    if record.author.is_none() {
        if let Some(author) = partial.author {
            record.author = Some(author);
            contributed = true;
        }
    }
    if record.published.is_none() {
        if let Some(published) = partial.published {
            record.published = Some(published);
            contributed = true;
        }
    }

    for url in partial.images {
        let media_ref = MediaRef::Remote(url);
        if !record.images.contains(&media_ref) {
            record.images.push(media_ref);
            contributed = true;
        }
    }
    for url in partial.videos {
        let media_ref = MediaRef::Remote(url);
        if !record.videos.contains(&media_ref) {
            record.videos.push(media_ref);
            contributed = true;
        }
    }

    contributed
}

/// Like `merge` but between two partials from the same technique pass.
fn fill_missing(primary: &mut Partial, secondary: Partial) {
    if primary.title.is_none() {
        primary.title = secondary.title;
    }
    if primary.description.is_none() {
        primary.description = secondary.description;
    }
    if primary.body.is_none() {
        primary.body = secondary.body;
    }
    if primary.author.is_none() {
        primary.author = secondary.author;
    }
    if primary.published.is_none() {
        primary.published = secondary.published;
    }
    for url in secondary.images {
        if !primary.images.contains(&url) {
            primary.images.push(url);
        }
    }
    for url in secondary.videos {
        if !primary.videos.contains(&url) {
            primary.videos.push(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::default_profiles;
    use crate::testing::{MockFetcher, MockRenderer};

    fn politico_profile() -> SourceProfile {
        default_profiles()
            .into_iter()
            .find(|p| p.name == "politico")
            .unwrap()
    }

    fn full_article_html() -> String {
        format!(
            r#"<html><head>
            <meta property="og:image" content="https://www.politico.com/lead.jpg">
            </head><body>
            <h1 class="headline">Senate passes the appropriations package</h1>
            <div class="story-text">
            <p>{}</p>
            </div>
            </body></html>"#,
            "The Senate voted 68-32 on Thursday to pass the package after a marathon session. "
                .repeat(3)
        )
    }

    #[tokio::test]
    async fn first_technique_success_short_circuits_the_chain() {
        let url = "https://www.politico.com/news/story";
        let renderer = Arc::new(MockRenderer::new().on_page(url, &full_article_html()));
        let fetcher = Arc::new(MockFetcher::new());

        let chain = ExtractionChain::new(renderer.clone(), fetcher.clone(), Duration::from_secs(5));
        let record = chain
            .extract(&ContentLocator::new(url), &politico_profile())
            .await
            .expect("extraction should succeed");

        assert!(record.is_complete());
        assert_eq!(record.title, "Senate passes the appropriations package");
        // Technique 1 satisfied the chain: nothing else ran, so the
        // snapshot/static-HTML fetcher saw zero calls and only one render
        // happened.
        assert_eq!(fetcher.call_count(), 0);
        assert_eq!(renderer.render_count(), 1);
    }

    #[tokio::test]
    async fn later_techniques_fill_only_missing_fields() {
        let url = "https://www.politico.com/news/teaser";
        // The rendered DOM yields a title via selectors but no body
        // paragraphs; its JSON-LD carries a competing headline and the body.
        // The metadata technique reuses the cached DOM, fills only the body
        // and must not overwrite the title.
        let rendered = r#"<html><head><script type="application/ld+json">
            {"@type": "NewsArticle",
             "headline": "Metadata headline must not overwrite",
             "articleBody": "A full body recovered from structured metadata, long enough to count as article text for the test."}
            </script></head><body>
            <h1 class="headline">Original headline stays</h1>
            </body></html>"#;

        let renderer = MockRenderer::new().on_page(url, rendered);
        let fetcher = Arc::new(MockFetcher::new());

        let chain = ExtractionChain::new(Arc::new(renderer), fetcher, Duration::from_secs(5));
        let record = chain
            .extract(&ContentLocator::new(url), &politico_profile())
            .await
            .expect("metadata technique completes the record");

        // First-in-chain wins: the rendered title survives.
        assert_eq!(record.title, "Original headline stays");
        assert!(record.body.contains("structured metadata"));
    }

    #[tokio::test]
    async fn crawler_identity_supplements_a_title_only_render() {
        let url = "https://www.politico.com/news/walled";
        // The normal render comes back with the headline but an access wall
        // where the body should be. The Googlebot re-render gets the text.
        let walled = r#"<html><body>
            <h1 class="headline">Budget deal reached</h1>
            </body></html>"#;
        let crawler_dom = format!(
            r#"<html><body>
            <h1 class="headline">Budget deal reached</h1>
            <div class="story-text"><p>{}</p></div>
            </body></html>"#,
            "Negotiators announced the framework agreement early on Friday. ".repeat(3)
        );

        let renderer = MockRenderer::new()
            .on_page(url, walled)
            .on_crawler_page(url, &crawler_dom);
        let fetcher = Arc::new(MockFetcher::new());

        let chain = ExtractionChain::new(Arc::new(renderer), fetcher, Duration::from_secs(5));
        let record = chain
            .extract(&ContentLocator::new(url), &politico_profile())
            .await
            .expect("crawler identity recovers the body");

        assert_eq!(record.title, "Budget deal reached");
        assert!(record.body.contains("framework agreement"));
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_techniques_are_recorded_and_the_chain_continues() {
        let url = "https://www.politico.com/news/slow";
        let renderer = MockRenderer::new()
            .on_page(url, &full_article_html())
            .with_delay(Duration::from_secs(60));
        let fetcher = Arc::new(MockFetcher::new());

        let chain = ExtractionChain::new(
            Arc::new(renderer),
            fetcher,
            Duration::from_secs(1),
        );
        let failure = chain
            .extract(&ContentLocator::new(url), &politico_profile())
            .await
            .expect_err("every technique is slow or dead");

        assert_eq!(failure.attempts.len(), 6);
        // Both render-backed techniques and the crawler re-render hit the
        // budget and were abandoned.
        assert_eq!(failure.attempts[0].outcome, AttemptOutcome::TimedOut);
        assert_eq!(failure.attempts[1].outcome, AttemptOutcome::TimedOut);
        assert_eq!(failure.attempts[4].outcome, AttemptOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_render_leaks_nothing_into_the_record() {
        let url = "https://www.politico.com/news/slow-render";
        // The render would produce this title if it ever finished; it never
        // does within budget, so the static fetch must win every field.
        let rendered = r#"<html><body>
            <h1 class="headline">Rendered title must not land</h1>
            </body></html>"#;
        let static_html = format!(
            r#"<html><body>
            <h1 class="headline">Static headline</h1>
            <div class="story-text"><p>{}</p></div>
            </body></html>"#,
            "The vote came after a lengthy floor debate on the amendments. ".repeat(3)
        );

        let renderer = MockRenderer::new()
            .on_page(url, rendered)
            .with_delay(Duration::from_secs(60));
        let fetcher = Arc::new(MockFetcher::new().on_text(url, &static_html));

        let chain = ExtractionChain::new(
            Arc::new(renderer),
            fetcher,
            Duration::from_secs(1),
        );
        let record = chain
            .extract(&ContentLocator::new(url), &politico_profile())
            .await
            .expect("static HTML completes the record");

        assert_eq!(record.title, "Static headline");
        assert!(record.body.contains("floor debate"));
    }

    #[tokio::test]
    async fn exhausted_chain_reports_every_attempt() {
        let url = "https://www.politico.com/news/empty";
        let renderer = MockRenderer::new().on_page(url, "<html><body></body></html>");
        let fetcher = MockFetcher::new().on_text(url, "<html><body></body></html>");

        let chain = ExtractionChain::new(
            Arc::new(renderer),
            Arc::new(fetcher),
            Duration::from_secs(5),
        );
        let failure = chain
            .extract(&ContentLocator::new(url), &politico_profile())
            .await
            .expect_err("nothing extractable anywhere");

        assert_eq!(failure.attempts.len(), 6);
        assert_eq!(failure.attempts[0].technique, Technique::RenderedPrimary);
        assert_eq!(failure.attempts[5].technique, Technique::StaticHtml);
    }

    #[test]
    fn merge_is_fill_only() {
        let mut record = ExtractedContent::empty(
            ContentLocator::new("https://example.com/a"),
            "Test",
            ContentType::NewsArticle,
        );
        record.title = "Kept title".to_string();

        let partial = Partial {
            title: Some("Discarded title".to_string()),
            body: Some("New body".to_string()),
            ..Partial::default()
        };

        assert!(merge(&mut record, partial));
        assert_eq!(record.title, "Kept title");
        assert_eq!(record.body, "New body");
    }
}
