// Trait abstractions for the pipeline's external seams.
//
// PageRenderer — headless rendering (Browserless in production).
// HttpFetcher — plain HTTP GET for snapshots, static HTML and media bytes.
// PlatformFiles — two-step platform file retrieval (Telegram in production).
// FactChecker / Publisher — advisory verification and the downstream
// renderer, both external collaborators.
//
// These enable deterministic testing with the HashMap-backed mocks in
// `testing`: no network, no browser.

use anyhow::Result;
use async_trait::async_trait;

use newsreel_common::{ExtractedContent, MediaManifest};

/// Headless page rendering. Blocking and resource-heavy: an implementation
/// owns an exclusive browser-engine instance for the duration of a call and
/// must release it on every exit path.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Fully render a page and return the resulting DOM as HTML.
    async fn render(&self, url: &str) -> Result<String>;

    /// Re-render identifying as a known search-engine crawler, with a
    /// referrer suggesting origin from a search results page.
    async fn render_as_crawler(&self, url: &str) -> Result<String>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Platform-native file retrieval: resolve an opaque handle to a transient
/// path, then fetch the bytes behind that path.
#[async_trait]
pub trait PlatformFiles: Send + Sync {
    async fn resolve_path(&self, file_id: &str) -> Result<String>;
    async fn download(&self, transient_path: &str) -> Result<Vec<u8>>;
}

/// Advisory fact-verification collaborator. Consulted after validation;
/// never gates the pipeline.
#[async_trait]
pub trait FactChecker: Send + Sync {
    async fn review(&self, record: &ExtractedContent) -> Result<FactReview>;
}

#[derive(Debug, Clone)]
pub struct FactReview {
    pub confidence: f32,
    pub corrections: Vec<String>,
}

/// Everything the downstream renderer/publisher consumes: the validated
/// record (media refs already local, branding attached) plus the manifest.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub content: ExtractedContent,
    pub manifest: MediaManifest,
}

/// Downstream renderer/publisher. Artifact creation is out of scope here;
/// its failure never invalidates the bundle.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, bundle: &ContentBundle) -> Result<()>;
}

/// No-op fact checker for when no verification backend is configured.
pub struct NoopFactChecker;

#[async_trait]
impl FactChecker for NoopFactChecker {
    async fn review(&self, _record: &ExtractedContent) -> Result<FactReview> {
        Ok(FactReview {
            confidence: 1.0,
            corrections: Vec::new(),
        })
    }
}

/// No-op publisher for dry runs.
pub struct NoopPublisher;

#[async_trait]
impl Publisher for NoopPublisher {
    async fn publish(&self, _bundle: &ContentBundle) -> Result<()> {
        Ok(())
    }
}
