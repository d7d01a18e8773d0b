use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Locators ---

/// Opaque reference to one piece of source content: an article URL or a
/// platform-native post reference such as `telegram://post/42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentLocator(String);

impl ContentLocator {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for http(s) URLs, false for platform-native schemes.
    pub fn is_http(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }
}

impl std::fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Media references ---

/// Tagged media reference. Resolution dispatches on the tag, so a local
/// filesystem path is never mistaken for a fetchable URL on a second pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum MediaRef {
    /// Directly fetchable URL.
    Remote(String),
    /// Platform-native file handle, resolved via the owning platform's API.
    NativeHandle(String),
    /// Already-resolved local asset.
    Local(PathBuf),
}

impl MediaRef {
    pub fn is_local(&self) -> bool {
        matches!(self, MediaRef::Local(_))
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaRef::Remote(url) => write!(f, "{url}"),
            MediaRef::NativeHandle(id) => write!(f, "handle:{id}"),
            MediaRef::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

// --- Source profiles ---

/// Branding taxonomy. Determined solely by source identity, never by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    /// News outlet — branded with the registered source logo.
    Publication,
    /// Personal accounts — branded with the author's own avatar and handle.
    PersonalPost,
    /// Inline platform posts with no outward link — fixed platform icon.
    PlatformRelay,
}

/// Ordered CSS selector lists for one markup template. Sites vary markup
/// across templates, so each profile carries a primary and a secondary set.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    pub title: Vec<&'static str>,
    pub description: Vec<&'static str>,
    pub body: Vec<&'static str>,
    pub image: Vec<&'static str>,
}

impl SelectorSet {
    pub fn empty() -> Self {
        Self {
            title: vec![],
            description: vec![],
            body: vec![],
            image: vec![],
        }
    }
}

/// Per-source extraction and validation configuration. Built once at process
/// start, read-only thereafter.
#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: SourceCategory,
    /// Domain suffixes matched against URL locator hosts.
    pub domains: Vec<&'static str>,
    /// Scheme+path prefixes matched against platform-native locators.
    pub schemes: Vec<&'static str>,
    /// Path fragments that mark structurally-valid but unextractable pages
    /// (live-updates aggregations without a stable entry).
    pub excluded_patterns: Vec<&'static str>,
    /// Lowercased query parameter names whose presence overrides the
    /// exclusion — the URL then points at one specific entry.
    pub entry_params: Vec<&'static str>,
    pub primary: SelectorSet,
    pub secondary: SelectorSet,
    /// Substrings an image host must contain to be kept.
    pub media_allowlist: Vec<&'static str>,
    /// Minimum accepted body length. Paywalled sources configure a lower
    /// value since only a teaser is obtainable.
    pub min_body_len: usize,
    pub media_optional: bool,
    /// Logo slug under the logos directory, e.g. "politico" -> politico.png.
    pub logo: Option<&'static str>,
}

// --- Extracted content ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    NewsArticle,
    PlatformPost,
}

/// Normalized record produced by exactly one extraction. After creation only
/// the media resolver (refs replaced by local paths) and the branding
/// resolver (branding fields) mutate it; both are idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub description: String,
    pub body: String,
    pub images: Vec<MediaRef>,
    pub videos: Vec<MediaRef>,
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub source: String,
    pub content_type: ContentType,
    pub locator: ContentLocator,
    pub branding_asset: Option<PathBuf>,
    pub display_name: Option<String>,
}

impl ExtractedContent {
    pub fn empty(locator: ContentLocator, source: &str, content_type: ContentType) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            body: String::new(),
            images: Vec::new(),
            videos: Vec::new(),
            author: None,
            published: None,
            source: source.to_string(),
            content_type,
            locator,
            branding_asset: None,
            display_name: None,
        }
    }

    /// A record is usable once both title and body are non-empty. The
    /// fallback chain short-circuits on this.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty()
    }
}

// --- Validation ---

/// Accept/reject decision with itemized reasons. Never persisted; consumed
/// immediately by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub issues: Vec<String>,
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            passed: issues.is_empty(),
            issues,
        }
    }
}

// --- Media manifest ---

/// Product of one media resolution pass over a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaManifest {
    pub images: Vec<PathBuf>,
    pub videos: Vec<PathBuf>,
    /// First successfully resolved image in original reference order.
    pub primary_image: Option<PathBuf>,
    /// First successfully resolved video in original reference order.
    pub primary_video: Option<PathBuf>,
    pub has_media: bool,
}

// --- Extraction techniques ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    RenderedPrimary,
    RenderedSecondary,
    ArchiveSnapshot,
    StructuredMetadata,
    CrawlerIdentity,
    StaticHtml,
    InlinePost,
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Technique::RenderedPrimary => write!(f, "rendered_primary"),
            Technique::RenderedSecondary => write!(f, "rendered_secondary"),
            Technique::ArchiveSnapshot => write!(f, "archive_snapshot"),
            Technique::StructuredMetadata => write!(f, "structured_metadata"),
            Technique::CrawlerIdentity => write!(f, "crawler_identity"),
            Technique::StaticHtml => write!(f, "static_html"),
            Technique::InlinePost => write!(f, "inline_post"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Technique filled at least one previously-empty field.
    Contributed,
    /// Technique ran but added nothing new.
    Empty,
    /// Technique exceeded its time budget and was abandoned.
    TimedOut,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueAttempt {
    pub technique: Technique,
    pub outcome: AttemptOutcome,
}

// --- Inline platform posts ---

/// Payload of an inline chat-platform post, supplied by the external
/// message-ingestion collaborator. Field names follow the platform's
/// message shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlinePost {
    pub message_id: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Available photo renditions, smallest to largest.
    #[serde(default)]
    pub photo: Vec<PhotoRendition>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub video_note: Option<String>,
    #[serde(default)]
    pub document: Option<DocumentAttachment>,
    #[serde(default)]
    pub forward_from_user: Option<String>,
    #[serde(default)]
    pub forward_from_channel: Option<String>,
    #[serde(default)]
    pub author_signature: Option<String>,
    #[serde(default)]
    pub chat_title: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRendition {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAttachment {
    pub file_id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}
