//! Branding resolution.
//!
//! Branding follows source identity, never content: publications get their
//! registered logo, platform relays get the platform icon, personal posts
//! get the author's avatar fetched through a fallback chain of avatar
//! services. Avatars are cached on disk keyed by handle.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use newsreel_common::{ExtractedContent, SourceCategory, SourceProfile};

use crate::media::{sanitize, write_atomic};
use crate::traits::HttpFetcher;

pub struct BrandingResolver {
    fetcher: Arc<dyn HttpFetcher>,
    logos_dir: PathBuf,
}

impl BrandingResolver {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, logos_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            logos_dir: logos_dir.into(),
        }
    }

    /// Fill `display_name` and `branding_asset` on the record. Branding
    /// failures never fail the record; a missing asset just means the
    /// renderer shows text branding only.
    pub async fn resolve(&self, record: &mut ExtractedContent, profile: &SourceProfile) {
        match profile.category {
            SourceCategory::Publication | SourceCategory::PlatformRelay => {
                record.display_name = Some(profile.display_name.to_string());
                record.branding_asset = profile.logo.and_then(|slug| {
                    let path = self.logos_dir.join(format!("{slug}.png"));
                    if path.exists() {
                        Some(path)
                    } else {
                        debug!(slug, "No logo file on disk");
                        None
                    }
                });
            }
            SourceCategory::PersonalPost => {
                let handle = author_handle(record);
                record.display_name = Some(format!("@{handle}"));
                record.branding_asset = self.avatar_for(&handle).await;
            }
        }
    }

    /// Cached avatar for a handle, fetching through the service chain on a
    /// cache miss.
    async fn avatar_for(&self, handle: &str) -> Option<PathBuf> {
        let target = self.logos_dir.join(format!("avatar_{}.png", sanitize(handle)));
        if target.exists() {
            return Some(target);
        }

        for service_url in [
            format!("https://unavatar.io/twitter/{handle}"),
            format!("https://unavatar.io/{handle}"),
            format!("https://ui-avatars.com/api/?name={handle}&size=256&background=random"),
        ] {
            match self.fetcher.get_bytes(&service_url).await {
                Ok(bytes) if !bytes.is_empty() => {
                    if let Err(e) = write_atomic(&target, &bytes).await {
                        warn!(handle, error = %e, "Avatar cache write failed");
                        return None;
                    }
                    debug!(handle, service = service_url, "Avatar fetched");
                    return Some(target);
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(handle, service = service_url, error = %e, "Avatar service miss");
                }
            }
        }
        warn!(handle, "No avatar service produced an image");
        None
    }
}

/// Handle for a personal post: the author field stripped of its `@`, else
/// the first path segment of the post URL.
fn author_handle(record: &ExtractedContent) -> String {
    if let Some(author) = record.author.as_deref() {
        let trimmed = author.trim().trim_start_matches('@');
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if record.locator.is_http() {
        if let Ok(url) = Url::parse(record.locator.as_str()) {
            if let Some(segment) = url
                .path_segments()
                .and_then(|mut segments| segments.next())
                .filter(|s| !s.is_empty())
            {
                return segment.to_string();
            }
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::default_profiles;
    use crate::testing::MockFetcher;
    use newsreel_common::{ContentLocator, ContentType};

    fn profile(name: &str) -> SourceProfile {
        default_profiles()
            .into_iter()
            .find(|p| p.name == name)
            .unwrap()
    }

    fn post_record(locator: &str, author: Option<&str>) -> ExtractedContent {
        let mut record = ExtractedContent::empty(
            ContentLocator::new(locator),
            "X",
            ContentType::PlatformPost,
        );
        record.author = author.map(String::from);
        record
    }

    #[tokio::test]
    async fn publications_get_display_name_and_logo_if_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("politico.png"), b"png").unwrap();
        let resolver = BrandingResolver::new(Arc::new(MockFetcher::new()), dir.path());

        let mut record = post_record("https://www.politico.com/news/x", None);
        resolver.resolve(&mut record, &profile("politico")).await;

        assert_eq!(record.display_name.as_deref(), Some("POLITICO"));
        assert_eq!(record.branding_asset, Some(dir.path().join("politico.png")));
    }

    #[tokio::test]
    async fn missing_logo_file_leaves_asset_unset() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = BrandingResolver::new(Arc::new(MockFetcher::new()), dir.path());

        let mut record = post_record("https://www.politico.com/news/x", None);
        resolver.resolve(&mut record, &profile("politico")).await;

        assert_eq!(record.display_name.as_deref(), Some("POLITICO"));
        assert!(record.branding_asset.is_none());
    }

    #[tokio::test]
    async fn personal_posts_fetch_and_cache_the_avatar() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(
            MockFetcher::new()
                .on_bytes("https://unavatar.io/twitter/somereporter", b"avatar".to_vec()),
        );
        let resolver = BrandingResolver::new(fetcher.clone(), dir.path());

        let mut record = post_record(
            "https://x.com/somereporter/status/1",
            Some("@somereporter"),
        );
        resolver.resolve(&mut record, &profile("x")).await;

        assert_eq!(record.display_name.as_deref(), Some("@somereporter"));
        let asset = record.branding_asset.clone().expect("avatar cached");
        assert_eq!(std::fs::read(&asset).unwrap(), b"avatar");
        assert_eq!(fetcher.call_count(), 1);

        // Cache hit: no second fetch.
        resolver.resolve(&mut record, &profile("x")).await;
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn avatar_chain_falls_through_to_the_next_service() {
        let dir = tempfile::tempdir().unwrap();
        // First service unregistered (errors); second succeeds.
        let fetcher = Arc::new(
            MockFetcher::new().on_bytes("https://unavatar.io/somereporter", b"fallback".to_vec()),
        );
        let resolver = BrandingResolver::new(fetcher, dir.path());

        let mut record = post_record("https://x.com/somereporter/status/1", Some("somereporter"));
        resolver.resolve(&mut record, &profile("x")).await;

        let asset = record.branding_asset.expect("fallback avatar");
        assert_eq!(std::fs::read(asset).unwrap(), b"fallback");
    }

    #[tokio::test]
    async fn handle_falls_back_to_the_url_path() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = BrandingResolver::new(Arc::new(MockFetcher::new()), dir.path());

        let mut record = post_record("https://x.com/pathhandle/status/1", None);
        resolver.resolve(&mut record, &profile("x")).await;

        assert_eq!(record.display_name.as_deref(), Some("@pathhandle"));
    }

    #[tokio::test]
    async fn platform_relay_uses_the_platform_icon() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("telegram.png"), b"png").unwrap();
        let resolver = BrandingResolver::new(Arc::new(MockFetcher::new()), dir.path());

        let mut record = post_record("telegram://post/42", Some("Some Channel"));
        resolver.resolve(&mut record, &profile("telegram-post")).await;

        assert_eq!(record.display_name.as_deref(), Some("Telegram Post"));
        assert_eq!(record.branding_asset, Some(dir.path().join("telegram.png")));
    }
}
