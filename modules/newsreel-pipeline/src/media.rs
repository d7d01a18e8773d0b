//! Media resolution: every reference on a record becomes a local file path
//! or is dropped.
//!
//! Resolution is idempotent. A `Local` ref short-circuits before any network
//! work, so re-running a record that already resolved costs zero fetches.
//! Remote and native-handle refs also skip the download when the target file
//! already exists on disk.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{debug, info, warn};
use url::Url;

use newsreel_common::{ExtractedContent, MediaManifest, MediaRef, NewsreelError, SourceProfile};

use crate::extract::html::acceptable_media;
use crate::traits::{HttpFetcher, PlatformFiles};

pub struct MediaResolver {
    fetcher: Arc<dyn HttpFetcher>,
    files: Arc<dyn PlatformFiles>,
    media_dir: PathBuf,
}

impl MediaResolver {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        files: Arc<dyn PlatformFiles>,
        media_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            files,
            media_dir: media_dir.into(),
        }
    }

    /// Resolve every media reference on the record, rewriting the record's
    /// refs to local paths and returning the manifest. References that fail
    /// to resolve are dropped from the record.
    pub async fn resolve(
        &self,
        record: &mut ExtractedContent,
        profile: &SourceProfile,
    ) -> MediaManifest {
        let images = self.resolve_all(&record.images, profile).await;
        let videos = self.resolve_all(&record.videos, profile).await;

        record.images = images.iter().cloned().map(MediaRef::Local).collect();
        record.videos = videos.iter().cloned().map(MediaRef::Local).collect();

        info!(
            locator = %record.locator,
            images = images.len(),
            videos = videos.len(),
            "Media resolved"
        );

        MediaManifest {
            primary_image: images.first().cloned(),
            primary_video: videos.first().cloned(),
            has_media: !images.is_empty() || !videos.is_empty(),
            images,
            videos,
        }
    }

    /// Concurrent resolution; output order follows input order regardless of
    /// completion order, so primary selection stays deterministic.
    async fn resolve_all(&self, refs: &[MediaRef], profile: &SourceProfile) -> Vec<PathBuf> {
        let futures = refs.iter().map(|r| self.resolve_one(r, profile));
        join_all(futures).await.into_iter().flatten().collect()
    }

    async fn resolve_one(&self, media_ref: &MediaRef, profile: &SourceProfile) -> Option<PathBuf> {
        match media_ref {
            // Already resolved: hand the path back without touching the
            // network. A vanished file is dropped, not refetched, since the
            // original reference is gone.
            MediaRef::Local(path) => {
                if path.exists() {
                    Some(path.clone())
                } else {
                    warn!(path = %path.display(), "Local media file vanished; dropping");
                    None
                }
            }
            MediaRef::Remote(url) => match self.fetch_remote(url, profile).await {
                Ok(path) => path,
                Err(e) => {
                    warn!(url, error = %e, "Remote media fetch failed");
                    None
                }
            },
            MediaRef::NativeHandle(file_id) => match self.fetch_native(file_id).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(file_id, error = %e, "Native media fetch failed");
                    None
                }
            },
        }
    }

    async fn fetch_remote(
        &self,
        url: &str,
        profile: &SourceProfile,
    ) -> std::result::Result<Option<PathBuf>, NewsreelError> {
        if !acceptable_media(url, &profile.media_allowlist) {
            debug!(url, "Remote media rejected by allowlist");
            return Ok(None);
        }

        let target = self
            .media_dir
            .join(remote_filename(url).map_err(|e| transport(url, e))?);
        if target.exists() {
            debug!(url, path = %target.display(), "Media already on disk");
            return Ok(Some(target));
        }

        let bytes = self
            .fetcher
            .get_bytes(url)
            .await
            .map_err(|e| transport(url, e))?;
        write_atomic(&target, &bytes)
            .await
            .map_err(|e| transport(url, e))?;
        debug!(url, path = %target.display(), bytes = bytes.len(), "Media downloaded");
        Ok(Some(target))
    }

    async fn fetch_native(&self, file_id: &str) -> std::result::Result<PathBuf, NewsreelError> {
        // The transient path carries the extension; the file id does not.
        let transient = self
            .files
            .resolve_path(file_id)
            .await
            .map_err(|e| transport(file_id, e))?;
        let ext = Path::new(&transient)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let target = self.media_dir.join(format!("{}.{ext}", sanitize(file_id)));

        if target.exists() {
            debug!(file_id, path = %target.display(), "Media already on disk");
            return Ok(target);
        }

        let bytes = self
            .files
            .download(&transient)
            .await
            .map_err(|e| transport(file_id, e))?;
        write_atomic(&target, &bytes)
            .await
            .map_err(|e| transport(file_id, e))?;
        debug!(file_id, path = %target.display(), bytes = bytes.len(), "Media downloaded");
        Ok(target)
    }
}

/// Per-reference transport failure. Scoped to one ref; the caller drops the
/// ref and keeps the manifest.
fn transport(reference: &str, err: impl std::fmt::Display) -> NewsreelError {
    NewsreelError::MediaTransport {
        reference: reference.to_string(),
        message: err.to_string(),
    }
}

/// Deterministic filename for a remote URL: host plus path, sanitized, a
/// hash of the full URL so truncated stems cannot collide, and the original
/// extension.
fn remote_filename(url: &str) -> Result<String> {
    let parsed = Url::parse(url).with_context(|| format!("invalid media URL: {url}"))?;
    let host = parsed.host_str().unwrap_or("media");
    let path = parsed.path().trim_matches('/');
    let (base, ext) = match path.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() && ext.len() <= 5 && !ext.contains('/') => (base, ext),
        _ => (path, "bin"),
    };

    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    Ok(format!(
        "{}_{:016x}.{ext}",
        sanitize(&format!("{host}_{base}")),
        hasher.finish()
    ))
}

/// Filesystem-safe slug: alphanumerics, dots and dashes survive, everything
/// else becomes an underscore. Long names are truncated.
pub(crate) fn sanitize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    out.truncate(120);
    out
}

/// Write via a temp file and rename, so a crash mid-download never leaves a
/// truncated file that a later idempotence check would trust.
pub(crate) async fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut tmp = target.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, bytes)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    tokio::fs::rename(&tmp, target)
        .await
        .with_context(|| format!("renaming into {}", target.display()))?;
    Ok(())
}
