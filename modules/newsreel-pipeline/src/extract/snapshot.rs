//! Archived-snapshot lookup.
//!
//! Mirrors are probed in fixed priority order; the first that returns usable
//! HTML wins. archive.is blocks frequently, so it goes last.

use tracing::{debug, info};

use crate::traits::HttpFetcher;

const MIRRORS: [&str; 3] = ["archive.ph", "archive.today", "archive.is"];

/// Snapshots below this size are interstitials or error pages.
const MIN_USABLE_LEN: usize = 2000;

/// Fetch the newest archived copy of a URL, or None if no mirror has one.
pub async fn fetch_snapshot(fetcher: &dyn HttpFetcher, url: &str) -> Option<String> {
    for mirror in MIRRORS {
        let snapshot_url = format!("https://{mirror}/newest/{url}");
        match fetcher.get_text(&snapshot_url).await {
            Ok(html) if usable_html(&html) => {
                info!(mirror, url, bytes = html.len(), "Snapshot hit");
                return Some(html);
            }
            Ok(html) => {
                debug!(mirror, url, bytes = html.len(), "Snapshot unusable");
            }
            Err(e) => {
                debug!(mirror, url, error = %e, "Snapshot fetch failed");
            }
        }
    }
    None
}

fn usable_html(html: &str) -> bool {
    html.len() >= MIN_USABLE_LEN && html.to_lowercase().contains("<html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    #[tokio::test]
    async fn first_usable_mirror_wins() {
        let page = format!("<html><body>{}</body></html>", "article text ".repeat(200));
        let fetcher = MockFetcher::new()
            .on_text("https://archive.today/newest/https://example.com/a", &page);

        let html = fetch_snapshot(&fetcher, "https://example.com/a")
            .await
            .expect("second mirror has a copy");
        assert!(html.contains("article text"));
    }

    #[tokio::test]
    async fn short_interstitials_are_rejected() {
        let fetcher = MockFetcher::new()
            .on_text("https://archive.ph/newest/https://example.com/a", "<html>wait</html>");

        assert!(fetch_snapshot(&fetcher, "https://example.com/a").await.is_none());
    }
}
