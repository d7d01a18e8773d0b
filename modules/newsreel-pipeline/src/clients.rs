// Bridge between the infrastructure clients and the pipeline's trait seams.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::info;

use browserless_client::{BrowserlessClient, RenderOptions};
use telegram_client::TelegramClient;

use crate::traits::{HttpFetcher, PageRenderer, PlatformFiles};

/// Max concurrent rendering sessions. Each render holds an exclusive
/// browser-engine instance (~100MB+ RSS) for its duration.
const MAX_CONCURRENT_RENDERS: usize = 2;

/// Browser identity presented on plain HTTP fetches. Best-effort spoofing;
/// the crawler-identity technique goes through the renderer instead.
const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// PageRenderer over Browserless with a concurrency cap.
pub struct RenderPool {
    client: BrowserlessClient,
    semaphore: Semaphore,
}

impl RenderPool {
    pub fn new(client: BrowserlessClient) -> Self {
        info!(max_concurrent = MAX_CONCURRENT_RENDERS, "Using Browserless render pool");
        Self {
            client,
            semaphore: Semaphore::new(MAX_CONCURRENT_RENDERS),
        }
    }
}

#[async_trait]
impl PageRenderer for RenderPool {
    async fn render(&self, url: &str) -> Result<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| anyhow::anyhow!("Render semaphore closed"))?;

        info!(url, renderer = "browserless", "Rendering page");

        // An empty DOM surfaces as BrowserlessError::EmptyDom and counts as
        // a failed technique, not an empty contribution.
        let html = self
            .client
            .content(url)
            .await
            .context("Browserless content request failed")?;
        Ok(html)
    }

    async fn render_as_crawler(&self, url: &str) -> Result<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| anyhow::anyhow!("Render semaphore closed"))?;

        info!(url, renderer = "browserless", identity = "googlebot", "Rendering page");

        let html = self
            .client
            .content_with(url, &RenderOptions::googlebot())
            .await
            .context("Browserless crawler-identity request failed")?;
        Ok(html)
    }

    fn name(&self) -> &str {
        "browserless"
    }
}

/// Plain reqwest-backed fetcher for snapshots, static HTML and media bytes.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(DESKTOP_UA)
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("GET {url} returned status {status}");
        }
        Ok(resp.text().await?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("GET {url} returned status {status}");
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[async_trait]
impl PlatformFiles for TelegramClient {
    async fn resolve_path(&self, file_id: &str) -> Result<String> {
        Ok(self.get_file(file_id).await.map_err(|e| anyhow::anyhow!("{e}"))?)
    }

    async fn download(&self, transient_path: &str) -> Result<Vec<u8>> {
        Ok(TelegramClient::download(self, transient_path)
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))?)
    }
}
