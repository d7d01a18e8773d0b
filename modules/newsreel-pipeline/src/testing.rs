//! HashMap-backed mocks for the pipeline's external seams. No network, no
//! browser: tests register exact inputs and get deterministic outputs, and
//! anything unregistered errors like a dead endpoint would.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use newsreel_common::ExtractedContent;

use crate::traits::{
    ContentBundle, FactChecker, FactReview, HttpFetcher, PageRenderer, PlatformFiles, Publisher,
};

#[derive(Default)]
pub struct MockRenderer {
    pages: HashMap<String, String>,
    crawler_pages: HashMap<String, String>,
    /// Optional artificial render latency, for timeout behavior.
    delay: Option<Duration>,
    renders: Mutex<u32>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn on_crawler_page(mut self, url: &str, html: &str) -> Self {
        self.crawler_pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn render_count(&self) -> u32 {
        *self.renders.lock().unwrap()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        *self.renders.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.pages.get(url) {
            Some(html) => Ok(html.clone()),
            None => bail!("no page registered for {url}"),
        }
    }

    async fn render_as_crawler(&self, url: &str) -> Result<String> {
        *self.renders.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.crawler_pages.get(url) {
            Some(html) => Ok(html.clone()),
            None => bail!("no crawler page registered for {url}"),
        }
    }

    fn name(&self) -> &str {
        "mock-renderer"
    }
}

#[derive(Default)]
pub struct MockFetcher {
    texts: HashMap<String, String>,
    blobs: HashMap<String, Vec<u8>>,
    calls: Mutex<u32>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(mut self, url: &str, body: &str) -> Self {
        self.texts.insert(url.to_string(), body.to_string());
        self
    }

    pub fn on_bytes(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.blobs.insert(url.to_string(), bytes);
        self
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl HttpFetcher for MockFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        match self.texts.get(url) {
            Some(body) => Ok(body.clone()),
            None => bail!("no text registered for {url}"),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        *self.calls.lock().unwrap() += 1;
        match self.blobs.get(url) {
            Some(bytes) => Ok(bytes.clone()),
            None => bail!("no bytes registered for {url}"),
        }
    }
}

#[derive(Default)]
pub struct MockFiles {
    /// file_id -> transient path
    paths: HashMap<String, String>,
    /// transient path -> bytes
    blobs: HashMap<String, Vec<u8>>,
    calls: Mutex<u32>,
}

impl MockFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_file(mut self, file_id: &str, transient_path: &str, bytes: Vec<u8>) -> Self {
        self.paths
            .insert(file_id.to_string(), transient_path.to_string());
        self.blobs.insert(transient_path.to_string(), bytes);
        self
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PlatformFiles for MockFiles {
    async fn resolve_path(&self, file_id: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        match self.paths.get(file_id) {
            Some(path) => Ok(path.clone()),
            None => bail!("no file registered for {file_id}"),
        }
    }

    async fn download(&self, transient_path: &str) -> Result<Vec<u8>> {
        *self.calls.lock().unwrap() += 1;
        match self.blobs.get(transient_path) {
            Some(bytes) => Ok(bytes.clone()),
            None => bail!("no bytes registered for {transient_path}"),
        }
    }
}

/// Publisher that records every bundle it receives.
#[derive(Default)]
pub struct CollectingPublisher {
    published: Mutex<Vec<ContentBundle>>,
}

impl CollectingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<ContentBundle> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for CollectingPublisher {
    async fn publish(&self, bundle: &ContentBundle) -> Result<()> {
        self.published.lock().unwrap().push(bundle.clone());
        Ok(())
    }
}

/// Fact checker with a fixed verdict.
pub struct StaticFactChecker {
    pub confidence: f32,
    pub corrections: Vec<String>,
}

impl StaticFactChecker {
    pub fn confident() -> Self {
        Self {
            confidence: 1.0,
            corrections: Vec::new(),
        }
    }
}

#[async_trait]
impl FactChecker for StaticFactChecker {
    async fn review(&self, _record: &ExtractedContent) -> Result<FactReview> {
        Ok(FactReview {
            confidence: self.confidence,
            corrections: self.corrections.clone(),
        })
    }
}
