pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::Duration;

/// Per-request rendering identity and budget. The defaults render as the
/// service's stock browser; the crawler-identity extraction technique sets a
/// search-engine user agent and referer instead.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// Navigation timeout passed through to the browser, milliseconds.
    pub goto_timeout_ms: Option<u64>,
}

impl RenderOptions {
    /// Identify as Googlebot arriving from a Google search result. Some
    /// sources relax access restriction for identified crawlers.
    pub fn googlebot() -> Self {
        Self {
            user_agent: Some(
                "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
                    .to_string(),
            ),
            referer: Some("https://www.google.com/".to_string()),
            goto_timeout_ms: None,
        }
    }
}

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Fetch fully-rendered HTML for a URL via the /content endpoint.
    pub async fn content(&self, url: &str) -> Result<String> {
        self.content_with(url, &RenderOptions::default()).await
    }

    /// Fetch fully-rendered HTML with an explicit rendering identity.
    pub async fn content_with(&self, url: &str, opts: &RenderOptions) -> Result<String> {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let mut body = serde_json::json!({ "url": url });
        if let Some(ref ua) = opts.user_agent {
            body["userAgent"] = serde_json::json!(ua);
        }
        if let Some(ref referer) = opts.referer {
            body["extraHTTPHeaders"] = serde_json::json!({ "Referer": referer });
        }
        if let Some(ms) = opts.goto_timeout_ms {
            body["gotoOptions"] = serde_json::json!({ "timeout": ms, "waitUntil": "networkidle2" });
        }

        tracing::debug!(url, spoofed = opts.user_agent.is_some(), "Rendering page");

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let html = resp.text().await?;
        if html.trim().is_empty() {
            return Err(BrowserlessError::EmptyDom(url.to_string()));
        }
        Ok(html)
    }
}
