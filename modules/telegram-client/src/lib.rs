pub mod error;
pub mod types;

pub use error::{Result, TelegramError};
pub use types::FileInfo;

use std::time::Duration;

use types::ApiResponse;

const BASE_URL: &str = "https://api.telegram.org";

/// File-retrieval client for the Telegram Bot API. Media attached to a post
/// is addressed by opaque file ids; downloading is a two-step exchange:
/// `getFile` resolves the id to a transient path, then the file endpoint
/// serves the bytes for that path.
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host, e.g. a local Bot API
    /// server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Resolve a file id to its transient download path.
    pub async fn get_file(&self, file_id: &str) -> Result<String> {
        let url = format!("{}/bot{}/getFile", self.base_url, self.token);
        let resp = self
            .client
            .get(&url)
            .query(&[("file_id", file_id)])
            .send()
            .await?;

        let api_resp: ApiResponse<FileInfo> = resp.json().await?;
        if !api_resp.ok {
            return Err(TelegramError::Api(
                api_resp.description.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        let info = api_resp
            .result
            .ok_or_else(|| TelegramError::Parse("empty getFile result".to_string()))?;

        tracing::debug!(file_id, size = ?info.file_size, "Resolved file path");

        info.file_path
            .ok_or_else(|| TelegramError::MissingFilePath(file_id.to_string()))
    }

    /// Download the bytes behind a transient path returned by `get_file`.
    pub async fn download(&self, file_path: &str) -> Result<Vec<u8>> {
        let url = format!("{}/file/bot{}/{}", self.base_url, self.token, file_path);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TelegramError::Api(format!("status {status}: {body}")));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
