use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserlessError>;

#[derive(Debug, Error)]
pub enum BrowserlessError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Render API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The render completed but produced no DOM at all. Happens when the
    /// target navigates to about:blank or the session is killed mid-render.
    #[error("Empty DOM rendered for {0}")]
    EmptyDom(String),
}

impl From<reqwest::Error> for BrowserlessError {
    fn from(err: reqwest::Error) -> Self {
        BrowserlessError::Network(err.to_string())
    }
}
