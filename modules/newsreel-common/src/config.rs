use std::env;
use std::path::PathBuf;

/// Pipeline configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Rendering
    pub browserless_url: String,
    pub browserless_token: Option<String>,

    // Platform file API
    pub telegram_bot_token: String,

    // Local asset directories
    pub media_dir: PathBuf,
    pub logos_dir: PathBuf,

    // Per-technique extraction time budget, seconds
    pub technique_budget_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            browserless_url: required_env("BROWSERLESS_URL"),
            browserless_token: env::var("BROWSERLESS_TOKEN").ok(),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            media_dir: env::var("MEDIA_DIR")
                .unwrap_or_else(|_| "media".to_string())
                .into(),
            logos_dir: env::var("LOGOS_DIR")
                .unwrap_or_else(|_| "logos".to_string())
                .into(),
            technique_budget_secs: env::var("TECHNIQUE_BUDGET_SECS")
                .unwrap_or_else(|_| "45".to_string())
                .parse()
                .expect("TECHNIQUE_BUDGET_SECS must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
