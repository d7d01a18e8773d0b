use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use browserless_client::BrowserlessClient;
use newsreel_common::{Config, ContentLocator, InlinePost, NewsreelError};
use newsreel_pipeline::branding::BrandingResolver;
use newsreel_pipeline::clients::{RenderPool, ReqwestFetcher};
use newsreel_pipeline::media::MediaResolver;
use newsreel_pipeline::traits::{NoopFactChecker, NoopPublisher};
use newsreel_pipeline::{default_profiles, Dispatcher, ExtractionChain, Pipeline};
use telegram_client::TelegramClient;

#[derive(Parser)]
#[command(name = "newsreel", about = "Run one content locator through the extraction pipeline")]
struct Args {
    /// Article URL or platform-native locator (e.g. telegram://post/42)
    locator: String,

    /// Path to a JSON file holding the inline post payload, for
    /// platform-native locators
    #[arg(long)]
    post: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    let post: Option<InlinePost> = match &args.post {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Some(serde_json::from_str(&raw).context("parsing post payload")?)
        }
        None => None,
    };

    let renderer = Arc::new(RenderPool::new(BrowserlessClient::new(
        &config.browserless_url,
        config.browserless_token.as_deref(),
    )));
    let fetcher = Arc::new(ReqwestFetcher::new());
    let telegram = Arc::new(TelegramClient::new(config.telegram_bot_token.clone()));

    let pipeline = Pipeline::new(
        Dispatcher::new(default_profiles()),
        ExtractionChain::new(
            renderer,
            fetcher.clone(),
            Duration::from_secs(config.technique_budget_secs),
        ),
        MediaResolver::new(fetcher.clone(), telegram, config.media_dir.clone()),
        BrandingResolver::new(fetcher, config.logos_dir.clone()),
        Arc::new(NoopFactChecker),
        Arc::new(NoopPublisher),
    );

    let locator = ContentLocator::new(&args.locator);
    let outcome = pipeline.process(&locator, post.as_ref()).await;
    match outcome.into_result(&locator) {
        Ok((bundle, confidence)) => {
            println!("published: {} (confidence {confidence:.2})", bundle.content.title);
            for image in &bundle.manifest.images {
                println!("  image: {}", image.display());
            }
            for video in &bundle.manifest.videos {
                println!("  video: {}", video.display());
            }
            Ok(())
        }
        Err(e) => {
            if let NewsreelError::Extraction(failure) = &e {
                for attempt in &failure.attempts {
                    println!("  {}: {:?}", attempt.technique, attempt.outcome);
                }
            }
            error!(%locator, error = %e, "pipeline failed");
            Err(e.into())
        }
    }
}
