//! End-to-end orchestration: dispatch, extract, validate, resolve media,
//! resolve branding, fact-check, publish.
//!
//! The stages after validation are best-effort from the bundle's point of
//! view: fact-check and publish failures are logged and never change the
//! outcome of an already-accepted record.

use std::sync::Arc;

use tracing::{info, warn};

use newsreel_common::{
    AttemptOutcome, ContentLocator, ExtractionFailure, InlinePost, NewsreelError, SourceCategory,
    Technique, TechniqueAttempt,
};

use crate::branding::BrandingResolver;
use crate::dispatch::Dispatcher;
use crate::extract::{inline, ExtractionChain};
use crate::media::MediaResolver;
use crate::traits::{ContentBundle, FactChecker, Publisher};
use crate::validate::validate;

/// Terminal state of one locator's trip through the pipeline.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Accepted, resolved and handed to the publisher.
    Published {
        bundle: ContentBundle,
        confidence: f32,
    },
    /// No registered source claims the locator.
    Miss,
    /// Every extraction technique was exhausted without a usable record.
    ExtractionFailed { failure: ExtractionFailure },
    /// Extracted but rejected by the validation gate.
    Rejected { issues: Vec<String> },
}

impl PipelineOutcome {
    /// Collapse into the error taxonomy, for callers that only distinguish
    /// success from failure.
    pub fn into_result(
        self,
        locator: &ContentLocator,
    ) -> Result<(ContentBundle, f32), NewsreelError> {
        match self {
            PipelineOutcome::Published { bundle, confidence } => Ok((bundle, confidence)),
            PipelineOutcome::Miss => Err(NewsreelError::DispatchMiss(locator.to_string())),
            PipelineOutcome::ExtractionFailed { failure } => {
                Err(NewsreelError::Extraction(failure))
            }
            PipelineOutcome::Rejected { issues } => Err(NewsreelError::Validation(issues)),
        }
    }
}

pub struct Pipeline {
    dispatcher: Dispatcher,
    chain: ExtractionChain,
    media: MediaResolver,
    branding: BrandingResolver,
    fact_checker: Arc<dyn FactChecker>,
    publisher: Arc<dyn Publisher>,
}

impl Pipeline {
    pub fn new(
        dispatcher: Dispatcher,
        chain: ExtractionChain,
        media: MediaResolver,
        branding: BrandingResolver,
        fact_checker: Arc<dyn FactChecker>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            dispatcher,
            chain,
            media,
            branding,
            fact_checker,
            publisher,
        }
    }

    /// Process one locator. Inline posts carry their payload in `post`;
    /// URL locators leave it None.
    pub async fn process(
        &self,
        locator: &ContentLocator,
        post: Option<&InlinePost>,
    ) -> PipelineOutcome {
        let Some(profile) = self.dispatcher.dispatch(locator) else {
            info!(%locator, "No source claims locator");
            return PipelineOutcome::Miss;
        };

        // Relay posts never hit the network chain: their payload is inline.
        let extracted = if profile.category == SourceCategory::PlatformRelay {
            match post.and_then(|p| inline::extract_post(locator, profile, p)) {
                Some(record) => Ok(record),
                None => Err(ExtractionFailure {
                    locator: locator.clone(),
                    attempts: vec![TechniqueAttempt {
                        technique: Technique::InlinePost,
                        outcome: AttemptOutcome::Failed("no usable post payload".to_string()),
                    }],
                }),
            }
        } else {
            self.chain.extract(locator, profile).await
        };

        let mut record = match extracted {
            Ok(record) => record,
            Err(failure) => return PipelineOutcome::ExtractionFailed { failure },
        };

        let verdict = validate(&record, profile);
        if !verdict.passed {
            return PipelineOutcome::Rejected {
                issues: verdict.issues,
            };
        }

        let manifest = self.media.resolve(&mut record, profile).await;
        self.branding.resolve(&mut record, profile).await;

        // Advisory only. A checker outage must not block publication.
        let confidence = match self.fact_checker.review(&record).await {
            Ok(review) => {
                if !review.corrections.is_empty() {
                    info!(%locator, corrections = ?review.corrections, "Fact-check corrections");
                }
                review.confidence
            }
            Err(e) => {
                warn!(%locator, error = %e, "Fact-check unavailable");
                1.0
            }
        };

        let bundle = ContentBundle {
            content: record,
            manifest,
        };

        if let Err(e) = self.publisher.publish(&bundle).await {
            warn!(%locator, error = %e, "Publish failed");
        } else {
            info!(%locator, title = %bundle.content.title, "Published");
        }

        PipelineOutcome::Published { bundle, confidence }
    }
}
