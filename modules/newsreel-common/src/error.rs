use thiserror::Error;

use crate::types::{ContentLocator, TechniqueAttempt};

/// The fallback chain was exhausted without producing a record with both a
/// non-empty title and body. Terminal for the locator; not retried within
/// the same pipeline run.
#[derive(Debug, Clone, Error)]
#[error("extraction exhausted for {locator} after {} technique(s)", attempts.len())]
pub struct ExtractionFailure {
    pub locator: ContentLocator,
    pub attempts: Vec<TechniqueAttempt>,
}

/// Pipeline error taxonomy. Every variant is scoped to a single locator;
/// nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum NewsreelError {
    /// Not an error in the strict sense — a routing signal that no
    /// registered profile accepts the locator.
    #[error("no engine available for {0}")]
    DispatchMiss(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    #[error("content rejected: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Network or platform-API failure on one specific media reference.
    /// Caught per-reference; never aborts the manifest.
    #[error("media transport error for {reference}: {message}")]
    MediaTransport { reference: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttemptOutcome, Technique, TechniqueAttempt};

    #[test]
    fn validation_error_joins_its_issues() {
        let e = NewsreelError::Validation(vec![
            "title missing".to_string(),
            "body too short: 10 < 100".to_string(),
        ]);
        assert_eq!(
            e.to_string(),
            "content rejected: title missing; body too short: 10 < 100"
        );
    }

    #[test]
    fn extraction_failure_reports_attempt_count() {
        let failure = ExtractionFailure {
            locator: ContentLocator::new("https://example.com/a"),
            attempts: vec![TechniqueAttempt {
                technique: Technique::StaticHtml,
                outcome: AttemptOutcome::Empty,
            }],
        };
        let e = NewsreelError::from(failure);
        assert!(e.to_string().contains("after 1 technique(s)"));
    }

    #[test]
    fn media_transport_error_names_the_reference() {
        let e = NewsreelError::MediaTransport {
            reference: "https://example.com/a.jpg".to_string(),
            message: "connection reset".to_string(),
        };
        assert!(e.to_string().contains("https://example.com/a.jpg"));
        assert!(e.to_string().contains("connection reset"));
    }
}
