//! Completeness gate between extraction and media resolution.
//!
//! Checks run against the record as extracted, before any media fetches, so
//! a rejected record costs no downloads. All issues are collected in one
//! pass; the caller logs the full list.

use tracing::warn;

use newsreel_common::{ExtractedContent, SourceProfile, ValidationResult};

/// Minimum usable summary length, in characters.
pub const MIN_SUMMARY_LEN: usize = 20;

pub fn validate(record: &ExtractedContent, profile: &SourceProfile) -> ValidationResult {
    let mut issues = Vec::new();

    if record.title.trim().is_empty() {
        issues.push("title missing".to_string());
    }

    let body_len = record.body.trim().chars().count();
    if body_len < profile.min_body_len {
        issues.push(format!(
            "body too short: {body_len} < {}",
            profile.min_body_len
        ));
    }

    // Summary falls back to the body, so this only fires when both are thin.
    let summary = if record.description.trim().is_empty() {
        record.body.trim()
    } else {
        record.description.trim()
    };
    if summary.chars().count() < MIN_SUMMARY_LEN {
        issues.push(format!(
            "summary too short: {} < {MIN_SUMMARY_LEN}",
            summary.chars().count()
        ));
    }

    if record.images.is_empty() && record.videos.is_empty() && !profile.media_optional {
        issues.push("no media references".to_string());
    }

    if !issues.is_empty() {
        warn!(
            locator = %record.locator,
            source = %record.source,
            issues = ?issues,
            "Record rejected"
        );
    }
    ValidationResult::from_issues(issues)
}
