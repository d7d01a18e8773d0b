pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{ExtractionFailure, NewsreelError};
pub use types::{
    AttemptOutcome, ContentLocator, ContentType, DocumentAttachment, ExtractedContent, InlinePost,
    MediaManifest, MediaRef, PhotoRendition, SelectorSet, SourceCategory, SourceProfile, Technique,
    TechniqueAttempt, ValidationResult,
};
