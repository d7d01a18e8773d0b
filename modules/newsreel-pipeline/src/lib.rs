pub mod branding;
pub mod clients;
pub mod dispatch;
pub mod extract;
pub mod media;
pub mod pipeline;
pub mod profiles;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod validate;

pub use dispatch::Dispatcher;
pub use extract::ExtractionChain;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use profiles::default_profiles;
pub use traits::{ContentBundle, FactChecker, FactReview, HttpFetcher, PageRenderer, PlatformFiles, Publisher};
