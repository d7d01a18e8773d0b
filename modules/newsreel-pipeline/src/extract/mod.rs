pub mod chain;
pub mod html;
pub mod inline;
pub mod metadata;
pub mod snapshot;

pub use chain::ExtractionChain;
pub use html::Partial;
