pub mod openrouter;

use async_trait::async_trait;

use crate::models::Category;

pub use openrouter::OpenRouterNarrator;

/// Returned when no language model is configured.
pub const NARRATIVE_UNAVAILABLE: &str = "AI rationale generation is currently unavailable.";

/// Returned when the language model call fails.
pub const NARRATIVE_FAILED: &str = "Could not generate AI rationale at this time.";

/// Produces a short human-readable rationale for a category assignment.
/// Never fails: implementations fall back to a fixed sentence.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, category: Category, transaction_count: u64, address: &str) -> String;
}

/// Narrator used when no model credentials are configured.
#[derive(Debug, Default, Clone)]
pub struct StaticNarrator;

#[async_trait]
impl NarrativeGenerator for StaticNarrator {
    async fn generate(&self, _category: Category, _transaction_count: u64, _address: &str) -> String {
        NARRATIVE_UNAVAILABLE.to_string()
    }
}
