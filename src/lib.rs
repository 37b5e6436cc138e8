pub mod models;
pub mod config;
pub mod chains;
pub mod scoring;
pub mod badge;
pub mod narrative;
pub mod service;
pub mod api;
pub mod utils;

pub use models::{Category, ReputationResult, AnalysisOutcome, MintOutcome, ReputationError, Result};
pub use config::Settings;
pub use scoring::{ReputationScorer, ReputationThresholds};
pub use service::ReputationService;

// Re-export commonly used types
pub use rust_decimal::Decimal;
