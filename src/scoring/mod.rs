pub mod algorithm;
pub mod thresholds;

pub use algorithm::{Assessment, ReputationScorer};
pub use thresholds::ReputationThresholds;
