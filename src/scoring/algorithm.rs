use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::models::Category;
use crate::scoring::ReputationThresholds;

/// Category, score and summary derived from a transaction count.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Assessment {
    pub category: Category,
    pub score: u8,
    pub message: String,
}

/// Deterministic transaction-count scorer. Holds only read-only thresholds.
#[derive(Debug, Clone, Default)]
pub struct ReputationScorer {
    thresholds: ReputationThresholds,
}

impl ReputationScorer {
    pub fn new(thresholds: ReputationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ReputationThresholds {
        &self.thresholds
    }

    pub fn categorize(&self, transaction_count: u64) -> Category {
        self.thresholds.categorize(transaction_count)
    }

    pub fn assess(&self, transaction_count: u64, address: &str) -> Assessment {
        let category = self.categorize(transaction_count);
        let score = self.score_within(category, transaction_count);

        debug!(
            address,
            transaction_count,
            category = category.as_str(),
            score,
            "Scored address"
        );

        Assessment {
            category,
            score,
            message: compose_message(category, transaction_count),
        }
    }

    pub fn score(&self, transaction_count: u64) -> u8 {
        let category = self.categorize(transaction_count);
        self.score_within(category, transaction_count)
    }

    fn score_within(&self, category: Category, transaction_count: u64) -> u8 {
        let base = category.base_score();

        let score = match self.thresholds.band(category) {
            (lower, Some(upper)) => {
                let width = u128::from(category.max_score() - base);
                let span = u128::from(upper - lower);
                let offset = u128::from(transaction_count.saturating_sub(lower)).min(span);

                // round(offset / span * width) without floats, ties to even
                let numerator = offset * width;
                let (quotient, remainder) = (numerator / span, numerator % span);
                let bonus = match (2 * remainder).cmp(&span) {
                    Ordering::Greater => quotient + 1,
                    Ordering::Equal if quotient % 2 == 1 => quotient + 1,
                    _ => quotient,
                };
                let bonus = u8::try_from(bonus).unwrap_or(u8::MAX);

                base.saturating_add(bonus).min(category.max_score())
            }
            // Top tier is pinned at its base
            (_, None) => base,
        };

        score.min(100)
    }
}

fn compose_message(category: Category, transaction_count: u64) -> String {
    let mut message = format!(
        "Based on {} transactions, this address is categorized as a {}.",
        transaction_count, category
    );
    if let Some(suffix) = category.message_suffix() {
        message.push(' ');
        message.push_str(suffix);
    }
    message
}
