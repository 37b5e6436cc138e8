use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

use crate::models::ReputationError;

/// Reputation tiers, lowest first. Ordering follows the tier order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Newcomer,
    Explorer,
    #[serde(alias = "DeFi User")]
    Contributor,
    Veteran,
    #[serde(alias = "Power User")]
    Legend,
}

/// Colors and glyph used to render a tier's badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStyle {
    pub frame_color: &'static str,
    pub star_color: &'static str,
    pub initial: char,
    pub star_stroke_width: u8,
}

impl BadgeStyle {
    pub const UNKNOWN: BadgeStyle = BadgeStyle {
        frame_color: "#455A64",
        star_color: "#78909C",
        initial: '?',
        star_stroke_width: 0,
    };
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Newcomer,
        Category::Explorer,
        Category::Contributor,
        Category::Veteran,
        Category::Legend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Newcomer => "Newcomer",
            Category::Explorer => "Explorer",
            Category::Contributor => "Contributor",
            Category::Veteran => "Veteran",
            Category::Legend => "Legend",
        }
    }

    pub const fn base_score(&self) -> u8 {
        match self {
            Category::Newcomer => 10,
            Category::Explorer => 30,
            Category::Contributor => 60,
            Category::Veteran => 85,
            Category::Legend => 95,
        }
    }

    pub const fn max_score(&self) -> u8 {
        match self {
            Category::Newcomer => 19,
            Category::Explorer => 49,
            Category::Contributor => 79,
            Category::Veteran => 94,
            Category::Legend => 100,
        }
    }

    /// Scores the scorer can assign within this tier.
    pub fn score_range(&self) -> RangeInclusive<u8> {
        match self {
            Category::Legend => self.base_score()..=self.base_score(),
            _ => self.base_score()..=self.max_score(),
        }
    }

    pub const fn style(&self) -> BadgeStyle {
        match self {
            Category::Newcomer => BadgeStyle {
                frame_color: "#607D8B",
                star_color: "#81D4FA",
                initial: 'N',
                star_stroke_width: 0,
            },
            Category::Explorer => BadgeStyle {
                frame_color: "#A1887F",
                star_color: "#4DB6AC",
                initial: 'E',
                star_stroke_width: 1,
            },
            Category::Contributor => BadgeStyle {
                frame_color: "#4CAF50",
                star_color: "#8BC34A",
                initial: 'C',
                star_stroke_width: 2,
            },
            Category::Veteran => BadgeStyle {
                frame_color: "#3F51B5",
                star_color: "#03A9F4",
                initial: 'V',
                star_stroke_width: 3,
            },
            Category::Legend => BadgeStyle {
                frame_color: "#FFC107",
                star_color: "#FFEB3B",
                initial: 'L',
                star_stroke_width: 4,
            },
        }
    }

    /// Extra sentence appended to the summary message for the extreme tiers.
    pub fn message_suffix(&self) -> Option<&'static str> {
        match self {
            Category::Newcomer => Some("Welcome to the chain!"),
            Category::Legend => Some("A true DeFi degen!"),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that is neither a tier nor one of its legacy aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown reputation category")]
pub struct UnknownCategory;

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive; accepts "DeFi User" and "Power User" from older metadata.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newcomer" => Ok(Category::Newcomer),
            "explorer" => Ok(Category::Explorer),
            "contributor" | "defi user" => Ok(Category::Contributor),
            "veteran" => Ok(Category::Veteran),
            "legend" | "power user" => Ok(Category::Legend),
            _ => Err(UnknownCategory),
        }
    }
}

/// On-chain facts about an address at analysis time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSnapshot {
    pub address: String,
    pub transaction_count: u64,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountDetails {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default, alias = "balance_bnb")]
    pub balance: Decimal,
}

impl From<AccountSnapshot> for AccountDetails {
    fn from(snapshot: AccountSnapshot) -> Self {
        Self {
            address: snapshot.address,
            transaction_count: snapshot.transaction_count,
            balance: snapshot.balance,
        }
    }
}

/// Outcome of a successful analysis. Built once per request and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReputationResult {
    pub category: Category,
    pub score: u8,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rationale: String,
    pub details: AccountDetails,
}

impl ReputationResult {
    /// Check that a result handed back by a client is one the scorer could have produced.
    pub fn validate_for(&self, recipient: &str) -> Result<(), ReputationError> {
        if !self.category.score_range().contains(&self.score) {
            return Err(ReputationError::InvalidReputation(format!(
                "score {} is outside the {} range",
                self.score, self.category
            )));
        }

        if !self.details.address.is_empty()
            && !self.details.address.eq_ignore_ascii_case(recipient)
        {
            return Err(ReputationError::InvalidReputation(format!(
                "result was computed for {}, not {}",
                self.details.address, recipient
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FailureDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Error record returned in place of a result. Always category "Error" with score 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisFailure {
    pub category: String,
    pub score: u8,
    pub message: String,
    pub rationale: String,
    pub details: FailureDetails,
}

impl AnalysisFailure {
    pub fn new(message: String, address: Option<String>) -> Self {
        Self {
            category: "Error".to_string(),
            score: 0,
            message,
            rationale: String::new(),
            details: FailureDetails { address },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Scored(ReputationResult),
    Failed(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed(_))
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            AnalysisOutcome::Scored(result) => Some(result.category),
            AnalysisOutcome::Failed(_) => None,
        }
    }
}
