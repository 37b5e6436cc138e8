use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::badge::svg::{render_badge_svg, svg_data_uri};
use crate::models::ReputationResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: Value,
}

impl MetadataAttribute {
    fn new(trait_type: &str, value: impl Into<Value>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
        }
    }
}

/// ERC-721 token metadata for a reputation badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BadgeMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<MetadataAttribute>,
}

impl BadgeMetadata {
    pub fn build(recipient: &str, result: &ReputationResult) -> Self {
        let category = result.category;
        let svg = render_badge_svg(&category.style());

        Self {
            name: format!("BNB Reputation Badge - {}", category),
            description: format!(
                "A soulbound reputation badge for {} on BNB Chain, representing the {} category.",
                recipient, category
            ),
            image: svg_data_uri(&svg),
            attributes: vec![
                MetadataAttribute::new("Category", category.as_str()),
                MetadataAttribute::new("Score", result.score),
                MetadataAttribute::new("Transactions", result.details.transaction_count),
            ],
        }
    }
}

/// Metadata plus the pinning labels that travel with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    pub metadata: BadgeMetadata,
    pub file_name: String,
    pub pin_name: String,
    pub recipient: String,
    pub category: String,
}

impl MetadataDocument {
    pub fn for_badge(recipient: &str, result: &ReputationResult) -> Self {
        Self {
            metadata: BadgeMetadata::build(recipient, result),
            file_name: format!("{}.json", recipient),
            pin_name: format!("Reputation Badge Metadata: {}", recipient),
            recipient: recipient.to_string(),
            category: result.category.to_string(),
        }
    }
}
