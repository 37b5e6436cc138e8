use serde::{Deserialize, Serialize};

use crate::models::ReputationError;

/// Receipt facts for a confirmed badge mint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedBadge {
    pub tx_hash: String,
    pub token_id: Option<u64>,
}

/// Response to a mint request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintOutcome {
    pub success: bool,
    pub message: String,
    pub tx_hash: Option<String>,
    #[serde(rename = "tokenId", skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
}

impl MintOutcome {
    pub fn minted(badge: IssuedBadge) -> Self {
        Self {
            success: true,
            message: "Badge minted successfully!".to_string(),
            tx_hash: Some(badge.tx_hash),
            token_id: badge.token_id,
        }
    }

    pub fn failed(error: &ReputationError) -> Self {
        Self {
            success: false,
            message: error.public_message(),
            tx_hash: error.tx_hash().map(str::to_string),
            token_id: None,
        }
    }
}
