use async_trait::async_trait;

use crate::models::{AccountSnapshot, IssuedBadge, Result};

/// Source of on-chain account facts.
#[async_trait]
pub trait AccountDataProvider: Send + Sync {
    /// Fetch transaction count and native balance for an address.
    async fn fetch_account(&self, address: &str) -> Result<AccountSnapshot>;
}

/// The soulbound badge ledger.
#[async_trait]
pub trait BadgeRegistry: Send + Sync {
    /// Whether the recipient already holds a badge.
    async fn has_badge(&self, recipient: &str) -> Result<bool>;

    /// Mint a badge pointing at `token_uri` and wait for confirmation.
    async fn issue(&self, recipient: &str, token_uri: &str) -> Result<IssuedBadge>;
}

/// Configuration for chain clients
#[derive(Debug, Clone)]
pub struct ChainClientConfig {
    pub rpc_url: String,
    pub chain_id: Option<u64>,
    pub timeout_seconds: u64,
}
