use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::U256,
    utils::format_units,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    chains::{client::ChainClientConfig, AccountDataProvider},
    models::{AccountSnapshot, ReputationError, Result},
    utils::{parse_evm_address, to_checksum_address},
};

/// Balance precision reported to callers.
const BALANCE_DECIMALS: u32 = 6;

/// Build an HTTP provider whose requests honour the configured timeout.
pub fn build_provider(config: &ChainClientConfig) -> Result<Provider<Http>> {
    let url = reqwest::Url::parse(&config.rpc_url)
        .map_err(|e| ReputationError::ConfigError(format!("Invalid RPC URL: {}", e)))?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| ReputationError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Provider::new(Http::new_with_client(url, http_client)))
}

/// Reads account data from an EVM JSON-RPC endpoint.
pub struct EvmAccountClient {
    provider: Arc<Provider<Http>>,
    chain_id: u64,
}

impl EvmAccountClient {
    pub async fn connect(config: &ChainClientConfig) -> Result<Self> {
        let provider = Arc::new(build_provider(config)?);

        let chain_id = provider.get_chainid().await
            .map_err(|e| ReputationError::RpcError {
                operation: "eth_chainId".to_string(),
                message: e.to_string(),
            })?;

        if let Some(expected_id) = config.chain_id {
            if chain_id.as_u64() != expected_id {
                return Err(ReputationError::ConfigError(
                    format!("Chain ID mismatch: expected {}, got {}", expected_id, chain_id)
                ));
            }
        }

        info!(chain_id = chain_id.as_u64(), "Connected to RPC provider");

        Ok(Self {
            provider,
            chain_id: chain_id.as_u64(),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait]
impl AccountDataProvider for EvmAccountClient {
    async fn fetch_account(&self, address: &str) -> Result<AccountSnapshot> {
        let parsed = parse_evm_address(address)?;
        let checksummed = to_checksum_address(address)?;

        let transaction_count = self.provider.get_transaction_count(parsed, None).await
            .map_err(|e| ReputationError::RpcError {
                operation: "eth_getTransactionCount".to_string(),
                message: e.to_string(),
            })?;

        let balance_wei = self.provider.get_balance(parsed, None).await
            .map_err(|e| ReputationError::RpcError {
                operation: "eth_getBalance".to_string(),
                message: e.to_string(),
            })?;

        let transaction_count = u64::try_from(transaction_count)
            .map_err(|_| ReputationError::Internal(format!("Nonce overflow for {}", checksummed)))?;
        let balance = wei_to_native(balance_wei)?;

        debug!(address = %checksummed, transaction_count, %balance, "Fetched account data");

        Ok(AccountSnapshot {
            address: checksummed,
            transaction_count,
            balance,
        })
    }
}

/// Convert a wei amount to native units, rounded to six decimal places.
pub fn wei_to_native(wei: U256) -> Result<Decimal> {
    let formatted = format_units(wei, "ether")
        .map_err(|e| ReputationError::Internal(format!("Failed to format balance: {}", e)))?;

    // Keep a few extra digits for rounding and stay inside Decimal's precision.
    let trimmed = match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let keep = fraction.len().min(BALANCE_DECIMALS as usize + 2);
            format!("{}.{}", whole, &fraction[..keep])
        }
        None => formatted,
    };

    Decimal::from_str(&trimmed)
        .map(|d| d.round_dp(BALANCE_DECIMALS))
        .map_err(|e| ReputationError::Internal(format!("Balance {} out of range: {}", trimmed, e)))
}
