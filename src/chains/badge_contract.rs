use async_trait::async_trait;
use ethers::{
    abi::{self, ParamType, Token},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, Address, Bytes, Log, TransactionRequest, H256, U256, U64},
    utils::{id, keccak256},
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::{
    chains::BadgeRegistry,
    models::{IssuedBadge, ReputationError, Result},
    utils::parse_evm_address,
};

/// Solidity signatures of the badge contract surface.
pub struct BadgeSignatures;

impl BadgeSignatures {
    pub const HAS_BADGE: &'static str = "hasBadge(address)";
    pub const SAFE_MINT: &'static str = "safeMint(address,string)";
    pub const BADGE_MINTED: &'static str = "BadgeMinted(address,uint256,string)";
    pub const TRANSFER: &'static str = "Transfer(address,address,uint256)";
}

#[derive(Debug, Clone)]
pub struct IssuanceOptions {
    pub receipt_timeout: Duration,
    pub confirmations: usize,
    pub fallback_gas_limit: U256,
}

impl Default for IssuanceOptions {
    fn default() -> Self {
        Self {
            receipt_timeout: Duration::from_secs(120),
            confirmations: 1,
            fallback_gas_limit: U256::from(300_000u64),
        }
    }
}

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Soulbound badge contract reached through a local signing key.
pub struct BadgeContract {
    client: Arc<SignerClient>,
    contract: Address,
    options: IssuanceOptions,
}

impl BadgeContract {
    pub fn new(
        provider: Provider<Http>,
        chain_id: u64,
        contract_address: &str,
        private_key: &str,
        options: IssuanceOptions,
    ) -> Result<Self> {
        let contract = parse_evm_address(contract_address)
            .map_err(|_| ReputationError::ConfigError(format!("Invalid contract address: {}", contract_address)))?;

        let wallet = LocalWallet::from_str(private_key.trim())
            .map_err(|_| ReputationError::ConfigError("Invalid private key format".to_string()))?
            .with_chain_id(chain_id);

        info!(minter = ?wallet.address(), contract = ?contract, "Badge contract configured");

        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            contract,
            options,
        })
    }

    /// Whether any bytecode is deployed at the configured address.
    pub async fn has_code(&self) -> Result<bool> {
        let code = self.client.get_code(self.contract, None).await
            .map_err(|e| ReputationError::RpcError {
                operation: "eth_getCode".to_string(),
                message: e.to_string(),
            })?;
        Ok(!code.as_ref().is_empty())
    }

    fn issuance_error(message: impl Into<String>, tx_hash: Option<String>) -> ReputationError {
        ReputationError::IssuanceFailure {
            message: message.into(),
            tx_hash,
        }
    }
}

#[async_trait]
impl BadgeRegistry for BadgeContract {
    async fn has_badge(&self, recipient: &str) -> Result<bool> {
        let recipient_addr = parse_evm_address(recipient)?;

        let call: TypedTransaction = TransactionRequest::new()
            .to(self.contract)
            .data(encode_has_badge(recipient_addr))
            .into();

        debug!(recipient, "Calling hasBadge");
        let output = self.client.call(&call, None).await
            .map_err(|e| ReputationError::RpcError {
                operation: "hasBadge".to_string(),
                message: e.to_string(),
            })?;

        let has_badge = decode_bool(&output)?;
        info!(recipient, has_badge, "Badge lookup");
        Ok(has_badge)
    }

    async fn issue(&self, recipient: &str, token_uri: &str) -> Result<IssuedBadge> {
        let recipient_addr = parse_evm_address(recipient)?;

        let mut tx = TransactionRequest::new()
            .to(self.contract)
            .from(self.client.address())
            .data(encode_safe_mint(recipient_addr, token_uri));

        let estimate: TypedTransaction = tx.clone().into();
        let gas = match self.client.estimate_gas(&estimate, None).await {
            Ok(gas) => {
                info!(%gas, "Gas estimated");
                gas
            }
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = %self.options.fallback_gas_limit,
                    "Gas estimation failed, using fallback limit"
                );
                self.options.fallback_gas_limit
            }
        };
        tx = tx.gas(gas);

        info!(recipient, token_uri, "Sending mint transaction");
        let pending = self.client.send_transaction(tx, None).await
            .map_err(|e| Self::issuance_error(format!("Failed to submit transaction: {}", e), None))?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        info!(%tx_hash, "Mint transaction sent, waiting for receipt");

        let receipt = tokio::time::timeout(
            self.options.receipt_timeout,
            pending.confirmations(self.options.confirmations),
        )
        .await
        .map_err(|_| Self::issuance_error("Timed out waiting for receipt", Some(tx_hash.clone())))?
        .map_err(|e| Self::issuance_error(format!("Receipt lookup failed: {}", e), Some(tx_hash.clone())))?
        .ok_or_else(|| Self::issuance_error("Transaction dropped from mempool", Some(tx_hash.clone())))?;

        if receipt.status != Some(U64::from(1)) {
            error!(%tx_hash, status = ?receipt.status, "Mint transaction reverted");
            return Err(Self::issuance_error("Transaction reverted", Some(tx_hash)));
        }

        let token_id = match extract_token_id(&receipt.logs) {
            Some(id) => match u64::try_from(id) {
                Ok(id) => {
                    info!(%tx_hash, token_id = id, "Badge minted");
                    Some(id)
                }
                Err(_) => {
                    warn!(%tx_hash, token_id = %id, "Token id does not fit in u64");
                    None
                }
            },
            None => {
                warn!(%tx_hash, "Could not extract tokenId from event logs");
                None
            }
        };

        Ok(IssuedBadge { tx_hash, token_id })
    }
}

fn encode_call(signature: &str, args: &[Token]) -> Bytes {
    let mut data = id(signature).to_vec();
    data.extend(abi::encode(args));
    data.into()
}

pub fn encode_has_badge(recipient: Address) -> Bytes {
    encode_call(BadgeSignatures::HAS_BADGE, &[Token::Address(recipient)])
}

pub fn encode_safe_mint(recipient: Address, token_uri: &str) -> Bytes {
    encode_call(
        BadgeSignatures::SAFE_MINT,
        &[Token::Address(recipient), Token::String(token_uri.to_string())],
    )
}

fn decode_bool(output: &Bytes) -> Result<bool> {
    abi::decode(&[ParamType::Bool], output.as_ref())
        .ok()
        .and_then(|tokens| tokens.into_iter().next())
        .and_then(Token::into_bool)
        .ok_or_else(|| ReputationError::RpcError {
            operation: "hasBadge".to_string(),
            message: format!("Unexpected return data: 0x{}", hex::encode(output.as_ref())),
        })
}

/// Pull the minted token id out of receipt logs. `BadgeMinted` wins; otherwise an
/// ERC-721 `Transfer` from the zero address.
pub fn extract_token_id(logs: &[Log]) -> Option<U256> {
    let minted_topic = H256::from(keccak256(BadgeSignatures::BADGE_MINTED.as_bytes()));
    let transfer_topic = H256::from(keccak256(BadgeSignatures::TRANSFER.as_bytes()));

    let from_badge_minted = logs.iter().find_map(|log| match log.topics.as_slice() {
        [topic, _recipient, token_id] if *topic == minted_topic => {
            Some(U256::from_big_endian(token_id.as_bytes()))
        }
        _ => None,
    });

    from_badge_minted.or_else(|| {
        logs.iter().find_map(|log| match log.topics.as_slice() {
            [topic, from, _to, token_id] if *topic == transfer_topic && from.is_zero() => {
                Some(U256::from_big_endian(token_id.as_bytes()))
            }
            _ => None,
        })
    })
}
