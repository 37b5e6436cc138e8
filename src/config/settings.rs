use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::Path;

use crate::models::{ReputationError, Result};
use crate::scoring::ReputationThresholds;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub chain: ChainSettings,
    pub scoring: ScoringSettings,
    pub narrative: NarrativeSettings,
    pub publisher: PublisherSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSettings {
    pub rpc_url: String,
    pub chain_id: Option<u64>,
    pub contract_address: Option<String>,
    pub private_key: Option<String>,
    pub explorer_url: String,
    pub timeout_seconds: u64,
    pub receipt_timeout_seconds: u64,
    pub confirmations: usize,
    pub fallback_gas_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSettings {
    pub thresholds: ReputationThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherSettings {
    pub jwt: Option<String>,
    pub api_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Wallet Reputation".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
            },
            chain: ChainSettings {
                rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545".to_string(),
                chain_id: Some(97), // BSC testnet
                contract_address: None,
                private_key: None,
                explorer_url: "https://testnet.bscscan.com".to_string(),
                timeout_seconds: 30,
                receipt_timeout_seconds: 120,
                confirmations: 1,
                fallback_gas_limit: 300_000,
            },
            scoring: ScoringSettings {
                thresholds: ReputationThresholds::default(),
            },
            narrative: NarrativeSettings {
                api_key: None,
                base_url: "https://openrouter.ai/api/v1".to_string(),
                model: "microsoft/phi-3-mini-128k-instruct".to_string(),
                max_tokens: 60,
                temperature: 0.7,
                timeout_seconds: 20,
            },
            publisher: PublisherSettings {
                jwt: None,
                api_url: "https://api.pinata.cloud/pinning/pinFileToIPFS".to_string(),
                timeout_seconds: 10,
            },
            api: ApiSettings {
                host: "0.0.0.0".to_string(),
                port: 5001,
            },
        }
    }
}

/// Flat environment names accepted alongside the prefixed layout.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("RPC_URL", "chain.rpc_url"),
    ("PRIVATE_KEY", "chain.private_key"),
    ("CONTRACT_ADDRESS", "chain.contract_address"),
    ("TESTNET_SCAN_URL", "chain.explorer_url"),
    ("PINATA_JWT", "publisher.jwt"),
    ("OPENROUTER_API_KEY", "narrative.api_key"),
    ("MIN_TX_COUNT_EXPLORER", "scoring.thresholds.explorer"),
    ("MIN_TX_COUNT_CONTRIBUTOR", "scoring.thresholds.contributor"),
    ("MIN_TX_COUNT_VETERAN", "scoring.thresholds.veteran"),
    ("MIN_TX_COUNT_LEGEND", "scoring.thresholds.legend"),
];

impl Settings {
    pub fn new() -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("REPUTATION")
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (env_key, config_key) in LEGACY_ENV_KEYS {
            builder = builder.set_override_option(*config_key, std::env::var(env_key).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring
            .thresholds
            .validate()
            .map_err(ReputationError::ConfigError)?;

        if !self.chain.rpc_url.starts_with("http://") && !self.chain.rpc_url.starts_with("https://") {
            return Err(ReputationError::ConfigError(format!(
                "RPC URL must be http(s), got {}",
                self.chain.rpc_url
            )));
        }

        if self.chain.confirmations == 0 {
            return Err(ReputationError::ConfigError(
                "Confirmations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Minting needs a pinning JWT, the badge contract and a signing key.
    pub fn minting_enabled(&self) -> bool {
        configured(&self.publisher.jwt).is_some()
            && configured(&self.chain.contract_address).is_some()
            && configured(&self.chain.private_key).is_some()
    }
}

/// A credential counts only when it is set to something other than whitespace.
pub fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
