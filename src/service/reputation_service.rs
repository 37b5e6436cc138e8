use ethers::types::U256;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::{
    badge::{MetadataDocument, MetadataPublisher, PinataPublisher},
    chains::{
        evm::build_provider, AccountDataProvider, BadgeContract, BadgeRegistry, ChainClientConfig,
        EvmAccountClient, IssuanceOptions,
    },
    config::{settings::configured, Settings},
    models::{
        AnalysisFailure, AnalysisOutcome, IssuedBadge, MintOutcome, ReputationError,
        ReputationResult, Result,
    },
    narrative::{NarrativeGenerator, OpenRouterNarrator, StaticNarrator},
    scoring::ReputationScorer,
    service::InFlightMints,
    utils::to_checksum_address,
};

/// Ties scoring, narrative, metadata publishing and badge issuance together.
pub struct ReputationService {
    accounts: Arc<dyn AccountDataProvider>,
    narrator: Arc<dyn NarrativeGenerator>,
    publisher: Option<Arc<dyn MetadataPublisher>>,
    registry: Option<Arc<dyn BadgeRegistry>>,
    scorer: ReputationScorer,
    in_flight: InFlightMints,
}

impl ReputationService {
    pub fn new(
        accounts: Arc<dyn AccountDataProvider>,
        narrator: Arc<dyn NarrativeGenerator>,
        scorer: ReputationScorer,
    ) -> Self {
        Self {
            accounts,
            narrator,
            publisher: None,
            registry: None,
            scorer,
            in_flight: InFlightMints::new(),
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn MetadataPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn BadgeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Wire up the live collaborators described by `settings`.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let chain_config = ChainClientConfig {
            rpc_url: settings.chain.rpc_url.clone(),
            chain_id: settings.chain.chain_id,
            timeout_seconds: settings.chain.timeout_seconds,
        };
        let accounts = EvmAccountClient::connect(&chain_config).await?;
        let chain_id = accounts.chain_id();

        let narrator: Arc<dyn NarrativeGenerator> = match configured(&settings.narrative.api_key) {
            Some(key) => Arc::new(OpenRouterNarrator::new(&settings.narrative, key)?),
            None => {
                warn!("No narrative API key configured, rationale generation disabled");
                Arc::new(StaticNarrator)
            }
        };

        let mut service = Self::new(
            Arc::new(accounts),
            narrator,
            ReputationScorer::new(settings.scoring.thresholds),
        );

        match configured(&settings.publisher.jwt) {
            Some(jwt) => {
                let publisher = PinataPublisher::new(
                    settings.publisher.api_url.clone(),
                    jwt,
                    settings.publisher.timeout_seconds,
                )?;
                service = service.with_publisher(Arc::new(publisher));
            }
            None => warn!("No pinning JWT configured, minting disabled"),
        }

        match (
            configured(&settings.chain.contract_address),
            configured(&settings.chain.private_key),
        ) {
            (Some(contract_address), Some(private_key)) => {
                let options = IssuanceOptions {
                    receipt_timeout: Duration::from_secs(settings.chain.receipt_timeout_seconds),
                    confirmations: settings.chain.confirmations,
                    fallback_gas_limit: U256::from(settings.chain.fallback_gas_limit),
                };
                let contract = BadgeContract::new(
                    build_provider(&chain_config)?,
                    chain_id,
                    contract_address,
                    private_key,
                    options,
                )?;

                if !contract.has_code().await? {
                    warn!(contract = %contract_address, "No bytecode at badge contract address");
                }
                service = service.with_registry(Arc::new(contract));
            }
            _ => warn!("Badge contract or signing key missing, badge lookups and minting disabled"),
        }

        info!(
            chain_id,
            minting_enabled = settings.minting_enabled(),
            "Reputation service ready"
        );
        Ok(service)
    }

    pub fn scorer(&self) -> &ReputationScorer {
        &self.scorer
    }

    pub fn minting_enabled(&self) -> bool {
        self.publisher.is_some() && self.registry.is_some()
    }

    /// Analyze an address. Failures come back as an error record, never as `Err`.
    pub async fn analyze(&self, address: &str) -> AnalysisOutcome {
        let address = address.trim();

        match self.try_analyze(address).await {
            Ok(result) => AnalysisOutcome::Scored(result),
            Err(e) => {
                if e.is_terminal() {
                    warn!(address, error = %e, "Rejected analysis request");
                } else {
                    error!(address, error = %e, "Analysis failed");
                }
                let shown = to_checksum_address(address).unwrap_or_else(|_| address.to_string());
                AnalysisOutcome::Failed(AnalysisFailure::new(e.public_message(), Some(shown)))
            }
        }
    }

    pub async fn try_analyze(&self, address: &str) -> Result<ReputationResult> {
        let checksummed = to_checksum_address(address)?;
        info!(address = %checksummed, "Analyzing address");

        let snapshot = self.accounts.fetch_account(&checksummed).await?;
        let assessment = self.scorer.assess(snapshot.transaction_count, &snapshot.address);
        let rationale = self
            .narrator
            .generate(assessment.category, snapshot.transaction_count, &snapshot.address)
            .await;

        info!(
            address = %snapshot.address,
            transaction_count = snapshot.transaction_count,
            category = %assessment.category,
            score = assessment.score,
            "Analysis complete"
        );

        Ok(ReputationResult {
            category: assessment.category,
            score: assessment.score,
            message: assessment.message,
            rationale,
            details: snapshot.into(),
        })
    }

    pub async fn check_badge(&self, address: &str) -> Result<bool> {
        let checksummed = to_checksum_address(address)?;
        let registry = self.registry.as_ref().ok_or(ReputationError::NotConfigured("Badge contract"))?;
        registry.has_badge(&checksummed).await
    }

    /// Mint a badge for `address` from a previously computed result.
    pub async fn mint(&self, address: &str, result: &ReputationResult) -> MintOutcome {
        match self.try_mint(address, result).await {
            Ok(badge) => MintOutcome::minted(badge),
            Err(e) => {
                if e.is_terminal() {
                    warn!(address, error = %e, "Mint rejected");
                } else {
                    error!(address, error = %e, tx_hash = ?e.tx_hash(), "Mint failed");
                }
                MintOutcome::failed(&e)
            }
        }
    }

    pub async fn try_mint(&self, address: &str, result: &ReputationResult) -> Result<IssuedBadge> {
        let recipient = to_checksum_address(address)?;
        result.validate_for(&recipient)?;

        let publisher = self
            .publisher
            .as_ref()
            .ok_or(ReputationError::NotConfigured("Metadata publisher"))?;
        let registry = self
            .registry
            .as_ref()
            .ok_or(ReputationError::NotConfigured("Badge contract"))?;

        // Held until this function returns, covering pre-check through confirmation.
        let _guard = self
            .in_flight
            .try_acquire(&recipient)
            .ok_or_else(|| ReputationError::MintInProgress(recipient.clone()))?;

        // An unanswered pre-check aborts: never mint when the recipient may already hold one.
        if registry.has_badge(&recipient).await? {
            return Err(ReputationError::AlreadyIssued(recipient));
        }

        let document = MetadataDocument::for_badge(&recipient, result);
        let token_uri = publisher.publish(&document).await?;

        info!(recipient = %recipient, %token_uri, category = %result.category, "Issuing badge");
        registry.issue(&recipient, &token_uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountSnapshot, Category};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct FixedAccounts(u64);

    #[async_trait]
    impl AccountDataProvider for FixedAccounts {
        async fn fetch_account(&self, address: &str) -> Result<AccountSnapshot> {
            Ok(AccountSnapshot {
                address: address.to_string(),
                transaction_count: self.0,
                balance: Decimal::new(25, 2),
            })
        }
    }

    struct DownAccounts;

    #[async_trait]
    impl AccountDataProvider for DownAccounts {
        async fn fetch_account(&self, _address: &str) -> Result<AccountSnapshot> {
            Err(ReputationError::RpcError {
                operation: "eth_getTransactionCount".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn service(accounts: impl AccountDataProvider + 'static) -> ReputationService {
        ReputationService::new(Arc::new(accounts), Arc::new(StaticNarrator), ReputationScorer::default())
    }

    const ADDRESS: &str = "0xd81c6e09664d35f97f53a6e9732dae09cfb958a6";

    #[tokio::test]
    async fn test_analyze_scores_and_checksums() {
        let outcome = service(FixedAccounts(44)).analyze(&format!("  {}  ", ADDRESS)).await;

        let AnalysisOutcome::Scored(result) = outcome else {
            panic!("expected a scored result");
        };
        assert_eq!(result.category, Category::Explorer);
        assert_eq!(result.score, 46);
        assert_eq!(result.details.address, "0xD81c6e09664D35f97F53A6E9732dae09CfB958a6");
        assert_eq!(
            result.message,
            "Based on 44 transactions, this address is categorized as a Explorer."
        );
        assert_eq!(result.rationale, crate::narrative::NARRATIVE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_analyze_invalid_address_is_verbatim() {
        let outcome = service(FixedAccounts(0)).analyze("0x123").await;

        let AnalysisOutcome::Failed(failure) = outcome else {
            panic!("expected a failure record");
        };
        assert_eq!(failure.message, "Invalid address format: 0x123");
        assert_eq!(failure.details.address.as_deref(), Some("0x123"));
    }

    #[tokio::test]
    async fn test_analyze_upstream_failure_is_generic() {
        let AnalysisOutcome::Failed(failure) = service(DownAccounts).analyze(ADDRESS).await else {
            panic!("expected a failure record");
        };
        assert_eq!(failure.message, "Error retrieving data from the blockchain.");
        assert!(!failure.message.contains("refused"));
    }

    #[tokio::test]
    async fn test_mint_without_collaborators_is_not_configured() {
        let svc = service(FixedAccounts(44));
        let result = svc.try_analyze(ADDRESS).await.unwrap();

        let err = svc.try_mint(ADDRESS, &result).await.unwrap_err();
        assert!(matches!(err, ReputationError::NotConfigured(_)));
        assert!(!svc.minting_enabled());

        let err = svc.check_badge(ADDRESS).await.unwrap_err();
        assert!(matches!(err, ReputationError::NotConfigured("Badge contract")));
    }
}
