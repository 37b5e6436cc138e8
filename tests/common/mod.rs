#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use rust_decimal::Decimal;
use std::sync::Arc;

use wallet_reputation::{
    badge::{MetadataDocument, MetadataPublisher},
    chains::{AccountDataProvider, BadgeRegistry},
    models::{AccountSnapshot, Category, IssuedBadge, Result},
    narrative::NarrativeGenerator,
    ReputationScorer, ReputationService,
};

pub const RECIPIENT: &str = "0xD81c6e09664D35f97F53A6E9732dae09CfB958a6";
pub const RECIPIENT_LOWER: &str = "0xd81c6e09664d35f97f53a6e9732dae09cfb958a6";

mock! {
    pub Accounts {}

    #[async_trait]
    impl AccountDataProvider for Accounts {
        async fn fetch_account(&self, address: &str) -> Result<AccountSnapshot>;
    }
}

mock! {
    pub Registry {}

    #[async_trait]
    impl BadgeRegistry for Registry {
        async fn has_badge(&self, recipient: &str) -> Result<bool>;
        async fn issue(&self, recipient: &str, token_uri: &str) -> Result<IssuedBadge>;
    }
}

mock! {
    pub Publisher {}

    #[async_trait]
    impl MetadataPublisher for Publisher {
        async fn publish(&self, document: &MetadataDocument) -> Result<String>;
    }
}

mock! {
    pub Narrator {}

    #[async_trait]
    impl NarrativeGenerator for Narrator {
        async fn generate(&self, category: Category, transaction_count: u64, address: &str) -> String;
    }
}

pub fn accounts_with(transaction_count: u64) -> MockAccounts {
    let mut accounts = MockAccounts::new();
    accounts.expect_fetch_account().returning(move |address| {
        Ok(AccountSnapshot {
            address: address.to_string(),
            transaction_count,
            balance: Decimal::new(125, 3),
        })
    });
    accounts
}

pub fn quiet_narrator() -> MockNarrator {
    let mut narrator = MockNarrator::new();
    narrator
        .expect_generate()
        .returning(|category, _, _| format!("You look like a {}.", category));
    narrator
}

pub fn service_with(
    accounts: MockAccounts,
    publisher: MockPublisher,
    registry: MockRegistry,
) -> ReputationService {
    ReputationService::new(
        Arc::new(accounts),
        Arc::new(quiet_narrator()),
        ReputationScorer::default(),
    )
    .with_publisher(Arc::new(publisher))
    .with_registry(Arc::new(registry))
}
