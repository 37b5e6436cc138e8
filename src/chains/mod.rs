pub mod client;
pub mod evm;
pub mod badge_contract;

pub use client::{AccountDataProvider, BadgeRegistry, ChainClientConfig};
pub use evm::EvmAccountClient;
pub use badge_contract::{BadgeContract, IssuanceOptions};
