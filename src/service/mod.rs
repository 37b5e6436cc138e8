pub mod inflight;
pub mod reputation_service;

pub use inflight::{InFlightMints, MintGuard};
pub use reputation_service::ReputationService;
