use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReputationError {
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid reputation data: {0}")]
    InvalidReputation(String),

    #[error("RPC error during {operation}: {message}")]
    RpcError { operation: String, message: String },

    #[error("Recipient {0} already has a badge")]
    AlreadyIssued(String),

    #[error("A badge mint for {0} is already in progress")]
    MintInProgress(String),

    #[error("Metadata publish failed: {0}")]
    PublishFailure(String),

    #[error("Badge issuance failed: {message}")]
    IssuanceFailure { message: String, tx_hash: Option<String> },

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ReputationError>;

/// Coarse failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    UpstreamUnavailable,
    AlreadyIssued,
    PublishFailure,
    IssuanceFailure,
    InternalError,
}

impl ReputationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReputationError::InvalidAddress(_) | ReputationError::InvalidReputation(_) => {
                ErrorKind::InvalidInput
            }
            ReputationError::RpcError { .. } | ReputationError::HttpError(_) => {
                ErrorKind::UpstreamUnavailable
            }
            ReputationError::AlreadyIssued(_) | ReputationError::MintInProgress(_) => {
                ErrorKind::AlreadyIssued
            }
            ReputationError::PublishFailure(_) => ErrorKind::PublishFailure,
            ReputationError::IssuanceFailure { .. } => ErrorKind::IssuanceFailure,
            ReputationError::NotConfigured(_)
            | ReputationError::SerializationError(_)
            | ReputationError::ConfigError(_)
            | ReputationError::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Terminal errors are the caller's fault and are reported verbatim.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidInput | ErrorKind::AlreadyIssued)
    }

    /// Message safe to hand back to an API caller. Upstream detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ReputationError::AlreadyIssued(_) => "Recipient already has a badge.".to_string(),
            ReputationError::NotConfigured(service) => {
                format!("{} is not configured. Cannot continue.", service)
            }
            e if e.is_terminal() => e.to_string(),
            e => match e.kind() {
                ErrorKind::UpstreamUnavailable => {
                    "Error retrieving data from the blockchain.".to_string()
                }
                ErrorKind::PublishFailure => "Failed to upload metadata to IPFS.".to_string(),
                ErrorKind::IssuanceFailure => "Transaction failed.".to_string(),
                _ => "An internal error occurred.".to_string(),
            },
        }
    }

    /// Hash of the submitted transaction, when the failure happened after submission.
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            ReputationError::IssuanceFailure { tx_hash, .. } => tx_hash.as_deref(),
            _ => None,
        }
    }
}
