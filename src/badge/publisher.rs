use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

use crate::badge::MetadataDocument;
use crate::models::{ReputationError, Result};

/// Content-addressed storage for token metadata.
#[async_trait]
pub trait MetadataPublisher: Send + Sync {
    /// Store the document and return its locator (`ipfs://<cid>`).
    async fn publish(&self, document: &MetadataDocument) -> Result<String>;
}

#[derive(Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pins metadata files through the Pinata `pinFileToIPFS` endpoint.
pub struct PinataPublisher {
    http_client: reqwest::Client,
    api_url: String,
    jwt: String,
}

impl PinataPublisher {
    pub fn new(api_url: impl Into<String>, jwt: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ReputationError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
            jwt: jwt.into(),
        })
    }

    fn build_form(document: &MetadataDocument) -> Result<Form> {
        let body = serde_json::to_vec(&document.metadata)?;
        let file = Part::bytes(body)
            .file_name(document.file_name.clone())
            .mime_str("application/json")
            .map_err(|e| ReputationError::PublishFailure(format!("Invalid file part: {}", e)))?;

        Ok(Form::new()
            .part("file", file)
            .text("pinataMetadata", pin_options(document).to_string()))
    }
}

#[async_trait]
impl MetadataPublisher for PinataPublisher {
    async fn publish(&self, document: &MetadataDocument) -> Result<String> {
        let form = Self::build_form(document)?;

        info!(recipient = %document.recipient, "Uploading badge metadata");
        let response = self.http_client
            .post(&self.api_url)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ReputationError::PublishFailure(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "Pinning service rejected upload");
            return Err(ReputationError::PublishFailure(format!("Pinning service returned {}", status)));
        }

        let body = response.text().await
            .map_err(|e| ReputationError::PublishFailure(format!("Failed to read response: {}", e)))?;
        let locator = parse_pin_response(&body)?;

        info!(%locator, "Metadata pinned");
        Ok(locator)
    }
}

/// The `pinataMetadata` form field: a display name plus searchable key/values.
pub fn pin_options(document: &MetadataDocument) -> serde_json::Value {
    json!({
        "name": document.pin_name,
        "keyvalues": {
            "address": document.recipient,
            "category": document.category,
        }
    })
}

pub fn parse_pin_response(body: &str) -> Result<String> {
    let response: PinResponse = serde_json::from_str(body)
        .map_err(|e| ReputationError::PublishFailure(format!("Failed to parse response: {}", e)))?;

    if response.ipfs_hash.trim().is_empty() {
        return Err(ReputationError::PublishFailure("Empty IpfsHash in response".to_string()));
    }
    Ok(format!("ipfs://{}", response.ipfs_hash.trim()))
}
