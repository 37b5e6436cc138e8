use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::NarrativeSettings;
use crate::models::{Category, ReputationError, Result};
use crate::narrative::{NarrativeGenerator, NARRATIVE_FAILED};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant providing brief, positive explanations for blockchain reputation categories.";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    n: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Rationale generator backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenRouterNarrator {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenRouterNarrator {
    pub fn new(settings: &NarrativeSettings, api_key: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| ReputationError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    async fn request_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            n: 1,
        };

        let response = self.http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        parse_completion(&body)
    }
}

#[async_trait]
impl NarrativeGenerator for OpenRouterNarrator {
    async fn generate(&self, category: Category, transaction_count: u64, address: &str) -> String {
        info!(%category, transaction_count, model = %self.model, "Requesting rationale");
        let prompt = build_prompt(category, transaction_count, address);

        match self.request_completion(&prompt).await {
            Ok(rationale) => {
                info!(%rationale, "Rationale received");
                rationale
            }
            Err(e) => {
                error!(error = %e, "Rationale generation failed");
                NARRATIVE_FAILED.to_string()
            }
        }
    }
}

fn example_rationale(category: Category) -> &'static str {
    match category {
        Category::Newcomer => "Welcome! This badge shows you're just starting your journey on the BNB Chain.",
        Category::Explorer => "You're actively exploring the possibilities of the BNB Chain! Keep discovering.",
        Category::Contributor => {
            "You're becoming a regular user, actively participating in the BNB Chain ecosystem."
        }
        Category::Veteran => {
            "Your consistent activity demonstrates significant experience and engagement with the BNB Chain."
        }
        Category::Legend => {
            "Wow! Your extensive history marks you as a highly experienced power user within the BNB Chain ecosystem."
        }
    }
}

pub fn build_prompt(category: Category, transaction_count: u64, address: &str) -> String {
    let mut prompt = format!(
        "A user's BNB Chain address ({address}) has been analyzed.\n\
         Based on their transaction count of {transaction_count}, they have been assigned the reputation category: '{category}'.\n\n\
         Please provide a very brief (1-2 sentences), encouraging, and user-friendly explanation for why they received this category, suitable for displaying directly in a web app.\n\
         Focus on the positive aspects of their activity level implied by the category.\n\
         Avoid technical jargon where possible. Do not mention the specific transaction count unless it's essential for context (e.g., for Newcomer).\n\
         Examples:\n"
    );
    for example in Category::ALL {
        prompt.push_str(&format!("- If {}: \"{}\"\n", example, example_rationale(example)));
    }
    prompt
}

/// First non-empty choice of a chat completion, trimmed.
pub fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)?;

    response
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
        .ok_or_else(|| ReputationError::Internal("Completion contained no text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = build_prompt(Category::Contributor, 120, "0xabc");
        assert!(prompt.contains("(0xabc)"));
        assert!(prompt.contains("transaction count of 120"));
        assert!(prompt.contains("category: 'Contributor'"));
        assert!(prompt.contains("- If Legend:"));
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Keep exploring!  "}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Keep exploring!");

        assert!(parse_completion(r#"{"choices":[]}"#).is_err());
        assert!(parse_completion(r#"{"choices":[{"message":{"content":"   "}}]}"#).is_err());
        assert!(parse_completion(r#"{"error":{"message":"rate limited"}}"#).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let mut settings = Settings::default().narrative;
        settings.base_url = "http://127.0.0.1:9/api/v1".to_string();
        settings.timeout_seconds = 2;

        let narrator = OpenRouterNarrator::new(&settings, "key").unwrap();
        let text = narrator.generate(Category::Explorer, 12, "0xabc").await;
        assert_eq!(text, NARRATIVE_FAILED);
    }
}
