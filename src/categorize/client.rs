//! Together AI completions client.

use super::Categorizer;
use crate::model::Category;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TOGETHER_API_URL: &str = "https://api.together.xyz/v1/completions";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Upper bound on how long a classification request may block the pipeline.
/// A timeout is absorbed like any other categorization failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Enough tokens for one category name and nothing else.
const MAX_TOKENS: u32 = 10;

/// Client for the Together AI completions endpoint.
pub struct TogetherClient {
    api_key: String,
    model: String,
    http_client: reqwest::Client,
}

impl TogetherClient {
    /// Build a client from the environment. `TOGETHER_API_KEY` must be set
    /// (the key is never compiled into the binary); `TOGETHER_MODEL`
    /// optionally overrides the model id.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("TOGETHER_API_KEY").context("TOGETHER_API_KEY is not set")?;
        let model = std::env::var("TOGETHER_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            api_key,
            model,
            http_client,
        })
    }

    /// Raw classification request. Errors propagate to `classify`, which
    /// absorbs them.
    async fn request_category(&self, text: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt: build_prompt(text),
            max_tokens: MAX_TOKENS,
            // Deterministic generation
            temperature: 0.0,
            stop: ["\n"],
        };

        let response = self
            .http_client
            .post(TOGETHER_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("categorization request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("categorization service returned {status}: {body}");
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("failed to parse categorization response")?;

        Ok(completion
            .choices
            .first()
            .map(|choice| choice.text.clone())
            .unwrap_or_default())
    }
}

impl Categorizer for TogetherClient {
    /// Best-effort classification: any failure degrades to `Other` rather
    /// than aborting the scan.
    async fn classify(&self, text: &str) -> Category {
        match self.request_category(text).await {
            Ok(raw) => Category::coerce(&raw),
            Err(error) => {
                tracing::warn!("categorization failed, falling back to Other: {error:#}");
                Category::Other
            }
        }
    }
}

/// Build the classification prompt: the six allowed names plus the receipt
/// text, asking for the category name only.
fn build_prompt(text: &str) -> String {
    let names = Category::ALL.map(Category::label).join(", ");
    format!(
        "You are an assistant that categorizes expense receipts into one of these categories:\n\
         {names}.\n\
         \n\
         Categorize this text:\n\
         \"\"\"{text}\"\"\"\n\
         Just return the category name only.\n"
    )
}

// Together AI request/response structs

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
    stop: [&'a str; 1],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_category() {
        let prompt = build_prompt("Corner Cafe\nTotal 9.99");
        for category in Category::ALL {
            assert!(prompt.contains(category.label()), "missing {category}");
        }
        assert!(prompt.contains("Corner Cafe"));
    }

    #[test]
    fn response_shape_parses() {
        let raw = r#"{"choices":[{"text":" Groceries"}],"id":"x"}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].text, " Groceries");
        assert_eq!(Category::coerce(&parsed.choices[0].text), Category::Groceries);
    }

    #[test]
    fn empty_choices_coerce_to_other() {
        let raw = r#"{"choices":[]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .choices
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default();
        assert_eq!(Category::coerce(&text), Category::Other);
    }
}
