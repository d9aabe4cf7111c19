//! Vision API client - image to recognized text.

use super::auth::{get_access_token, load_credentials, ServiceAccountCredentials};
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const VISION_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Refresh the access token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Cached OAuth token with its expiry deadline.
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// OCR client. Produces the recognized text lines of an image, in the
/// order returned by the engine, joined by newlines.
pub struct VisionClient {
    credentials: ServiceAccountCredentials,
    access_token: Arc<RwLock<Option<CachedToken>>>,
    http_client: reqwest::Client,
}

impl VisionClient {
    /// Create a client from the environment (`GOOGLE_APPLICATION_CREDENTIALS`).
    pub fn from_env() -> Result<Self> {
        let credentials = load_credentials()?;
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            credentials,
            access_token: Arc::new(RwLock::new(None)),
            http_client,
        })
    }

    /// Get an access token, reusing the cached one while it is still fresh.
    async fn get_token(&self) -> Result<String> {
        {
            let token = self.access_token.read().await;
            if let Some(cached) = token.as_ref() {
                if cached.is_fresh() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let fresh = get_access_token(&self.credentials).await?;
        let expires_at = Instant::now() + Duration::from_secs(fresh.expires_in);

        {
            let mut token = self.access_token.write().await;
            *token = Some(CachedToken {
                token: fresh.token.clone(),
                expires_at,
            });
        }

        Ok(fresh.token)
    }

    /// Recognize text in an image file. An image with no recognizable text
    /// yields an empty string, not an error.
    pub async fn extract_text(&self, image_path: impl AsRef<Path>) -> Result<String> {
        let image_data = std::fs::read(image_path.as_ref())
            .with_context(|| format!("failed to read image {:?}", image_path.as_ref()))?;

        let request = AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(&image_data),
                },
                features: vec![Feature {
                    feature_type: "DOCUMENT_TEXT_DETECTION".to_string(),
                    max_results: 1,
                }],
                image_context: Some(ImageContext {
                    language_hints: vec!["en".to_string()],
                }),
            }],
        };

        let token = self.get_token().await?;

        let response = self
            .http_client
            .post(VISION_API_URL)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .context("Vision API request failed")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Vision API error: {error_text}");
        }

        let annotation: AnnotateResponse = response
            .json()
            .await
            .context("failed to parse Vision API response")?;

        // fullTextAnnotation.text is already newline-joined in line order
        Ok(annotation
            .responses
            .first()
            .and_then(|r| r.full_text_annotation.as_ref())
            .map(|a| a.text.clone())
            .unwrap_or_default())
    }
}

// Vision API request/response structs

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_context: Option<ImageContext>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
    #[serde(rename = "maxResults")]
    max_results: i32,
}

#[derive(Serialize)]
struct ImageContext {
    #[serde(rename = "languageHints")]
    language_hints: Vec<String>,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(rename = "fullTextAnnotation")]
    full_text_annotation: Option<TextAnnotation>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(valid_for: Duration) -> CachedToken {
        CachedToken {
            token: "token".to_string(),
            expires_at: Instant::now() + valid_for,
        }
    }

    #[test]
    fn long_lived_token_is_reused() {
        assert!(cached(Duration::from_secs(3600)).is_fresh());
    }

    #[test]
    fn token_near_expiry_is_refreshed() {
        // Inside the refresh margin
        assert!(!cached(Duration::from_secs(30)).is_fresh());
        assert!(!cached(Duration::ZERO).is_fresh());
    }
}
