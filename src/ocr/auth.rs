//! Google Cloud service-account authentication.

use anyhow::{Context, Result};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable naming the service-account JSON file. Credentials
/// are read from disk at startup, never embedded in the binary.
const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";

/// Service-account credentials, the subset of the JSON key file we need.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

/// JWT claims for the OAuth assertion.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    exp: u64,
    iat: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// An access token and how long it remains valid, in seconds.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: u64,
}

/// Load credentials from the file named by `GOOGLE_APPLICATION_CREDENTIALS`.
pub fn load_credentials() -> Result<ServiceAccountCredentials> {
    let path = std::env::var(CREDENTIALS_ENV)
        .with_context(|| format!("{CREDENTIALS_ENV} is not set"))?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read credentials file {path}"))?;

    serde_json::from_str(&raw).context("failed to parse service-account credentials")
}

/// Exchange a signed JWT for an access token.
pub async fn get_access_token(credentials: &ServiceAccountCredentials) -> Result<AccessToken> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?
        .as_secs();

    let claims = Claims {
        iss: credentials.client_email.clone(),
        scope: VISION_SCOPE.to_string(),
        aud: credentials.token_uri.clone(),
        exp: now + 3600,
        iat: now,
    };

    // Sign the JWT with the account's RSA private key
    let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
        .context("failed to parse RSA private key")?;
    let jwt = encode(&Header::new(Algorithm::RS256), &claims, &key)
        .context("failed to sign JWT")?;

    let client = reqwest::Client::new();
    let response = client
        .post(&credentials.token_uri)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ])
        .send()
        .await
        .context("token request failed")?;

    let token_response: TokenResponse = response
        .json()
        .await
        .context("failed to parse token response")?;

    Ok(AccessToken {
        token: token_response.access_token,
        expires_in: token_response.expires_in,
    })
}
