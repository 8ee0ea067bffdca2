//! DigiLocker OAuth2 identity verification
//!
//! Wraps the DigiLocker authorization-code flow: authorization URL with a
//! CSRF state token, code-for-token exchange, and identity fetch. In mock
//! mode (the development default) the exchange returns a canned verified
//! identity without touching the network.

use crate::config::DigiLockerConfig;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigiLockerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid state parameter")]
    InvalidState,

    #[error("Failed to exchange token: {0}")]
    TokenExchange(String),

    #[error("Failed to fetch user identity: {0}")]
    UserInfoFetch(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Verified identity returned by DigiLocker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigiLockerIdentity {
    pub digilocker_id: String,
    pub name: Option<String>,
}

/// CSRF state payload carried through the redirect round-trip
#[derive(Debug, Serialize, Deserialize)]
struct StatePayload {
    username: String,
    issued_at: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DigiLockerUserResponse {
    digilockerid: String,
    name: Option<String>,
}

#[derive(Clone)]
pub struct DigiLockerProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    user_url: String,
    mock: bool,
    http_client: Arc<Client>,
}

impl DigiLockerProvider {
    pub fn from_config(cfg: &DigiLockerConfig) -> Result<Self, DigiLockerError> {
        if !cfg.mock && cfg.client_id.is_empty() {
            return Err(DigiLockerError::ConfigError(
                "DigiLocker client ID not configured".to_string(),
            ));
        }

        Ok(Self {
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            redirect_uri: cfg.redirect_uri.clone(),
            auth_url: cfg.auth_url.clone(),
            token_url: cfg.token_url.clone(),
            user_url: cfg.user_url.clone(),
            mock: cfg.mock,
            http_client: Arc::new(Client::new()),
        })
    }

    pub fn is_mock(&self) -> bool {
        self.mock
    }

    /// Issue the base64 CSRF state token for a verification attempt
    pub fn issue_state(&self, username: &str) -> String {
        let payload = StatePayload {
            username: username.to_string(),
            issued_at: Utc::now().timestamp(),
        };
        // Serialization of two plain fields cannot fail
        BASE64.encode(serde_json::to_vec(&payload).unwrap_or_default())
    }

    /// Decode a state token back to the username it was issued for
    pub fn verify_state(&self, state: &str) -> Result<String, DigiLockerError> {
        let raw = BASE64
            .decode(state)
            .map_err(|_| DigiLockerError::InvalidState)?;
        let payload: StatePayload =
            serde_json::from_slice(&raw).map_err(|_| DigiLockerError::InvalidState)?;
        if payload.username.is_empty() {
            return Err(DigiLockerError::InvalidState);
        }
        Ok(payload.username)
    }

    /// Authorization redirect URL for the given state token
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for the verified identity
    pub async fn exchange_code(&self, code: &str) -> Result<DigiLockerIdentity, DigiLockerError> {
        if self.mock {
            tracing::debug!("DigiLocker mock mode: returning canned identity");
            return Ok(DigiLockerIdentity {
                digilocker_id: "DL-MOCK-0001".to_string(),
                name: Some("Demo User".to_string()),
            });
        }

        let token_response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DigiLockerError::NetworkError(format!("HTTP error: {}", e)))?;

        if !token_response.status().is_success() {
            return Err(DigiLockerError::TokenExchange(format!(
                "token endpoint returned {}",
                token_response.status()
            )));
        }

        let token: TokenResponse = token_response
            .json()
            .await
            .map_err(|e| DigiLockerError::TokenExchange(format!("JSON parse error: {}", e)))?;

        let user: DigiLockerUserResponse = self
            .http_client
            .get(&self.user_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| DigiLockerError::UserInfoFetch(format!("HTTP error: {}", e)))?
            .json()
            .await
            .map_err(|e| DigiLockerError::UserInfoFetch(format!("JSON parse error: {}", e)))?;

        Ok(DigiLockerIdentity {
            digilocker_id: user.digilockerid,
            name: user.name,
        })
    }
}
