/// Configuration management for Story Service
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Media storage configuration
    pub storage: StorageConfig,
    /// Paid download configuration
    pub access: AccessConfig,
    /// DigiLocker identity verification configuration
    pub digilocker: DigiLockerConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Media storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for uploaded media (`images/` and `videos/` live under it)
    pub root: String,
    /// Base URL prefix for serving stored media
    pub public_base_url: String,
}

/// Paid download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Token cost of a paid story download
    pub download_cost: i64,
}

/// DigiLocker OAuth2 configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigiLockerConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub user_url: String,
    /// When true, code exchange returns a canned identity without network calls
    pub mock: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("STORY_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("STORY_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8082),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            storage: StorageConfig {
                root: std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "public".to_string()),
                public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "".to_string()),
            },
            access: AccessConfig {
                download_cost: std::env::var("ACCESS_DOWNLOAD_COST")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(350),
            },
            digilocker: {
                let mock = std::env::var("DIGILOCKER_MOCK")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(!is_production);

                if is_production && mock {
                    return Err("DIGILOCKER_MOCK cannot be enabled in production".to_string());
                }

                let client_id = std::env::var("DIGILOCKER_CLIENT_ID").unwrap_or_default();
                let client_secret = std::env::var("DIGILOCKER_CLIENT_SECRET").unwrap_or_default();
                if is_production && (client_id.is_empty() || client_secret.is_empty()) {
                    return Err(
                        "DIGILOCKER_CLIENT_ID and DIGILOCKER_CLIENT_SECRET must be set in production"
                            .to_string(),
                    );
                }

                DigiLockerConfig {
                    client_id,
                    client_secret,
                    redirect_uri: std::env::var("DIGILOCKER_REDIRECT_URI").unwrap_or_else(|_| {
                        "http://localhost:3000/api/auth/digilocker".to_string()
                    }),
                    auth_url: std::env::var("DIGILOCKER_AUTH_URL").unwrap_or_else(|_| {
                        "https://api.digitallocker.gov.in/public/oauth2/1/authorize".to_string()
                    }),
                    token_url: std::env::var("DIGILOCKER_TOKEN_URL").unwrap_or_else(|_| {
                        "https://api.digitallocker.gov.in/public/oauth2/1/token".to_string()
                    }),
                    user_url: std::env::var("DIGILOCKER_USER_URL").unwrap_or_else(|_| {
                        "https://api.digitallocker.gov.in/public/oauth2/1/user".to_string()
                    }),
                    mock,
                }
            },
        })
    }
}
