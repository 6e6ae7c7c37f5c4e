//! Token manager for the CatGenie cloud

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vendor_models::models::catgenie::{RefreshTokenRequest, RefreshTokenResponse};

use crate::authn::access_token::{AccessToken, TokenState};
use crate::errors::ApiError;
use crate::http::client::HttpClient;

/// Refresh endpoint of the mobile-user facade
pub const REFRESH_PATH: &str = "/facade/v1/mobile-user/refreshToken";

/// Token manager trait for testability
#[async_trait]
pub trait TokenManagerExt: Send + Sync {
    /// Get a usable access token, refreshing first when absent or expired
    async fn get_token(&self) -> Result<AccessToken, ApiError>;

    /// Force a refresh
    async fn refresh_token(&self) -> Result<AccessToken, ApiError>;

    /// Current credential state
    async fn state(&self) -> TokenState;

    /// Whether an access token (expired or not) is cached
    async fn has_token(&self) -> bool;
}

/// Token manager implementation
pub struct TokenManager {
    http_client: Arc<HttpClient>,
    refresh_token: SecretString,
    cached_token: RwLock<Option<AccessToken>>,
}

impl TokenManager {
    /// Create a new token manager. No access token is held until the first
    /// refresh.
    pub fn new(http_client: Arc<HttpClient>, refresh_token: SecretString) -> Self {
        Self {
            http_client,
            refresh_token,
            cached_token: RwLock::new(None),
        }
    }
}

#[async_trait]
impl TokenManagerExt for TokenManager {
    async fn get_token(&self) -> Result<AccessToken, ApiError> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.clone());
                }
                debug!("Access token expired at {}", token.expires_at());
            }
        }

        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<AccessToken, ApiError> {
        info!("Refreshing access token...");

        let mut cached = self.cached_token.write().await;
        *cached = None;

        let request = RefreshTokenRequest {
            refresh_token: self.refresh_token.expose_secret().to_string(),
        };

        // No bearer header: the old token is gone and the refresh token
        // travels in the body.
        let response: RefreshTokenResponse = self
            .http_client
            .post(REFRESH_PATH, HeaderMap::new(), &request)
            .await
            .map_err(|e| {
                warn!("Token refresh failed: {}", e);
                match e {
                    ApiError::Api(msg) => ApiError::Api(format!("Error refreshing token - {}", msg)),
                    other => other,
                }
            })?;

        let token = AccessToken::from_response(response)?;
        *cached = Some(token.clone());

        info!(
            "Token refreshed successfully, expires at: {} (in {}s)",
            token.expires_at(),
            token.time_until_expiry()
        );

        Ok(token)
    }

    async fn state(&self) -> TokenState {
        match self.cached_token.read().await.as_ref() {
            Some(token) => token.state(),
            None => TokenState::Expired,
        }
    }

    async fn has_token(&self) -> bool {
        self.cached_token.read().await.is_some()
    }
}
