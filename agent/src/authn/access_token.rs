//! Access token management

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use vendor_models::models::catgenie::RefreshTokenResponse;

use crate::errors::ApiError;

/// Credential state of the access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    Valid,
    Expired,
}

/// A short-lived bearer token issued by the refresh endpoint
#[derive(Clone)]
pub struct AccessToken {
    raw: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(raw: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            raw: raw.into(),
            expires_at,
        }
    }

    /// Build a token from a refresh response
    pub fn from_response(response: RefreshTokenResponse) -> Result<Self, ApiError> {
        if response.token.is_empty() {
            return Err(ApiError::Api("Refresh response carried an empty token".to_string()));
        }
        let expires_at = parse_expiration(&response.expiration)?;
        Ok(Self::new(response.token, expires_at))
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A token is unusable from its expiration instant onwards
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn state(&self) -> TokenState {
        if self.is_expired() {
            TokenState::Expired
        } else {
            TokenState::Valid
        }
    }

    /// Get time until expiration in seconds
    pub fn time_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }

    /// The `Authorization` header for this token, or an empty map once the
    /// token has expired.
    pub fn bearer_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.is_expired() {
            return headers;
        }
        if let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {}", self.raw)) {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("raw", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Parse an epoch-milliseconds expiration given as a number or numeric string
pub fn parse_expiration(value: &serde_json::Value) -> Result<DateTime<Utc>, ApiError> {
    let millis = match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ApiError::Api(format!("Invalid token expiration: {}", value)))?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| ApiError::Api(format!("Token expiration out of range: {}", millis)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_parse_expiration_number_and_string() {
        let from_number = parse_expiration(&json!(1_700_000_000_000_i64)).unwrap();
        let from_string = parse_expiration(&json!("1700000000000")).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_expiration_rejects_garbage() {
        assert!(matches!(parse_expiration(&json!("soon")), Err(ApiError::Api(_))));
        assert!(matches!(parse_expiration(&json!(null)), Err(ApiError::Api(_))));
    }

    #[test]
    fn test_expired_at_boundary() {
        let now = Utc::now();
        let token = AccessToken::new("abc", now);
        assert!(token.is_expired_at(now));
        assert!(!token.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_expired_token_has_no_bearer() {
        let token = AccessToken::new("abc", Utc::now() - Duration::minutes(1));
        assert_eq!(token.state(), TokenState::Expired);
        assert!(token.bearer_headers().is_empty());
    }

    #[test]
    fn test_valid_token_bearer() {
        let token = AccessToken::new("abc", Utc::now() + Duration::hours(1));
        assert_eq!(token.state(), TokenState::Valid);
        assert_eq!(token.bearer_headers()[AUTHORIZATION], "Bearer abc");
        assert!(token.time_until_expiry() > 3500);
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("very-secret", Utc::now());
        assert!(!format!("{:?}", token).contains("very-secret"));
    }

    #[test]
    fn test_from_response_requires_token() {
        let response = RefreshTokenResponse {
            token: String::new(),
            expiration: json!(1_700_000_000_000_i64),
        };
        assert!(AccessToken::from_response(response).is_err());
    }
}
