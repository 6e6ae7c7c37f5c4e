//! SwitchBot request signing

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use sha2::Sha256;

use crate::errors::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// `sign = base64(HMAC-SHA256(secret, token + t + nonce))`
pub fn sign(token: &str, secret: &str, t: &str, nonce: &str) -> Result<String, ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::Api(format!("Invalid SwitchBot secret: {}", e)))?;
    mac.update(token.as_bytes());
    mac.update(t.as_bytes());
    mac.update(nonce.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Authentication headers for one SwitchBot request
pub fn signed_headers(token: &str, secret: &str) -> Result<HeaderMap, ApiError> {
    let t = Utc::now().timestamp_millis().to_string();
    let nonce = uuid::Uuid::new_v4().to_string();
    signed_headers_at(token, secret, &t, &nonce)
}

pub fn signed_headers_at(
    token: &str,
    secret: &str,
    t: &str,
    nonce: &str,
) -> Result<HeaderMap, ApiError> {
    let signature = sign(token, secret, t, nonce)?;

    let mut headers = HeaderMap::new();
    let mut authorization = header_value(token)?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(HeaderName::from_static("t"), header_value(t)?);
    headers.insert(HeaderName::from_static("nonce"), header_value(nonce)?);
    headers.insert(HeaderName::from_static("sign"), header_value(&signature)?);
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::Api(format!("Invalid header value: {}", e)))
}
