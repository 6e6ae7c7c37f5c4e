//! HTTP client implementation

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::ApiError;

/// Default bound on every vendor request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed header set the CatGenie cloud expects from its mobile app
pub fn catgenie_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static("CatGenie/493 CFNetwork/1559 Darwin/24.0.0"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers
}

/// HTTP transport shared by the vendor clients
///
/// Knows the base URL and carries the timeout and default headers in the
/// underlying client; callers add their own per-request headers (bearer
/// token, request signature).
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        timeout: Duration,
        default_headers: HeaderMap,
    ) -> Result<Self, ApiError> {
        Url::parse(base_url)
            .map_err(|e| ApiError::Api(format!("Invalid base URL {}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::Api(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for the CatGenie cloud
    pub fn catgenie(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Self::new(base_url, timeout, catgenie_headers())
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: HeaderMap,
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, headers, None).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, headers, Some(body)).await
    }

    /// Make a request and decode the JSON response
    ///
    /// An empty successful body decodes as JSON `null`.
    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("HTTP {} {} rejected: {}", method, url, status);
            return Err(ApiError::Authentication(format!(
                "Invalid credentials ({})",
                status
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(ApiError::Api(format!("{}: {}", status, body)));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Api(format!("Invalid JSON from {}: {}", url, e)))?
        };

        serde_json::from_value(value)
            .map_err(|e| ApiError::Api(format!("Unexpected response from {}: {}", url, e)))
    }
}

/// Classify a reqwest failure that happened before a status was available
fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Communication(format!("Timeout error fetching information - {}", err))
    } else if err.is_connect() || err.is_request() || err.is_body() {
        ApiError::Communication(format!("Error fetching information - {}", err))
    } else if err.is_decode() {
        ApiError::Api(format!("Invalid response body - {}", err))
    } else {
        ApiError::Communication(format!("Error fetching information - {}", err))
    }
}
