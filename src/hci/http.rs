//! HTTP utilities for HCI REST API calls

use super::error::HciError;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "MC-Api-Key";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Pull the first error message out of an HCI error body.
/// Error bodies look like `{"errors": [{"code": "...", "message": "..."}]}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let first = value.get("errors")?.as_array()?.first()?;
    first
        .get("message")
        .and_then(|m| m.as_str())
        .map(String::from)
}

/// HTTP client wrapper for HCI API calls
#[derive(Clone)]
pub struct HciHttpClient {
    client: Client,
}

impl HciHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, HciError> {
        let client = Client::builder()
            .user_agent(concat!("hci-acl/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request to the HCI API
    pub async fn get(&self, url: &str, api_key: &str) -> Result<Value, HciError> {
        tracing::debug!("GET {}", url);
        self.execute(self.client.get(url), url, api_key).await
    }

    /// Make a POST request to the HCI API
    pub async fn post(&self, url: &str, api_key: &str, body: &Value) -> Result<Value, HciError> {
        tracing::debug!("POST {}", url);
        self.execute(self.client.post(url).json(body), url, api_key)
            .await
    }

    /// Make a PUT request to the HCI API
    pub async fn put(&self, url: &str, api_key: &str, body: &Value) -> Result<Value, HciError> {
        tracing::debug!("PUT {}", url);
        self.execute(self.client.put(url).json(body), url, api_key)
            .await
    }

    /// Make a DELETE request to the HCI API
    pub async fn delete(&self, url: &str, api_key: &str) -> Result<Value, HciError> {
        tracing::debug!("DELETE {}", url);
        self.execute(self.client.delete(url), url, api_key).await
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        url: &str,
        api_key: &str,
    ) -> Result<Value, HciError> {
        let response = request
            .header(API_KEY_HEADER, api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(HciError::NotFound {
                    path: url.to_string(),
                });
            }
            return Err(HciError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}
