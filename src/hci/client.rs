//! HCI Client
//!
//! Main client for the HCI API, combining the API key, base URL
//! and HTTP functionality.

use super::error::HciError;
use super::http::HciHttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Response envelope used by every HCI endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Main HCI client
#[derive(Clone)]
pub struct HciClient {
    pub http: HciHttpClient,
    api_url: String,
    api_key: String,
}

impl HciClient {
    /// Create a new HCI client
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, HciError> {
        // Reject malformed URLs up front rather than on the first request
        Url::parse(api_url)?;

        Ok(Self {
            http: HciHttpClient::new()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.api_url
    }

    /// GET a resource and decode the `data` envelope
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HciError> {
        let body = self.http.get(url, &self.api_key).await?;
        unwrap_envelope(body)
    }

    /// POST a resource and decode the `data` envelope
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, HciError> {
        let body = serde_json::to_value(body)?;
        let response = self.http.post(url, &self.api_key, &body).await?;
        unwrap_envelope(response)
    }

    /// PUT a resource and decode the `data` envelope
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, HciError> {
        let body = serde_json::to_value(body)?;
        let response = self.http.put(url, &self.api_key, &body).await?;
        unwrap_envelope(response)
    }

    /// DELETE a resource; the response body is ignored
    pub async fn delete(&self, url: &str) -> Result<(), HciError> {
        self.http.delete(url, &self.api_key).await?;
        Ok(())
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build an API URL from path segments, percent-encoding each one
    pub fn api_url(&self, segments: &[&str]) -> String {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.api_url, path)
    }

    /// Build an environment URL
    pub fn environment_url(&self, environment_id: &str) -> String {
        self.api_url(&["environments", environment_id])
    }

    /// Build a service-scoped entity URL:
    /// `services/{service_code}/{environment_name}/{entity}[/{id}]`
    pub fn service_url(
        &self,
        service_code: &str,
        environment_name: &str,
        entity: &str,
        id: Option<&str>,
    ) -> String {
        match id {
            Some(id) => self.api_url(&["services", service_code, environment_name, entity, id]),
            None => self.api_url(&["services", service_code, environment_name, entity]),
        }
    }
}

fn unwrap_envelope<T: DeserializeOwned>(body: Value) -> Result<T, HciError> {
    let envelope: Envelope<T> = serde_json::from_value(body)?;
    Ok(envelope.data)
}
