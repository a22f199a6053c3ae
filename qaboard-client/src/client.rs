//! Shared HTTP client
//!
//! One `ApiClient` wraps a single `reqwest::Client` plus the backend base
//! URL. It is constructed once at startup and cloned into every service;
//! clones share the same connection pool. All request helpers normalize
//! failures into [`ApiError`] - HTTP error statuses are classified by code,
//! transport failures become `Network`, everything else `Unknown`.

use reqwest::multipart::Form;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client for the given base URL, e.g. `http://localhost:5000`
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::Unknown {
            detail: format!("Invalid base URL '{}': {}", base_url, e),
        })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::from)?;

        Ok(Self { http, base_url })
    }

    /// Build a client around an existing `reqwest::Client`
    pub fn with_http(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path).map_err(|e| ApiError::Unknown {
            detail: format!("Invalid request path '{}': {}", path, e),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await.map_err(map_send_error)?;
        Self::decode(response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;
        Self::decode(response).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        debug!(%url, "PUT");
        let response = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;
        Self::decode(response).await
    }

    /// DELETE, discarding any response body
    pub async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<(), ApiError> {
        let url = self.url(path, query)?;
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(map_send_error)?;
        Self::check_status(response).await.map(|_| ())
    }

    /// POST a multipart form (file uploads)
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        debug!(%url, "POST multipart");
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;
        Self::decode(response).await
    }

    /// GET a binary body (document downloads)
    pub async fn get_bytes(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path, query)?;
        debug!(%url, "GET bytes");
        let response = self.http.get(url).send().await.map_err(map_send_error)?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    /// Error-check a response, classifying failure statuses with any
    /// server-supplied `message`/`detail` string from the body.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let server_message = extract_server_message(response).await;
        let err = ApiError::from_status(status.as_u16(), server_message);
        warn!(status = status.as_u16(), error = %err, "request failed");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            // Represent empty replies as JSON null so Option targets work
            return serde_json::from_value(serde_json::Value::Null).map_err(|e| {
                ApiError::Unknown {
                    detail: format!("Failed to decode empty response: {}", e),
                }
            });
        }
        response.json::<T>().await.map_err(|e| ApiError::Unknown {
            detail: format!("Failed to decode response: {}", e),
        })
    }
}

/// Pull the human-readable message out of an error body, tolerating both
/// `{message}` and `{detail}` keys and non-JSON bodies.
async fn extract_server_message(response: Response) -> Option<String> {
    let body = response.text().await.ok()?;
    let value: serde_json::Value = serde_json::from_str(&body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("detail"))
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

/// A send() failure means no usable response arrived
fn map_send_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ApiError::Network
    } else {
        ApiError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_and_query() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let url = client
            .url("/api/bug/list", &[("project_id", "p1"), ("severity", "high")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/bug/list?project_id=p1&severity=high"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
