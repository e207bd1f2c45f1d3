//! API gateway: uniform request execution for every domain service.
//!
//! This is the single point where bearer tokens are attached, the fixed
//! timeout is enforced, and error bodies are decoded. Domain services
//! never touch headers or raw status codes.
//!
//! Success bodies come in two shapes - `{ data, message? }` envelopes and
//! bare payloads (some list endpoints return a raw array) - both are
//! normalized into [`ApiResponse`].

mod error;

pub use error::ApiError;

use std::sync::Arc;

use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::storage::{KeyValueStore, keys};

/// Normalized result of a successful API call.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Always true for 2xx responses; carried for parity with the wire
    /// envelope.
    pub success: bool,
    /// Decoded payload, when the body had one.
    pub data: Option<T>,
    /// Informational message, when the envelope carried one.
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, mapping an empty body to [`ApiError::MissingData`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingData`] when the response had no data.
    pub fn require_data(self, endpoint: &str) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::MissingData(endpoint.to_owned()))
    }
}

/// Wire-side success envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    message: Option<String>,
}

/// Wire-side error body, decoded defensively: every field is optional.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<Vec<String>>,
    description: Option<String>,
}

/// Client for the Vitrine REST API.
///
/// Cheaply cloneable; all clones share one connection pool and one
/// storage handle.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: url::Url,
    health_timeout: std::time::Duration,
    storage: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// The bearer token is read from `storage` under the `token` key on
    /// every request, so login/logout take effect without rebuilding the
    /// client.
    #[must_use]
    pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                health_timeout: config.health_timeout,
                storage,
            }),
        }
    }

    /// Make a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on any non-2xx status, timeout, network
    /// failure, or undecodable body.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.inner.http.get(self.url(path))).await
    }

    /// Make a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on any non-2xx status, timeout, network
    /// failure, or undecodable body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.inner.http.post(self.url(path)).json(body))
            .await
    }

    /// Make a POST request without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on any non-2xx status, timeout, network
    /// failure, or undecodable body.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.inner.http.post(self.url(path))).await
    }

    /// Make a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on any non-2xx status, timeout, network
    /// failure, or undecodable body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.inner.http.put(self.url(path)).json(body))
            .await
    }

    /// Make a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on any non-2xx status, timeout, network
    /// failure, or undecodable body.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(self.inner.http.delete(self.url(path))).await
    }

    /// Probe `GET /health` with the shorter health-check timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the endpoint is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let response = self
            .inner
            .http
            .get(self.url("health"))
            .timeout(self.inner.health_timeout)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(Self::status_error(status.as_u16(), &text))
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Read the bearer token from storage. Read failures are logged and
    /// treated as "no token" - an unauthenticated request is better than
    /// no request.
    async fn bearer_token(&self) -> Option<String> {
        match self.inner.storage.get(keys::TOKEN).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("failed to read token from storage: {e}");
                None
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        if let Some(token) = self.bearer_token().await {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            return Err(Self::status_error(status.as_u16(), &text));
        }

        Self::decode(&text)
    }

    /// Decode a 2xx body: `{ data, message? }` envelope first, bare
    /// payload second.
    fn decode<T: DeserializeOwned>(text: &str) -> Result<ApiResponse<T>, ApiError> {
        if text.trim().is_empty() {
            return Ok(ApiResponse {
                success: true,
                data: None,
                message: None,
            });
        }

        if let Ok(envelope) = serde_json::from_str::<Envelope<T>>(text)
            && (envelope.data.is_some() || envelope.message.is_some())
        {
            return Ok(ApiResponse {
                success: true,
                data: envelope.data,
                message: envelope.message,
            });
        }

        // Bare payload (e.g. a list endpoint returning a raw array)
        let data = serde_json::from_str::<T>(text)?;
        Ok(ApiResponse {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    /// Build the typed error for a non-2xx response, decoding whatever
    /// structure the body offers and falling back to `HTTP <status>`.
    fn status_error(status: u16, text: &str) -> ApiError {
        serde_json::from_str::<ErrorBody>(text).map_or_else(
            |_| ApiError::Status {
                status,
                message: format!("HTTP {status}"),
                errors: Vec::new(),
                description: None,
            },
            |body| ApiError::Status {
                status,
                message: body.message.unwrap_or_else(|| format!("HTTP {status}")),
                errors: body.errors.unwrap_or_default(),
                description: body.description,
            },
        )
    }
}
