//! HTTP transport for the Airbyte configuration API.
//!
//! [`Transport`] is the seam the rest of the crate talks to; [`ApiClient`] is its reqwest-backed
//! implementation with authentication, extra headers, retries and structured error decoding.
//! [`AirbyteApi`] layers typed endpoint calls on top of any transport.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::models::HealthCheckResponse;

pub mod api;
pub mod errors;
pub mod retry;

pub use api::AirbyteApi;
pub use errors::describe_error_body;
pub use reqwest::Method;
pub use retry::RetryPolicy;

/// Path prefix of every API endpoint, relative to the configured host.
pub const API_BASE_PATH: &str = "api/v1";

/// Errors raised while talking to the API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("invalid additional header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Non-2xx response. `body` is the re-encoded structured error when it decoded, else the raw body.
    #[error("url: {url}, status: {status}, body: {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },
    #[error("failed to encode request body for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("url: {url}, available: false, body: {body}")]
    Unavailable { url: String, body: String },
    #[error("job to get source schema catalog failed")]
    DiscoverJobFailed { job_id: String },
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Connection failures, timeouts, 429 and 5xx (other than 501) are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_connect() || source.is_timeout(),
            Self::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
                    || (*status >= 500 && *status != StatusCode::NOT_IMPLEMENTED.as_u16())
            }
            _ => false,
        }
    }
}

/// Request/response seam between the lifecycle controllers and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `body` to `{host}/api/v1/{path}` and returns the body of a 2xx response.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ClientError>;
}

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    credentials: Option<Credentials>,
    headers: HeaderMap,
    http_client: Client,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Builds a client from provider configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("airbyte-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;
        Self::with_http_client(config, http_client)
    }

    /// Builds a client around a pre-configured `reqwest::Client`.
    pub fn with_http_client(config: &ProviderConfig, http_client: Client) -> Result<Self, ClientError> {
        let credentials = (!config.username.is_empty() && !config.password.is_empty()).then(|| {
            Credentials {
                username: config.username.clone(),
                password: config.password.clone(),
            }
        });

        Ok(Self {
            base_url: config.host_url.trim_end_matches('/').to_string(),
            credentials,
            headers: build_headers(&config.additional_headers)?,
            http_client,
            retry: RetryPolicy::from(&config.retry),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Absolute URL of an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_BASE_PATH,
            path.trim_start_matches('/')
        )
    }

    /// GET `{host}/api/v1/health`; the API must report itself available.
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let url = self.url("health");
        let body = self
            .retry
            .execute("health", || self.send(Method::GET, &url, None))
            .await?;
        let health: HealthCheckResponse =
            serde_json::from_str(&body).map_err(|source| ClientError::Decode {
                path: "health".to_string(),
                source,
            })?;

        if !health.available {
            return Err(ClientError::Unavailable { url, body });
        }

        info!(url = %url, "Airbyte API is available");
        Ok(())
    }

    async fn send(&self, method: Method, url: &str, body: Option<&str>) -> Result<String, ClientError> {
        let mut request = self
            .http_client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .headers(self.headers.clone());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        debug!(method = %method, url, "sending request");
        let transport_error = |source| ClientError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        debug!(method = %method, url, status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(ClientError::Api {
                url: url.to_string(),
                status: status.as_u16(),
                body: describe_error_body(status, &text),
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ClientError> {
        let url = self.url(path);
        let result = self
            .retry
            .execute(path, || self.send(method.clone(), &url, body.as_deref()))
            .await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        counter!("airbyte_api_requests_total", "action" => path.to_string(), "outcome" => outcome)
            .increment(1);
        result
    }
}

/// Converts configured additional headers into a header map. Names are case-insensitive, so a
/// `Host` entry replaces the Host header derived from the URL.
fn build_headers(additional: &BTreeMap<String, String>) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::with_capacity(additional.len());
    for (name, value) in additional {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| ClientError::InvalidHeader {
                name: name.clone(),
                reason: err.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| ClientError::InvalidHeader {
            name: name.clone(),
            reason: err.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
