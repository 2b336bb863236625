//! Request and response types for the LMS API, the transport seam and the
//! request timeout.

use async_trait::async_trait;
use futures::future::{Either, select};
use reqwest::{Client, Method};
use serde_json::Value;
use shared::config::ClientConfig;
use shared::models::{ApiEnvelope, ErrorBody};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;
use tracing::debug;

use crate::error::{SubmitError, TransportError};

/// One call to the LMS API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path below the base URL, e.g. `auth/login`.
    pub path: String,
    /// JSON body, if the operation sends one.
    pub body: Option<Value>,
    /// Bearer token for authenticated operations.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// A request without body or credentials.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Attaches a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// What came back: the HTTP status and the body, if it was JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub http_status: u16,
    /// Parsed JSON body; `None` for an empty or non-JSON body.
    pub body: Option<Value>,
}

impl ApiResponse {
    /// A raw response.
    #[must_use]
    pub const fn new(http_status: u16, body: Option<Value>) -> Self {
        Self { http_status, body }
    }

    /// An HTTP response carrying `envelope` as its body.
    #[must_use]
    pub fn envelope(http_status: u16, envelope: &ApiEnvelope) -> Self {
        Self {
            http_status,
            body: serde_json::to_value(envelope).ok(),
        }
    }

    const fn is_http_success(&self) -> bool {
        self.http_status >= 200 && self.http_status < 300
    }

    /// Reads the result of an operation that expects `expected` as its
    /// application status code.
    ///
    /// Success needs both an HTTP 2xx and an envelope whose `statusCode`
    /// equals `expected`; the API can answer HTTP 200 with a failing code.
    ///
    /// # Errors
    /// [`SubmitError::Application`] with the server message when present.
    pub fn interpret(&self, expected: u16) -> Result<ApiEnvelope, SubmitError> {
        let envelope = self
            .body
            .clone()
            .and_then(|body| serde_json::from_value::<ApiEnvelope>(body).ok());

        if let Some(envelope) = envelope.as_ref() {
            if self.is_http_success() && envelope.status_code == expected {
                return Ok(envelope.clone());
            }
        }

        let status = match envelope.as_ref() {
            Some(envelope) if self.is_http_success() => envelope.status_code,
            _ => self.http_status,
        };

        let message = self
            .body
            .clone()
            .and_then(|body| serde_json::from_value::<ErrorBody>(body).ok())
            .and_then(|body| body.message().map(str::to_string));

        Err(SubmitError::Application { status, message })
    }
}

/// Sends [`ApiRequest`]s. The browser is single threaded, so futures need
/// not be `Send`.
#[async_trait(?Send)]
pub trait HttpTransport {
    /// Performs the request.
    ///
    /// # Errors
    /// [`TransportError::Network`] when no response was received.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// [`HttpTransport`] over `reqwest`, which uses `fetch` in the browser.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    base_url: String,
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Creates a transport for the configured API.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base_url)
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.api_url(&request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method, url);
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let http_status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let body = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        debug!(http_status, has_body = body.is_some(), "response received");

        Ok(ApiResponse { http_status, body })
    }
}

/// Runs `request`, giving up after `limit`.
///
/// # Errors
/// [`TransportError::Timeout`] when the timer fires first, otherwise
/// whatever the request produced.
pub async fn with_timeout<F>(request: F, limit: Duration) -> Result<ApiResponse, TransportError>
where
    F: Future<Output = Result<ApiResponse, TransportError>>,
{
    let request = pin!(request);
    let timer = pin!(sleep(limit));

    match select(request, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(TransportError::Timeout(limit)),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(limit: Duration) {
    tokio::time::sleep(limit).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(limit: Duration) {
    let millis = u32::try_from(limit.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(millis).await;
}
