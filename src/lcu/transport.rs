// HTTP transport shared by the LCU and live client APIs

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Raw response of a request: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub body: String,
}

impl ApiResponse {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  /// Convert a non-2xx response into a `Transport` error tagged with `operation`.
  pub fn error_for_status(self, operation: &str) -> Result<Self> {
    if self.is_success() {
      return Ok(self);
    }
    let message = if self.body.trim().is_empty() {
      "empty response body".to_string()
    } else {
      self.body.chars().take(200).collect()
    };
    Err(Error::Transport {
      operation: operation.to_string(),
      status: Some(self.status),
      message,
    })
  }

  pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
    Ok(serde_json::from_str(&self.body)?)
  }
}

/// One request against a local service. Paths are absolute (`/lol-perks/v1/pages`).
///
/// A non-2xx answer is still `Ok`; only failures to get an answer at all are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
  async fn send(
    &self,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
  ) -> Result<ApiResponse>;
}

pub struct HttpTransport {
  client: reqwest::Client,
  base_url: Url,
  insecure: bool,
}

impl HttpTransport {
  /// Build a transport for `https://127.0.0.1:<port>`. `authorization` is sent on every request.
  pub fn new(
    port: u16,
    authorization: Option<String>,
    user_agent: &str,
    timeout: Duration,
    accept_invalid_certs: bool,
  ) -> Result<Self> {
    let base_url = Url::parse(&format!("https://127.0.0.1:{}", port))
      .map_err(|e| Error::Connection(format!("Invalid local URL for port {}: {}", port, e)))?;
    Self::with_base_url(base_url, authorization, user_agent, timeout, accept_invalid_certs)
  }

  pub fn with_base_url(
    base_url: Url,
    authorization: Option<String>,
    user_agent: &str,
    timeout: Duration,
    accept_invalid_certs: bool,
  ) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
      USER_AGENT,
      HeaderValue::from_str(user_agent)
        .map_err(|e| Error::Validation(format!("Invalid user agent: {}", e)))?,
    );
    if let Some(auth) = authorization {
      let mut value = HeaderValue::from_str(&auth)
        .map_err(|e| Error::Connection(format!("Invalid authorization header: {}", e)))?;
      value.set_sensitive(true);
      headers.insert(AUTHORIZATION, value);
    }

    if accept_invalid_certs {
      tracing::warn!(
        "TLS certificate verification is disabled for {} (self-signed local service)",
        base_url
      );
    }

    let client = reqwest::Client::builder()
      .danger_accept_invalid_certs(accept_invalid_certs)
      .default_headers(headers)
      .timeout(timeout)
      .build()
      .map_err(|e| Error::Connection(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url,
      insecure: accept_invalid_certs,
    })
  }

  /// True when certificate verification is off for this transport.
  pub fn is_insecure(&self) -> bool {
    self.insecure
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn send(
    &self,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
  ) -> Result<ApiResponse> {
    let operation = format!("{} {}", method, path);
    let url = self
      .base_url
      .join(path)
      .map_err(|e| Error::Validation(format!("Invalid request path {}: {}", path, e)))?;

    let mut request = self.client.request(method, url);
    if let Some(body) = body {
      request = request.json(&body);
    }

    tracing::debug!("-> {}", operation);
    let response = request.send().await.map_err(|e| classify(&operation, e))?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| classify(&operation, e))?;
    tracing::debug!("<- {} {}", status, operation);

    Ok(ApiResponse { status, body })
  }
}

pub(crate) fn classify(operation: &str, err: reqwest::Error) -> Error {
  if err.is_timeout() {
    Error::Timeout {
      operation: operation.to_string(),
    }
  } else {
    Error::transport(operation, err.to_string())
  }
}
