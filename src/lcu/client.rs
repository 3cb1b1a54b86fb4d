// LCU client: one authenticated session against the running League client

use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::connection::{resolve_local_endpoint, LcuConnection, ProcessInspector, SystemProcessInspector};
use super::transport::{ApiResponse, HttpTransport, Transport};
use super::types::CurrentSummoner;
use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct LcuClient {
  transport: Arc<dyn Transport>,
}

impl LcuClient {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self { transport }
  }

  /// Locate the running client and open an authenticated session to it.
  pub fn connect(config: &Config) -> Result<Self> {
    Self::connect_with(&SystemProcessInspector, config)
  }

  pub fn connect_with(inspector: &dyn ProcessInspector, config: &Config) -> Result<Self> {
    let connection = resolve_local_endpoint(inspector, config)?;
    Self::from_connection(&connection, config)
  }

  pub fn from_connection(connection: &LcuConnection, config: &Config) -> Result<Self> {
    let transport = HttpTransport::new(
      connection.port,
      Some(connection.basic_auth_header(&config.auth_username)),
      &config.user_agent,
      config.request_timeout(),
      config.accept_invalid_certs,
    )?;
    Ok(Self::new(Arc::new(transport)))
  }

  pub(crate) async fn request(
    &self,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
  ) -> Result<ApiResponse> {
    self.transport.send(method, path, body).await
  }

  /// GET `path`, require a 2xx answer and decode the body.
  pub(crate) async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
    let response = self
      .request(Method::GET, path, None)
      .await?
      .error_for_status(operation)?;
    response.json().map_err(|e| Error::Transport {
      operation: operation.to_string(),
      status: Some(response.status),
      message: format!("unexpected response body: {}", e),
    })
  }

  /// Send a write and require a 2xx answer. The raw response is returned to the caller.
  pub(crate) async fn write(
    &self,
    operation: &str,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
  ) -> Result<ApiResponse> {
    let response = self.request(method, path, body).await?.error_for_status(operation)?;
    tracing::debug!("{} succeeded ({})", operation, response.status);
    Ok(response)
  }

  /// True when the client answers the current-summoner endpoint.
  pub async fn check_connection(&self) -> bool {
    match self.request(Method::GET, "/lol-summoner/v1/current-summoner", None).await {
      Ok(response) => response.is_success(),
      Err(e) => {
        tracing::debug!("Connection check failed: {}", e);
        false
      }
    }
  }

  pub async fn current_summoner(&self) -> Result<CurrentSummoner> {
    let operation = "get current summoner";
    let data: serde_json::Value = self.get_json(operation, "/lol-summoner/v1/current-summoner").await?;
    let summoner = CurrentSummoner::from_json(&data).ok_or_else(|| Error::Transport {
      operation: operation.to_string(),
      status: None,
      message: "summonerId missing from response".to_string(),
    })?;
    tracing::debug!(
      "Current summoner: ID={}, display_name={}",
      summoner.summoner_id,
      summoner.display_name
    );
    Ok(summoner)
  }
}
