//! HTTP arbiter client.
//!
//! The arbiter keeps each match in a cookie session, so the underlying
//! client holds a cookie store and sends the session cookie with every call.

use super::error::{ArbiterError, TransportError};
use super::wire::{PingResponse, RespondRequest, RespondResponse, StartRequest, StartResponse};
use super::Arbiter;
use crate::client_config::ClientConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;
use strictly_sim_session::{Difficulty, Edge, MoveReply, ProtocolError};
use tracing::{debug, error, info, instrument, warn};

/// Arbiter reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpArbiter {
    /// Base URL of the arbiter, without a trailing slash.
    base_url: String,
    /// HTTP client with a cookie store.
    client: reqwest::Client,
}

impl HttpArbiter {
    /// Creates a client for the arbiter at `base_url`.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ArbiterError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new("client", e.to_string()))?;

        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Creates a client from configuration.
    #[instrument(skip(config))]
    pub fn from_config(config: &ClientConfig) -> Result<Self, ArbiterError> {
        Self::new(config.arbiter_url(), config.request_timeout())
    }

    /// The arbiter's base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks that the arbiter is up.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn ping(&self) -> Result<(), ArbiterError> {
        let response = self.client.get(self.url("dummy")).send().await;
        let pong: PingResponse = Self::read("dummy", response).await?;
        if pong.result != 1 {
            warn!(result = pong.result, "Unexpected ping result");
            return Err(ProtocolError::Malformed(format!("ping returned {}", pong.result)).into());
        }
        info!("Arbiter is up");
        Ok(())
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route)
    }

    async fn post<B, R>(&self, route: &'static str, body: &B) -> Result<R, ArbiterError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.client.post(self.url(route)).json(body).send().await;
        Self::read(route, response).await
    }

    /// Maps a raw response onto transport and protocol failures.
    async fn read<R: DeserializeOwned>(
        route: &'static str,
        response: reqwest::Result<reqwest::Response>,
    ) -> Result<R, ArbiterError> {
        let response = response.map_err(|e| {
            warn!(route, error = %e, "Request failed");
            TransportError::new(route, e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::new(route, format!("failed to read body: {}", e)))?;
        debug!(route, status = %status, body = %text, "Arbiter response");

        if !status.is_success() {
            warn!(route, status = %status, "Arbiter returned an error status");
            return Err(TransportError::status(route, status.as_u16(), &text).into());
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(route, error = %e, body = %text, "Unreadable arbiter response");
            ProtocolError::Malformed(format!("{}: {}", route, e)).into()
        })
    }
}

#[async_trait::async_trait]
impl Arbiter for HttpArbiter {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn start(&mut self, difficulty: Difficulty) -> Result<BTreeSet<Edge>, ArbiterError> {
        info!(%difficulty, "Starting match");
        let response: StartResponse = self.post("start", &StartRequest { difficulty }).await?;
        Ok(response.into_pool())
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn respond(&mut self, edge: Edge) -> Result<MoveReply, ArbiterError> {
        info!(%edge, "Sending move");
        let response: RespondResponse = self.post("respond", &RespondRequest::new(edge)).await?;
        Ok(response.into_reply()?)
    }
}
