// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Airtop cloud-browser API.
//!
//! Provides [`AirtopClient`] which handles bearer authentication, relay
//! rotation, and transient-error retry with exponential backoff.

use std::time::Duration;

use estateflow_config::model::AirtopConfig;
use estateflow_core::{AutomationSession, EstateError};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::relay::RelayRotation;

/// Per-request transport timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client for Airtop API communication.
///
/// Requests are routed through a rotating relay list; one attempt is in
/// flight at a time, with `base_backoff * 2^attempt` sleeps between
/// failures. A 401/403 aborts immediately -- the key is categorically
/// rejected and retrying cannot help.
#[derive(Debug, Clone)]
pub struct AirtopClient {
    client: reqwest::Client,
    base_url: String,
    relays: RelayRotation,
    max_attempts: u32,
    base_backoff: Duration,
    timeout_minutes: u32,
    proxy_country: String,
    pub(crate) require_explicit_success: bool,
}

impl AirtopClient {
    /// Creates a new Airtop client from configuration.
    ///
    /// Requires `config.api_key` to be set.
    pub fn new(config: &AirtopConfig) -> Result<Self, EstateError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            EstateError::Config("airtop.api_key is required for automation".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.trim())).map_err(|e| {
                EstateError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EstateError::Network {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            relays: RelayRotation::new(config.relay_endpoints.clone()),
            max_attempts: config.max_attempts,
            base_backoff: Duration::from_millis(config.base_backoff_ms),
            timeout_minutes: config.timeout_minutes,
            proxy_country: config.proxy_country.clone(),
            require_explicit_success: config.require_explicit_success,
        })
    }

    /// POST `body` to `target_url` through the relay rotation, retrying on
    /// transient failures.
    ///
    /// - 2xx returns the response immediately.
    /// - 401/403 raises [`EstateError::InvalidApiKey`] at once, with no
    ///   backoff and no further attempts.
    /// - Anything else (non-2xx, transport error) lands in a last-error
    ///   slot; after `base_backoff * 2^attempt` the next relay is tried.
    ///   Exhausting the attempts raises the last observed error.
    pub async fn request_with_retry(
        &self,
        target_url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, EstateError> {
        let mut last_error: Option<EstateError> = None;

        for attempt in 0..self.max_attempts {
            let proxied = self.relays.wrap(attempt, target_url);

            match self.client.post(&proxied).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(status = %status, attempt, "relay response received");

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(EstateError::InvalidApiKey);
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    warn!(status = %status, attempt, "relay attempt failed, will retry");
                    last_error = Some(EstateError::Network {
                        message: format!("relay returned {status}: {body_text}"),
                        source: None,
                    });
                }
                Err(e) => {
                    warn!(error = %e, attempt, "relay request error, will retry");
                    last_error = Some(if e.is_timeout() {
                        EstateError::Timeout {
                            duration: REQUEST_TIMEOUT,
                        }
                    } else {
                        EstateError::Network {
                            message: format!("request failed: {e}"),
                            source: Some(Box::new(e)),
                        }
                    });
                }
            }

            // No sleep after the final attempt.
            if attempt + 1 < self.max_attempts {
                let delay = self.base_backoff * 2u32.saturating_pow(attempt);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| EstateError::Network {
            message: format!("failed to fetch after {} attempts", self.max_attempts),
            source: None,
        }))
    }

    /// Opens a remote cloud-browser session.
    pub async fn create_session(&self) -> Result<AutomationSession, EstateError> {
        let url = format!("{}/sessions", self.base_url);
        let body = serde_json::json!({
            "configuration": {
                "timeoutMinutes": self.timeout_minutes,
                "persistSession": false,
                "proxyCountry": self.proxy_country,
            }
        });

        let response = self.request_with_retry(&url, &body).await?;
        let session: AutomationSession =
            response.json().await.map_err(|e| EstateError::Automation {
                message: format!("malformed session response: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(session_id = %session.id, "automation session created");
        Ok(session)
    }

    /// Submits a natural-language instruction to a running session and
    /// returns the free-text output.
    pub async fn submit_prompt(
        &self,
        session_id: &str,
        prompt: &str,
    ) -> Result<PromptOutput, EstateError> {
        let url = format!("{}/sessions/{}/prompt", self.base_url, session_id);
        let body = serde_json::json!({ "prompt": prompt });

        let response = self.request_with_retry(&url, &body).await?;
        response.json().await.map_err(|e| EstateError::Automation {
            message: format!("malformed prompt response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Output of one prompt submission. The remote treats this as an opaque
/// text-out capability; structure beyond `output` is not guaranteed.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptOutput {
    #[serde(default)]
    pub output: String,
}
