// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw Bot API client.
//!
//! Ingestion is a plain periodic `getUpdates` GET plus a handful of send
//! and file endpoints; no bot-framework machinery. Replies with
//! `ok: false` surface as channel errors carrying the API description.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use estateflow_config::model::TelegramConfig;
use estateflow_core::EstateError;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{ApiReply, TgFile, Update};

/// Client for the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Creates a new client. Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, EstateError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            EstateError::Config("telegram.bot_token is required for ingestion".into())
        })?;
        if token.is_empty() {
            return Err(EstateError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| EstateError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, EstateError> {
        let url = self.method_url(method);
        let request = match body {
            Some(body) => self.client.post(&url).json(&body),
            None => self.client.get(&url),
        };

        let response = request.send().await.map_err(|e| EstateError::Channel {
            message: format!("Telegram request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstateError::Channel {
                message: format!("Telegram request failed: {status}"),
                source: None,
            });
        }

        let reply: ApiReply<T> = response.json().await.map_err(|e| EstateError::Channel {
            message: format!("malformed Telegram reply: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !reply.ok {
            return Err(EstateError::Channel {
                message: format!(
                    "Telegram API failure: {}",
                    reply.description.as_deref().unwrap_or("Unknown error")
                ),
                source: None,
            });
        }

        reply.result.ok_or_else(|| EstateError::Channel {
            message: "Telegram reply carried no result".into(),
            source: None,
        })
    }

    /// Fetches pending updates past `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, limit: u8) -> Result<Vec<Update>, EstateError> {
        let url = format!(
            "{}?offset={}&limit={limit}",
            self.method_url("getUpdates"),
            offset.unwrap_or(-1)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EstateError::Channel {
                message: format!("Telegram request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstateError::Channel {
                message: format!("Telegram request failed: {status}"),
                source: None,
            });
        }

        let reply: ApiReply<Vec<Update>> =
            response.json().await.map_err(|e| EstateError::Channel {
                message: format!("malformed Telegram reply: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !reply.ok {
            return Err(EstateError::Channel {
                message: format!(
                    "Telegram API failure: {}",
                    reply.description.as_deref().unwrap_or("Unknown error")
                ),
                source: None,
            });
        }

        let updates = reply.result.unwrap_or_default();
        debug!(count = updates.len(), "updates fetched");
        Ok(updates)
    }

    /// Sends an HTML-formatted text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), EstateError> {
        let _reply: serde_json::Value = self
            .call(
                "sendMessage",
                Some(serde_json::json!({
                    "chat_id": chat_id,
                    "text": text,
                    "parse_mode": "HTML",
                })),
            )
            .await?;
        Ok(())
    }

    /// Shows a "typing..." indicator in the chat. Best-effort.
    pub async fn send_typing(&self, chat_id: i64) -> Result<(), EstateError> {
        let _reply: serde_json::Value = self
            .call(
                "sendChatAction",
                Some(serde_json::json!({
                    "chat_id": chat_id,
                    "action": "typing",
                })),
            )
            .await?;
        Ok(())
    }

    /// Resolves a `file_id` to its download URL.
    pub async fn get_file_url(&self, file_id: &str) -> Result<String, EstateError> {
        let file: TgFile = self
            .call(
                "getFile",
                Some(serde_json::json!({ "file_id": file_id })),
            )
            .await?;

        let path = file.file_path.ok_or_else(|| EstateError::Channel {
            message: "getFile reply carried no file_path".into(),
            source: None,
        })?;

        Ok(format!("{}/file/bot{}/{path}", self.base_url, self.token))
    }

    /// Downloads a photo and returns its bytes base64-encoded, ready for
    /// the extractor's inline-image part.
    pub async fn download_photo(&self, file_id: &str) -> Result<String, EstateError> {
        let url = self.get_file_url(file_id).await?;

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EstateError::Channel {
                message: format!("photo download failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(EstateError::Channel {
                message: format!("photo download failed: {}", response.status()),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| EstateError::Channel {
            message: format!("photo download failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(STANDARD.encode(bytes))
    }
}
