// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `estateflow serve` command implementation.
//!
//! Wires the clients, storage, vault, and log bus into a [`Pipeline`] and
//! runs it until ctrl-c.

use std::time::Duration;

use estateflow_agent::Pipeline;
use estateflow_airtop::AirtopClient;
use estateflow_config::EstateConfig;
use estateflow_core::{CredentialRecord, EstateError, LogBus};
use estateflow_extractor::GeminiClient;
use estateflow_storage::{Database, SqliteKvStore};
use estateflow_telegram::TelegramClient;
use estateflow_vault::{CredentialVault, get_vault_passphrase};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the `estateflow serve` command.
pub async fn run(config: EstateConfig) -> Result<(), EstateError> {
    let db = Database::open(&config.storage.database_path).await?;

    let telegram = TelegramClient::new(&config.telegram)?;
    let extractor = GeminiClient::new(&config.extractor)?;

    // Publishing is optional: without an automation key, listings stay drafts.
    let airtop = match AirtopClient::new(&config.airtop) {
        Ok(client) => Some(client),
        Err(EstateError::Config(msg)) => {
            warn!(%msg, "automation disabled");
            None
        }
        Err(e) => return Err(e),
    };

    let credentials = load_credentials(&config, &db).await?;
    if !credentials.is_set {
        warn!("no Facebook credentials; listings will not be published");
    }

    let bus = LogBus::default();
    spawn_bus_logger(&bus);

    let mut pipeline = Pipeline::new(
        telegram,
        extractor,
        airtop,
        credentials,
        db,
        bus,
        Duration::from_secs(config.agent.poll_interval_secs),
        config.telegram.allowed_chat_ids.clone(),
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            shutdown.cancel();
        }
    });

    pipeline.run(cancel).await
}

/// Unlock stored credentials, or fall back to an unset record.
async fn load_credentials(
    config: &EstateConfig,
    db: &Database,
) -> Result<CredentialRecord, EstateError> {
    let vault = CredentialVault::new(SqliteKvStore::new(db.clone()), &config.vault);

    if !vault.has_vault().await? {
        return Ok(CredentialRecord::unset());
    }

    let passphrase = get_vault_passphrase()?;
    // A wrong passphrase propagates here -- serve must not start with a
    // silently-locked vault.
    Ok(vault
        .load_credentials(&passphrase)
        .await?
        .unwrap_or_else(CredentialRecord::unset))
}

/// Mirror bus events into the tracing output.
fn spawn_bus_logger(bus: &LogBus) {
    let mut sub = bus.subscribe();
    tokio::spawn(async move {
        while let Some(log) = sub.next().await {
            info!(module = %log.module, level = %log.level, "{}", log.message);
        }
    });
}
