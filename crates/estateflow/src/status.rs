// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `estateflow status` command implementation.
//!
//! Shows what is configured, whether the database answers, and whether a
//! credential vault is present. Purely read-only.

use estateflow_config::EstateConfig;
use estateflow_core::EstateError;
use estateflow_storage::{Database, SqliteKvStore};
use estateflow_vault::CredentialVault;

fn configured(flag: bool) -> &'static str {
    if flag { "configured" } else { "not configured" }
}

/// Run the `estateflow status` command.
pub async fn run(config: EstateConfig) -> Result<(), EstateError> {
    println!("estateflow status");
    println!("  agent:        {}", config.agent.name);
    println!("  poll every:   {}s", config.agent.poll_interval_secs);
    println!(
        "  telegram:     {}",
        configured(config.telegram.bot_token.is_some())
    );
    println!(
        "  extractor:    {} ({})",
        configured(config.extractor.api_key.is_some()),
        config.extractor.model
    );
    println!(
        "  automation:   {} ({} relays, {} attempts)",
        configured(config.airtop.api_key.is_some()),
        config.airtop.relay_endpoints.len(),
        config.airtop.max_attempts
    );

    match Database::open(&config.storage.database_path).await {
        Ok(db) => {
            db.ping().await?;
            println!("  database:     ok ({})", config.storage.database_path);

            let vault = CredentialVault::new(SqliteKvStore::new(db), &config.vault);
            let state = if vault.has_vault().await? {
                "present (locked)"
            } else {
                "empty"
            };
            println!("  vault:        {state}");
        }
        Err(e) => {
            println!("  database:     unreachable ({e})");
        }
    }

    Ok(())
}
