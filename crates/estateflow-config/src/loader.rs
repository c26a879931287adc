// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./estateflow.toml` > `~/.config/estateflow/estateflow.toml`
//! > `/etc/estateflow/estateflow.toml` with environment variable overrides via
//! `ESTATEFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::EstateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/estateflow/estateflow.toml` (system-wide)
/// 3. `~/.config/estateflow/estateflow.toml` (user XDG config)
/// 4. `./estateflow.toml` (local directory)
/// 5. `ESTATEFLOW_*` environment variables
pub fn load_config() -> Result<EstateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<EstateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EstateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EstateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EstateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(EstateConfig::default()))
        .merge(Toml::file("/etc/estateflow/estateflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("estateflow/estateflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("estateflow.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `ESTATEFLOW_TELEGRAM_BOT_TOKEN`
/// must map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("ESTATEFLOW_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ESTATEFLOW_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("extractor_", "extractor.", 1)
            .replacen("airtop_", "airtop.", 1)
            .replacen("vault_", "vault.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_config_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[agent]
name = "lead-bot"
poll_interval_secs = 30

[vault]
kdf_iterations = 200000
"#,
        )
        .unwrap();

        assert_eq!(config.agent.name, "lead-bot");
        assert_eq!(config.agent.poll_interval_secs, 30);
        assert_eq!(config.vault.kdf_iterations, 200_000);
        // Untouched sections keep defaults.
        assert_eq!(config.airtop.max_attempts, 3);
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "estateflow");
    }

    #[test]
    fn unknown_section_key_fails_extraction() {
        let result = load_config_from_str(
            r#"
[agent]
naem = "typo"
"#,
        );
        assert!(result.is_err());
    }
}
