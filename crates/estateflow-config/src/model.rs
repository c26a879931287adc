// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the EstateFlow agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level EstateFlow configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EstateConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram ingestion settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Content-extraction (Gemini) settings.
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Cloud-browser automation (Airtop) settings.
    #[serde(default)]
    pub airtop: AirtopConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between Telegram update polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_agent_name() -> String {
    "estateflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

/// Telegram ingestion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables ingestion.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat IDs allowed to feed listings in. Empty allows all chats.
    #[serde(default)]
    pub allowed_chat_ids: Vec<i64>,

    /// Bot API base URL.
    #[serde(default = "default_telegram_base_url")]
    pub api_base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            allowed_chat_ids: Vec::new(),
            api_base_url: default_telegram_base_url(),
        }
    }
}

fn default_telegram_base_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Content-extraction (Gemini) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Gemini API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for listing analysis.
    #[serde(default = "default_extractor_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_extractor_base_url")]
    pub base_url: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_extractor_model(),
            base_url: default_extractor_base_url(),
        }
    }
}

fn default_extractor_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_extractor_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Cloud-browser automation (Airtop) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AirtopConfig {
    /// Airtop API key. `None` disables publishing and verification.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Automation API base URL.
    #[serde(default = "default_airtop_base_url")]
    pub base_url: String,

    /// Relay endpoints tried in round-robin order. Each is a URL prefix
    /// the target URL is appended to, percent-encoded.
    #[serde(default = "default_relay_endpoints")]
    pub relay_endpoints: Vec<String>,

    /// Maximum request attempts before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds; doubles per attempt.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Remote session lifetime in minutes.
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u32,

    /// Country for the remote session's egress proxy.
    #[serde(default = "default_proxy_country")]
    pub proxy_country: String,

    /// When true, verification output with no recognizable verdict marker
    /// is reported as an unknown-state failure instead of success.
    #[serde(default)]
    pub require_explicit_success: bool,
}

impl Default for AirtopConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_airtop_base_url(),
            relay_endpoints: default_relay_endpoints(),
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            timeout_minutes: default_timeout_minutes(),
            proxy_country: default_proxy_country(),
            require_explicit_success: false,
        }
    }
}

fn default_airtop_base_url() -> String {
    "https://api.airtop.ai/v1".to_string()
}

fn default_relay_endpoints() -> Vec<String> {
    vec![
        "https://corsproxy.io/?".to_string(),
        "https://api.allorigins.win/raw?url=".to_string(),
    ]
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    1000
}

fn default_timeout_minutes() -> u32 {
    10
}

fn default_proxy_country() -> String {
    "MY".to_string()
}

/// Credential vault configuration.
///
/// The PBKDF2 work factor is a single constant here, never a per-call
/// parameter. Existing vault blobs only decrypt with the value they were
/// written under.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    100_000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("estateflow").join("estateflow.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("estateflow.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = EstateConfig::default();
        assert_eq!(config.agent.name, "estateflow");
        assert_eq!(config.vault.kdf_iterations, 100_000);
        assert_eq!(config.airtop.max_attempts, 3);
        assert_eq!(config.airtop.base_backoff_ms, 1000);
        assert_eq!(config.airtop.relay_endpoints.len(), 2);
        assert!(!config.airtop.require_explicit_success);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[vault]
kdf_iterations = 150000
iteration_count = 3
"#;
        let result = toml::from_str::<EstateConfig>(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let toml_str = r#"
[airtop]
api_key = "at-test"
"#;
        let config: EstateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.airtop.api_key.as_deref(), Some("at-test"));
        assert_eq!(config.airtop.max_attempts, 3);
        assert_eq!(config.airtop.proxy_country, "MY");
    }
}
