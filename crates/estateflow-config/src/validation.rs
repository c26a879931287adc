// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as the PBKDF2 work-factor floor, relay URL shapes,
//! and retry bounds.

use crate::diagnostic::ConfigError;
use crate::model::EstateConfig;

/// Floor for PBKDF2 iterations. Lowering it would weaken every blob
/// encrypted afterwards; raising it is always safe for new blobs.
const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &EstateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate log level is one the subscriber understands.
    let level = config.agent.log_level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of trace, debug, info, warn, error; got `{}`",
                config.agent.log_level
            ),
        });
    }

    if config.agent.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "agent.poll_interval_secs must be at least 1".to_string(),
        });
    }

    // Validate database_path is not empty.
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate vault KDF work factor.
    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    // Validate retry parameters.
    if config.airtop.max_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "airtop.max_attempts must be at least 1, got {}",
                config.airtop.max_attempts
            ),
        });
    }

    if config.airtop.relay_endpoints.is_empty() {
        errors.push(ConfigError::Validation {
            message: "airtop.relay_endpoints must not be empty".to_string(),
        });
    }

    for (i, relay) in config.airtop.relay_endpoints.iter().enumerate() {
        if !relay.starts_with("http://") && !relay.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!(
                    "airtop.relay_endpoints[{i}] must be an http(s) URL, got `{relay}`"
                ),
            });
        }
    }

    // A Telegram bot token looks like "<numeric id>:<secret>".
    if let Some(token) = &config.telegram.bot_token
        && !token.is_empty()
    {
        let well_formed = token
            .split_once(':')
            .is_some_and(|(id, rest)| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !rest.is_empty());
        if !well_formed {
            errors.push(ConfigError::Validation {
                message: "telegram.bot_token does not look like a Bot API token (expected `<id>:<secret>`)"
                    .to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = EstateConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn low_kdf_iterations_fails_validation() {
        let mut config = EstateConfig::default();
        config.vault.kdf_iterations = 10_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_iterations"))
        ));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = EstateConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn zero_attempts_fails_validation() {
        let mut config = EstateConfig::default();
        config.airtop.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("max_attempts"))
        ));
    }

    #[test]
    fn non_http_relay_fails_validation() {
        let mut config = EstateConfig::default();
        config.airtop.relay_endpoints = vec!["ftp://relay.example/?".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("relay_endpoints"))
        ));
    }

    #[test]
    fn malformed_bot_token_fails_validation() {
        let mut config = EstateConfig::default();
        config.telegram.bot_token = Some("not-a-token".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("bot_token"))
        ));
    }

    #[test]
    fn well_formed_bot_token_passes() {
        let mut config = EstateConfig::default();
        config.telegram.bot_token = Some("123456789:AAGxyz".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_multiple_errors_without_failing_fast() {
        let mut config = EstateConfig::default();
        config.vault.kdf_iterations = 1;
        config.airtop.max_attempts = 0;
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
