// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the EstateFlow agent.

use thiserror::Error;

/// The primary error type used across all EstateFlow crates.
#[derive(Debug, Error)]
pub enum EstateError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Authenticated decryption failed. The message deliberately does not
    /// distinguish a wrong passphrase from a tampered blob -- the ciphertext
    /// must not act as a passphrase oracle.
    #[error("decryption failed -- wrong passphrase or corrupted data")]
    Decryption,

    /// The blob decrypted and authenticated, but the JSON inside is invalid.
    /// Signals a serialization-contract violation, not user error.
    #[error("vault contents are corrupt: {0}")]
    CorruptVault(String),

    /// The remote automation API categorically rejected the configured key
    /// (401/403). Retrying cannot help.
    #[error("remote API rejected the configured key")]
    InvalidApiKey,

    /// Transient transport failure (connection refused, DNS, relay 5xx).
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Messaging channel errors (Telegram API failure, malformed update).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Content-extraction errors (Gemini API failure, unparseable output).
    #[error("extractor error: {message}")]
    Extractor {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cloud-browser automation errors that are not one of the typed
    /// classes above (malformed session response, unexpected body).
    #[error("automation error: {message}")]
    Automation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EstateError {
    /// True for failures that a retry loop may reasonably attempt again.
    ///
    /// `InvalidApiKey` is categorically non-retryable; `Decryption` must
    /// never be auto-retried (a wrong password is a user decision).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EstateError::Network { .. } | EstateError::Timeout { .. }
        )
    }
}
