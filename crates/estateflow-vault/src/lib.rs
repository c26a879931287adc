// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted credential vault for the EstateFlow agent.
//!
//! Protects the Facebook login secret at rest using envelope encryption:
//! a 256-bit key is derived from the user's master password and a random
//! salt via PBKDF2-HMAC-SHA256, then the serialized record is sealed with
//! AES-256-GCM. Salt, IV, and ciphertext+tag travel together in one
//! base64 blob stored under a single fixed key.

pub mod crypto;
pub mod envelope;
pub mod kdf;
pub mod prompt;
pub mod vault;

pub use prompt::{get_vault_passphrase, get_vault_passphrase_with_confirm};
pub use vault::{CredentialVault, VAULT_STORAGE_KEY, mask_secret};
