// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Envelope framing: `base64(salt ‖ iv ‖ ciphertext+tag)`.
//!
//! The byte layout `[16-byte salt][12-byte IV][ciphertext + 16-byte tag]`
//! is the persisted-state contract. Blobs written by the legacy dashboard
//! (Web Crypto, PBKDF2/SHA-256 + AES-GCM) decrypt here unchanged, provided
//! the configured iteration count matches.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use estateflow_core::EstateError;
use secrecy::{ExposeSecret, SecretString};

use crate::crypto::{self, IV_LEN, TAG_LEN};
use crate::kdf::{self, SALT_LEN};

/// Minimum decoded envelope size: salt + IV + the tag of an empty message.
const MIN_ENVELOPE_LEN: usize = SALT_LEN + IV_LEN + TAG_LEN;

/// Encrypt `plaintext` under a key derived from `passphrase`.
///
/// A fresh random salt and IV are drawn for every call, so encrypting the
/// same input twice yields different envelopes that both decrypt correctly.
pub fn encrypt(
    plaintext: &str,
    passphrase: &SecretString,
    iterations: u32,
) -> Result<String, EstateError> {
    let salt = kdf::generate_salt()?;
    let key = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, iterations)?;
    let (ciphertext, iv) = crypto::seal(&key, plaintext.as_bytes())?;

    let mut framed = Vec::with_capacity(SALT_LEN + IV_LEN + ciphertext.len());
    framed.extend_from_slice(&salt);
    framed.extend_from_slice(&iv);
    framed.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(framed))
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// Fails with [`EstateError::Decryption`] for a wrong passphrase, a
/// tampered blob, or a malformed frame -- the three cases are deliberately
/// indistinguishable so the ciphertext is not a passphrase oracle.
pub fn decrypt(
    envelope: &str,
    passphrase: &SecretString,
    iterations: u32,
) -> Result<String, EstateError> {
    let framed = STANDARD
        .decode(envelope.trim())
        .map_err(|_| EstateError::Decryption)?;

    if framed.len() < MIN_ENVELOPE_LEN {
        return Err(EstateError::Decryption);
    }

    let salt: [u8; SALT_LEN] = framed[..SALT_LEN]
        .try_into()
        .map_err(|_| EstateError::Decryption)?;
    let iv: [u8; IV_LEN] = framed[SALT_LEN..SALT_LEN + IV_LEN]
        .try_into()
        .map_err(|_| EstateError::Decryption)?;
    let ciphertext = &framed[SALT_LEN + IV_LEN..];

    let key = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, iterations)?;
    let plaintext = crypto::open(&key, &iv, ciphertext)?;

    String::from_utf8(plaintext).map_err(|_| EstateError::Decryption)
}
