// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit IV via the system
//! CSPRNG. IV reuse would be catastrophic for GCM security.

use estateflow_core::EstateError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use crate::kdf::KEY_LEN;

/// IV length in bytes (GCM standard 96-bit nonce).
pub const IV_LEN: usize = 12;

/// GCM authentication tag length in bytes, appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext with AES-256-GCM using a random 96-bit IV.
///
/// Returns `(ciphertext_with_tag, iv_bytes)`. The caller must store both
/// to be able to decrypt later.
pub fn seal(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; IV_LEN]), EstateError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| EstateError::Internal("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut iv_bytes = [0u8; IV_LEN];
    rng.fill(&mut iv_bytes)
        .map_err(|_| EstateError::Internal("failed to generate random IV".to_string()))?;

    let nonce = Nonce::assume_unique_for_key(iv_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| EstateError::Internal("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, iv_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the 16-byte authentication tag appended by
/// [`seal`]. Fails with [`EstateError::Decryption`] when the tag does not
/// verify -- wrong key and tampered data are deliberately indistinguishable.
pub fn open(
    key: &[u8; KEY_LEN],
    iv_bytes: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, EstateError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| EstateError::Internal("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*iv_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| EstateError::Decryption)?;

    Ok(plaintext.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> [u8; KEY_LEN] {
        let rng = SystemRandom::new();
        let mut key = [0u8; KEY_LEN];
        rng.fill(&mut key).unwrap();
        key
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = random_key();
        let plaintext = b"facebook session cookie jar";

        let (ciphertext, iv) = seal(&key, plaintext).unwrap();
        let decrypted = open(&key, &iv, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn seal_produces_different_ciphertext_for_same_plaintext() {
        let key = random_key();
        let plaintext = b"same input twice";

        let (ct1, iv1) = seal(&key, plaintext).unwrap();
        let (ct2, iv2) = seal(&key, plaintext).unwrap();

        // Random IVs should differ.
        assert_ne!(iv1, iv2);
        // Ciphertext should differ due to different IVs.
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn open_with_wrong_key_fails_closed() {
        let key1 = random_key();
        let key2 = random_key();
        let plaintext = b"secret data";

        let (ciphertext, iv) = seal(&key1, plaintext).unwrap();
        let result = open(&key2, &iv, &ciphertext);

        assert!(matches!(result, Err(EstateError::Decryption)));
    }

    #[test]
    fn ciphertext_is_longer_than_plaintext_by_tag() {
        let key = random_key();
        let plaintext = b"hello";

        let (ciphertext, _) = seal(&key, plaintext).unwrap();

        assert_eq!(ciphertext.len(), plaintext.len() + TAG_LEN);
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        let key = random_key();
        let plaintext = b"do not tamper";

        let (mut ciphertext, iv) = seal(&key, plaintext).unwrap();
        // Flip a bit.
        ciphertext[0] ^= 0x01;

        let result = open(&key, &iv, &ciphertext);
        assert!(matches!(result, Err(EstateError::Decryption)));
    }
}
