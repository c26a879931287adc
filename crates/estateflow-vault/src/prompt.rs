// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or ESTATEFLOW_VAULT_KEY environment variable.

use estateflow_core::EstateError;
use secrecy::SecretString;

/// The environment variable name for providing the vault passphrase.
pub const VAULT_KEY_ENV_VAR: &str = "ESTATEFLOW_VAULT_KEY";

/// Get vault passphrase from environment variable or interactive TTY prompt.
///
/// Priority:
/// 1. `ESTATEFLOW_VAULT_KEY` environment variable (for headless/Docker/systemd)
/// 2. Interactive TTY prompt via `rpassword` (for human operators)
///
/// Returns an error if neither source is available.
pub fn get_vault_passphrase() -> Result<SecretString, EstateError> {
    // Check env var first.
    if let Ok(key) = std::env::var(VAULT_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    // Try interactive prompt.
    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Master password: ");
        let passphrase = rpassword::read_password()
            .map_err(|e| EstateError::Internal(format!("failed to read passphrase: {e}")))?;
        if passphrase.is_empty() {
            return Err(EstateError::Config("empty passphrase not allowed".to_string()));
        }
        return Ok(SecretString::from(passphrase));
    }

    Err(EstateError::Config(
        "No passphrase provided. Set ESTATEFLOW_VAULT_KEY environment variable or run interactively."
            .to_string(),
    ))
}

/// Get vault passphrase with confirmation prompt (for first-time save).
///
/// Prompts twice and verifies the passphrases match. Only works in
/// interactive TTY mode; falls back to env var if not a terminal.
pub fn get_vault_passphrase_with_confirm() -> Result<SecretString, EstateError> {
    // Env var does not need confirmation.
    if let Ok(key) = std::env::var(VAULT_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("New master password: ");
        let pass1 = rpassword::read_password()
            .map_err(|e| EstateError::Internal(format!("failed to read passphrase: {e}")))?;
        eprint!("Confirm master password: ");
        let pass2 = rpassword::read_password()
            .map_err(|e| EstateError::Internal(format!("failed to read passphrase: {e}")))?;

        if pass1 != pass2 {
            return Err(EstateError::Config("passphrases do not match".to_string()));
        }
        if pass1.is_empty() {
            return Err(EstateError::Config("empty passphrase not allowed".to_string()));
        }
        return Ok(SecretString::from(pass1));
    }

    Err(EstateError::Config(
        "No passphrase provided. Set ESTATEFLOW_VAULT_KEY environment variable or run interactively."
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn get_passphrase_from_env_var() {
        // SAFETY: test-only env mutation, serialized via serial_test.
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "test-passphrase") };
        let result = get_vault_passphrase();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn get_passphrase_with_confirm_from_env_var() {
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "test-passphrase") };
        let result = get_vault_passphrase_with_confirm();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn empty_env_var_is_rejected() {
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "") };
        // In CI/test, stdin is not a terminal, so this will fail.
        let result = get_vault_passphrase();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert!(result.is_err());
    }
}
