// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `estateflow vault` and `estateflow verify` command implementations.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use estateflow_airtop::AirtopClient;
use estateflow_config::EstateConfig;
use estateflow_core::{AuthFailureReason, CredentialRecord, EstateError};
use estateflow_storage::{Database, SqliteKvStore};
use estateflow_vault::{
    CredentialVault, get_vault_passphrase, get_vault_passphrase_with_confirm, mask_secret,
};

/// Vault management actions.
#[derive(Subcommand, Debug)]
pub enum VaultAction {
    /// Store Facebook credentials, replacing any existing record.
    Set {
        /// How the account authenticates.
        #[arg(long, value_enum, default_value_t = MethodArg::Credentials)]
        method: MethodArg,
        /// Account email (credentials method). The password is prompted.
        #[arg(long)]
        email: Option<String>,
        /// Path to an exported cookie JSON file (cookies method).
        #[arg(long)]
        cookies_file: Option<PathBuf>,
    },
    /// Show the stored record with secrets masked.
    Show,
    /// Delete the stored record.
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Credentials,
    Cookies,
}

async fn open_vault(config: &EstateConfig) -> Result<CredentialVault<SqliteKvStore>, EstateError> {
    let db = Database::open(&config.storage.database_path).await?;
    Ok(CredentialVault::new(SqliteKvStore::new(db), &config.vault))
}

/// Run an `estateflow vault` subcommand.
pub async fn run(config: EstateConfig, action: VaultAction) -> Result<(), EstateError> {
    let vault = open_vault(&config).await?;

    match action {
        VaultAction::Set {
            method,
            email,
            cookies_file,
        } => {
            let record = build_record(method, email, cookies_file)?;

            // First save sets the master password; later saves unlock with it.
            let passphrase = if vault.has_vault().await? {
                get_vault_passphrase()?
            } else {
                get_vault_passphrase_with_confirm()?
            };

            vault.save_credentials(&record, &passphrase).await?;
            println!("Credentials saved.");
        }
        VaultAction::Show => {
            if !vault.has_vault().await? {
                println!("No vault present.");
                return Ok(());
            }
            let passphrase = get_vault_passphrase()?;
            let Some(record) = vault.load_credentials(&passphrase).await? else {
                println!("No vault present.");
                return Ok(());
            };

            println!("auth method: {}", record.auth_method);
            if let Some(email) = &record.email {
                println!("email:       {email}");
            }
            if let Some(password) = &record.password {
                println!("password:    {}", mask_secret(password));
            }
            if let Some(cookies) = &record.cookies {
                println!("cookies:     {}", mask_secret(cookies));
            }
        }
        VaultAction::Clear => {
            vault.clear_vault().await?;
            println!("Vault cleared.");
        }
    }

    Ok(())
}

fn build_record(
    method: MethodArg,
    email: Option<String>,
    cookies_file: Option<PathBuf>,
) -> Result<CredentialRecord, EstateError> {
    match method {
        MethodArg::Credentials => {
            let email = email.ok_or_else(|| {
                EstateError::Config("--email is required for the credentials method".into())
            })?;
            eprint!("Facebook password: ");
            let password = rpassword::read_password()
                .map_err(|e| EstateError::Internal(format!("failed to read password: {e}")))?;
            if password.is_empty() {
                return Err(EstateError::Config("empty password not allowed".into()));
            }
            Ok(CredentialRecord::from_credentials(email, password))
        }
        MethodArg::Cookies => {
            let path = cookies_file.ok_or_else(|| {
                EstateError::Config("--cookies-file is required for the cookies method".into())
            })?;
            let cookies = std::fs::read_to_string(&path).map_err(|e| {
                EstateError::Config(format!("cannot read {}: {e}", path.display()))
            })?;
            Ok(CredentialRecord::from_cookies(cookies.trim()))
        }
    }
}

/// Run the `estateflow verify` command: a diagnostic login check with the
/// stored credentials.
pub async fn verify(config: EstateConfig) -> Result<(), EstateError> {
    let vault = open_vault(&config).await?;

    if !vault.has_vault().await? {
        println!("No credentials stored. Run `estateflow vault set` first.");
        return Ok(());
    }

    let passphrase = get_vault_passphrase()?;
    let record = vault
        .load_credentials(&passphrase)
        .await?
        .ok_or_else(|| EstateError::Internal("vault emptied mid-command".into()))?;

    let client = AirtopClient::new(&config.airtop)?;
    println!("Verifying Facebook login via cloud browser...");
    let result = client.verify_facebook_auth(&record).await;

    if result.success {
        println!("Login verified.");
    } else {
        let reason = result.reason.unwrap_or(AuthFailureReason::NetworkError);
        println!("{}: {}", reason.title(), reason.remediation());
        if let Some(message) = result.message {
            println!("  {message}");
        }
    }

    Ok(())
}
