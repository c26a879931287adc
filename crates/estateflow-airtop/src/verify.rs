// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential verification via a diagnostic cloud-browser run.
//!
//! Errors are caught at this boundary and translated into the failure
//! taxonomy -- callers receive a result value for every expected auth
//! failure and never a raw error.

use estateflow_core::{AuthFailureReason, AuthMethod, AuthVerification, CredentialRecord, EstateError};
use tracing::{info, warn};

use crate::classify;
use crate::client::AirtopClient;

impl AirtopClient {
    /// Performs a real diagnostic login check on Facebook.
    ///
    /// Opens a session, describes the login attempt to the cloud browser,
    /// and classifies the free-text answer. Flow errors map onto the
    /// taxonomy: a rejected API key keeps [`AuthFailureReason::InvalidApiKey`],
    /// a deadline hit becomes [`AuthFailureReason::Timeout`], everything
    /// else is [`AuthFailureReason::NetworkError`].
    pub async fn verify_facebook_auth(&self, creds: &CredentialRecord) -> AuthVerification {
        match self.run_diagnostic(creds).await {
            Ok(verification) => {
                info!(success = verification.success, "credential verification finished");
                verification
            }
            Err(EstateError::InvalidApiKey) => AuthVerification::failed(
                AuthFailureReason::InvalidApiKey,
                AuthFailureReason::InvalidApiKey.remediation(),
            ),
            Err(EstateError::Timeout { .. }) => AuthVerification::failed(
                AuthFailureReason::Timeout,
                "The cloud browser timed out while verifying Facebook.",
            ),
            Err(e) => {
                warn!(error = %e, "credential verification failed");
                AuthVerification::failed(AuthFailureReason::NetworkError, e.to_string())
            }
        }
    }

    async fn run_diagnostic(
        &self,
        creds: &CredentialRecord,
    ) -> Result<AuthVerification, EstateError> {
        let session = self.create_session().await?;
        let prompt = diagnostic_prompt(creds);
        let output = self.submit_prompt(&session.id, &prompt).await?;
        Ok(classify::classify_output(
            &output.output,
            self.require_explicit_success,
        ))
    }
}

/// Builds the diagnostic instruction for a login attempt.
fn diagnostic_prompt(creds: &CredentialRecord) -> String {
    let login_step = match creds.auth_method {
        AuthMethod::Cookies => format!(
            "Set session cookies: {}",
            creds.cookies.as_deref().unwrap_or_default()
        ),
        AuthMethod::Credentials => format!(
            "Attempt login with email {} and password {}",
            creds.email.as_deref().unwrap_or_default(),
            creds.password.as_deref().unwrap_or_default()
        ),
    };

    format!(
        "1. Navigate to https://www.facebook.com.\n\
         2. {login_step}\n\
         3. Determine the current state of the page.\n\
         4. Return a JSON object:\n\
            {{\"status\": \"SUCCESS\" | \"WRONG_PASSWORD\" | \"2FA_REQUIRED\" | \"LOCKED\" | \"EXPIRED\" | \"CHALLENGE\", \"details\": \"string description\"}}"
    )
}
