// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the EstateFlow workspace.
//!
//! `CredentialRecord` serializes with the same field names the legacy
//! dashboard wrote (`authMethod`, `isSet`, ...) so vault blobs created by
//! either implementation stay interchangeable.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the Facebook account is authenticated during automation runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthMethod {
    /// Email + password login.
    Credentials,
    /// Exported session cookies.
    Cookies,
}

/// The secret record protected by the credential vault.
///
/// Exactly one of the two credential shapes is meaningful depending on
/// `auth_method`; the other fields are left `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub auth_method: AuthMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Serialized session-cookie list (opaque JSON string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    pub is_set: bool,
}

impl CredentialRecord {
    /// Builds a password-based record.
    pub fn from_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            auth_method: AuthMethod::Credentials,
            email: Some(email.into()),
            password: Some(password.into()),
            cookies: None,
            is_set: true,
        }
    }

    /// Builds a cookie-based record from an exported cookie JSON string.
    pub fn from_cookies(cookies: impl Into<String>) -> Self {
        Self {
            auth_method: AuthMethod::Cookies,
            email: None,
            password: None,
            cookies: Some(cookies.into()),
            is_set: true,
        }
    }

    /// An empty placeholder record (nothing configured yet).
    pub fn unset() -> Self {
        Self {
            auth_method: AuthMethod::Credentials,
            email: None,
            password: None,
            cookies: None,
            is_set: false,
        }
    }
}

/// Closed enumeration of authentication-failure outcomes from a
/// verification attempt. Returned as data, never raised as an error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthFailureReason {
    /// The automation API key itself was rejected (401/403).
    InvalidApiKey,
    /// Facebook rejected the email/password pair.
    WrongCredentials,
    /// Facebook is demanding a two-factor code.
    TwoFactorRequired,
    /// Facebook raised a security challenge requiring manual action.
    ChallengeRequired,
    /// Meta locked the account.
    AccountLocked,
    /// The supplied session cookies are no longer valid.
    CookiesExpired,
    /// The cloud-browser session timed out.
    Timeout,
    /// The automation clusters were unreachable.
    NetworkError,
    /// The remote output carried no recognizable verdict. Only produced
    /// when strict verification is enabled.
    UnknownState,
}

impl AuthFailureReason {
    /// Short user-facing title for this failure.
    pub fn title(&self) -> &'static str {
        match self {
            AuthFailureReason::InvalidApiKey => "License Error",
            AuthFailureReason::WrongCredentials => "Auth Failed",
            AuthFailureReason::TwoFactorRequired => "2FA Block",
            AuthFailureReason::ChallengeRequired => "Security Check",
            AuthFailureReason::AccountLocked => "Account Locked",
            AuthFailureReason::CookiesExpired => "Session Expired",
            AuthFailureReason::Timeout => "Cloud Timeout",
            AuthFailureReason::NetworkError => "Network Error",
            AuthFailureReason::UnknownState => "Unclear Result",
        }
    }

    /// Fixed remediation hint shown alongside the title.
    pub fn remediation(&self) -> &'static str {
        match self {
            AuthFailureReason::InvalidApiKey => {
                "Airtop API key is invalid or expired. Check subscription."
            }
            AuthFailureReason::WrongCredentials => {
                "Facebook login invalid. Please check email/password."
            }
            AuthFailureReason::TwoFactorRequired => {
                "Facebook requires 2FA. Use 'Session Cookies' instead."
            }
            AuthFailureReason::ChallengeRequired => {
                "Manual verification required on your device first."
            }
            AuthFailureReason::AccountLocked => {
                "Meta has locked this account. Unlock manually in browser."
            }
            AuthFailureReason::CookiesExpired => {
                "Cookies no longer valid. Export fresh JSON cookies."
            }
            AuthFailureReason::Timeout => "Verification session timed out. Please retry.",
            AuthFailureReason::NetworkError => {
                "Unable to reach automation clusters. Check connection."
            }
            AuthFailureReason::UnknownState => {
                "The cloud browser gave no clear verdict. Retry or verify manually."
            }
        }
    }
}

/// Outcome of a credential verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthVerification {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<AuthFailureReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthVerification {
    pub fn ok() -> Self {
        Self {
            success: true,
            reason: None,
            message: None,
        }
    }

    pub fn failed(reason: AuthFailureReason, message: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason),
            message: Some(message.into()),
        }
    }
}

/// Lifecycle state of a remote cloud-browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

/// Ephemeral handle to a remote automation session. Referenced by id for
/// the duration of one automation task; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationSession {
    pub id: String,
    pub status: SessionStatus,
}

/// Structured fields extracted from an ingested property message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub title: String,
    pub price: f64,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baths: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u32>,
}

/// Publication state of a stored listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Draft,
    Publishing,
    Active,
    Sold,
}

/// Where a listing entered the system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingSource {
    Telegram,
    Manual,
}

/// A property listing tracked by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baths: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u32>,
    pub status: ListingStatus,
    pub source: ListingSource,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Listing {
    /// Creates a draft listing from extracted property details.
    pub fn draft(details: &PropertyDetails, source: ListingSource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: details.title.clone(),
            price: details.price,
            location: details.location.clone(),
            description: details.description.clone(),
            beds: details.beds,
            baths: details.baths,
            sqft: details.sqft,
            status: ListingStatus::Draft,
            source,
            created_at: chrono::Utc::now(),
        }
    }
}
