// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of free-text verification output.
//!
//! The cloud browser is asked to answer with a tagged JSON verdict
//! (`{"status": "...", "details": "..."}`). [`StructuredParser`] handles
//! that schema, including verdicts embedded in surrounding prose.
//! [`KeywordParser`] is the legacy shim: a bare substring match over the
//! marker vocabulary the old dashboard used. Both sit behind
//! [`AuthSignalParser`] so the shim can be deleted without touching the
//! client or the vault.
//!
//! Classification is best-effort by nature -- it interprets free-form LLM
//! output standing in for a structured status code.

use estateflow_core::{AuthFailureReason, AuthVerification};
use serde::Deserialize;

/// Verdict vocabulary shared with the remote diagnostic prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum VerdictStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "WRONG_PASSWORD")]
    WrongPassword,
    #[serde(rename = "2FA_REQUIRED")]
    TwoFactorRequired,
    #[serde(rename = "LOCKED")]
    Locked,
    #[serde(rename = "EXPIRED")]
    Expired,
    #[serde(rename = "CHALLENGE")]
    Challenge,
}

impl VerdictStatus {
    /// Maps a verdict onto the failure taxonomy. `None` means success.
    pub fn failure_reason(&self) -> Option<AuthFailureReason> {
        match self {
            VerdictStatus::Success => None,
            VerdictStatus::WrongPassword => Some(AuthFailureReason::WrongCredentials),
            VerdictStatus::TwoFactorRequired => Some(AuthFailureReason::TwoFactorRequired),
            VerdictStatus::Locked => Some(AuthFailureReason::AccountLocked),
            VerdictStatus::Expired => Some(AuthFailureReason::CookiesExpired),
            VerdictStatus::Challenge => Some(AuthFailureReason::ChallengeRequired),
        }
    }

    /// Fixed user-facing message for this verdict.
    pub fn user_message(&self) -> &'static str {
        match self {
            VerdictStatus::Success => "Login verified.",
            VerdictStatus::WrongPassword => "The email or password provided is incorrect.",
            VerdictStatus::TwoFactorRequired => {
                "Facebook is requesting a 2FA code. Please disable 2FA or use session cookies."
            }
            VerdictStatus::Locked => {
                "This Facebook account has been temporarily locked by Meta security."
            }
            VerdictStatus::Expired => {
                "The session cookies provided have expired or are invalid."
            }
            VerdictStatus::Challenge => {
                "Facebook raised a security challenge that needs manual approval."
            }
        }
    }
}

/// A parsed verdict, with optional free-text detail from the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthVerdict {
    pub status: VerdictStatus,
    pub details: Option<String>,
}

/// Seam between the verification flow and the output interpretation.
pub trait AuthSignalParser: Send + Sync {
    /// Extracts a verdict from raw output, or `None` if no recognizable
    /// signal is present.
    fn parse(&self, output: &str) -> Option<AuthVerdict>;
}

/// Wire shape of the structured verdict.
#[derive(Debug, Deserialize)]
struct WireVerdict {
    status: VerdictStatus,
    #[serde(default)]
    details: Option<String>,
}

impl From<WireVerdict> for AuthVerdict {
    fn from(wire: WireVerdict) -> Self {
        AuthVerdict {
            status: wire.status,
            details: wire.details,
        }
    }
}

/// Strict parser for the tagged JSON verdict, the preferred contract.
///
/// Accepts the whole output as JSON, or the first balanced JSON object
/// found inside prose (models tend to wrap the verdict in commentary).
pub struct StructuredParser;

impl AuthSignalParser for StructuredParser {
    fn parse(&self, output: &str) -> Option<AuthVerdict> {
        let trimmed = output.trim();
        if let Ok(wire) = serde_json::from_str::<WireVerdict>(trimmed) {
            return Some(wire.into());
        }

        for candidate in json_object_candidates(trimmed) {
            if let Ok(wire) = serde_json::from_str::<WireVerdict>(candidate) {
                return Some(wire.into());
            }
        }

        None
    }
}

/// Yields balanced `{...}` substrings in order of appearance.
///
/// Brace counting ignores string escapes -- good enough for verdict
/// extraction, consistent with the best-effort nature of this module.
fn json_object_candidates(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();
    let mut start = None;
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0
                        && let Some(s) = start.take()
                    {
                        candidates.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    candidates.into_iter()
}

/// Legacy substring-marker shim, kept for outputs that predate the
/// structured contract. First marker wins, in the original precedence.
pub struct KeywordParser;

const KEYWORD_MARKERS: [(&str, VerdictStatus); 6] = [
    ("SUCCESS", VerdictStatus::Success),
    ("WRONG_PASSWORD", VerdictStatus::WrongPassword),
    ("2FA_REQUIRED", VerdictStatus::TwoFactorRequired),
    ("LOCKED", VerdictStatus::Locked),
    ("EXPIRED", VerdictStatus::Expired),
    ("CHALLENGE", VerdictStatus::Challenge),
];

impl AuthSignalParser for KeywordParser {
    fn parse(&self, output: &str) -> Option<AuthVerdict> {
        for (marker, status) in KEYWORD_MARKERS {
            if output.contains(marker) {
                return Some(AuthVerdict {
                    status,
                    details: None,
                });
            }
        }
        None
    }
}

/// Classifies raw verification output into a verification result.
///
/// The structured parser runs first; the keyword shim only sees output the
/// schema could not be found in. When neither yields a verdict the policy
/// is explicit: by default a reachable session counts as success (legacy
/// behavior); with `require_explicit_success` the absence of a marker is an
/// unknown-state failure.
pub fn classify_output(output: &str, require_explicit_success: bool) -> AuthVerification {
    let verdict = StructuredParser
        .parse(output)
        .or_else(|| KeywordParser.parse(output));

    match verdict {
        Some(v) => match v.status.failure_reason() {
            None => AuthVerification::ok(),
            Some(reason) => {
                let message = v
                    .details
                    .unwrap_or_else(|| v.status.user_message().to_string());
                AuthVerification::failed(reason, message)
            }
        },
        None if require_explicit_success => AuthVerification::failed(
            AuthFailureReason::UnknownState,
            AuthFailureReason::UnknownState.remediation(),
        ),
        None => AuthVerification::ok(),
    }
}
