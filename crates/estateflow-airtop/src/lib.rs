// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud-browser automation client for the EstateFlow agent.
//!
//! Talks to the Airtop API through a rotating relay list with exponential
//! backoff, opens ephemeral sessions, verifies Facebook credentials via a
//! diagnostic run, and drives listing publication. Authentication failures
//! are classified into a closed reason taxonomy the dashboard renders
//! directly.

pub mod classify;
pub mod client;
pub mod publish;
pub mod relay;
pub mod verify;

pub use classify::{AuthSignalParser, AuthVerdict, KeywordParser, StructuredParser, VerdictStatus};
pub use client::{AirtopClient, PromptOutput};
pub use relay::RelayRotation;
