// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the EstateFlow agent.
//!
//! Provides the error taxonomy, domain types, the key-value storage seam
//! the vault builds on, and the automation log bus. All other workspace
//! crates depend on this one.

pub mod bus;
pub mod error;
pub mod kv;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use bus::{AutomationLog, LogBus, LogLevel, LogModule, LogSubscription};
pub use error::EstateError;
pub use kv::KeyValueStore;
pub use types::{
    AuthFailureReason, AuthMethod, AuthVerification, AutomationSession, CredentialRecord,
    Listing, ListingSource, ListingStatus, PropertyDetails, SessionStatus,
};
