// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value storage seam.
//!
//! The credential vault depends only on get/set/delete-by-key semantics;
//! the persistence medium (SQLite, in-memory) is the implementor's concern.

use async_trait::async_trait;

use crate::error::EstateError;

/// A string-keyed, string-valued store with last-write-wins semantics.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value at `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, EstateError>;

    /// Writes `value` at `key`, replacing any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<(), EstateError>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), EstateError>;
}
