// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay endpoint rotation.
//!
//! Each configured relay is a URL prefix; the target URL is appended
//! percent-encoded. Attempt N uses relay N modulo the rotation length, so
//! consecutive retries walk the list round-robin.

/// Fixed rotation of relay endpoints.
#[derive(Debug, Clone)]
pub struct RelayRotation {
    endpoints: Vec<String>,
}

impl RelayRotation {
    /// Builds a rotation. An empty list means requests go directly to the
    /// target with no relay wrapping.
    pub fn new(endpoints: Vec<String>) -> Self {
        Self { endpoints }
    }

    /// Number of relays in the rotation.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Wraps `target` for the given attempt index.
    pub fn wrap(&self, attempt: u32, target: &str) -> String {
        if self.endpoints.is_empty() {
            return target.to_string();
        }
        let relay = &self.endpoints[attempt as usize % self.endpoints.len()];
        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("{relay}{encoded}")
    }
}
