// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent loop for the EstateFlow lead-automation pipeline.
//!
//! The [`Pipeline`] is the central coordinator that:
//! - Polls Telegram for new property messages
//! - Runs content extraction on text and photos
//! - Persists listings and sends auto-replies
//! - Publishes listings through the cloud browser
//! - Reports progress on the automation log bus

pub mod pipeline;

pub use pipeline::Pipeline;
