// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content extraction for the EstateFlow agent.
//!
//! Turns free-form property messages (text, photos) into structured
//! listing fields via the Gemini API, and builds the automation scripts
//! the cloud browser executes for publishing and auto-replies.

pub mod client;
pub mod scripts;
pub mod types;

pub use client::GeminiClient;
pub use scripts::{marketplace_script, messenger_script, page_post_script, with_login};
pub use types::ListingAnalysis;
