// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram ingestion for the EstateFlow agent.
//!
//! Leads arrive as messages (text or photo + caption) in a Telegram chat.
//! This crate wraps the slice of the Bot API the agent needs: fetch
//! pending updates, send a reply, and download photos for analysis.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{PhotoSize, TgMessage, Update};
