// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the EstateFlow agent.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, the key-value
//! substrate the credential vault sits on, and typed CRUD for listings.

pub mod database;
pub mod kv_store;
pub mod migrations;
pub mod queries;

pub use database::Database;
pub use kv_store::SqliteKvStore;
