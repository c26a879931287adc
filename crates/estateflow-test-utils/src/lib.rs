// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for EstateFlow tests.

pub mod memory_kv;

pub use memory_kv::MemoryKvStore;
