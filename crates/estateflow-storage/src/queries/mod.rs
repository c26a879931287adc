// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each module owns one table.

pub mod kv;
pub mod listings;
