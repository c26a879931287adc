// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value operations over the `kv_store` table.

use estateflow_core::EstateError;
use rusqlite::params;

use crate::database::Database;

/// Get the value at `key`, or `None` if absent.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, EstateError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
            let result = stmt.query_row(params![key], |row| row.get(0));
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write `value` at `key`. Last write wins.
pub async fn set(db: &Database, key: &str, value: &str) -> Result<(), EstateError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete `key`. Deleting an absent key succeeds.
pub async fn delete(db: &Database, key: &str) -> Result<(), EstateError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
