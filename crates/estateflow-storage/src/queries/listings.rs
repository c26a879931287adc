// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing CRUD operations.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use estateflow_core::{EstateError, Listing, ListingSource, ListingStatus};
use rusqlite::params;

use crate::database::Database;

fn row_to_listing(row: &rusqlite::Row<'_>) -> Result<Listing, rusqlite::Error> {
    let status: String = row.get(8)?;
    let source: String = row.get(9)?;
    let created_at: String = row.get(10)?;
    Ok(Listing {
        id: row.get(0)?,
        title: row.get(1)?,
        price: row.get(2)?,
        location: row.get(3)?,
        description: row.get(4)?,
        beds: row.get(5)?,
        baths: row.get(6)?,
        sqft: row.get(7)?,
        status: ListingStatus::from_str(&status).unwrap_or(ListingStatus::Draft),
        source: ListingSource::from_str(&source).unwrap_or(ListingSource::Manual),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default(),
    })
}

const LISTING_COLUMNS: &str =
    "id, title, price, location, description, beds, baths, sqft, status, source, created_at";

/// Insert a new listing.
pub async fn insert(db: &Database, listing: &Listing) -> Result<(), EstateError> {
    let listing = listing.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO listings
                 (id, title, price, location, description, beds, baths, sqft, status, source, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    listing.id,
                    listing.title,
                    listing.price,
                    listing.location,
                    listing.description,
                    listing.beds,
                    listing.baths,
                    listing.sqft,
                    listing.status.to_string(),
                    listing.source.to_string(),
                    listing.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a listing by id.
pub async fn get(db: &Database, id: &str) -> Result<Option<Listing>, EstateError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Listing>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_listing);
            match result {
                Ok(listing) => Ok(Some(listing)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List listings, newest first.
pub async fn list(db: &Database, limit: Option<i64>) -> Result<Vec<Listing>, EstateError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Listing>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LISTING_COLUMNS} FROM listings
                 ORDER BY created_at DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit.unwrap_or(-1)], row_to_listing)?;
            let mut listings = Vec::new();
            for row in rows {
                listings.push(row?);
            }
            Ok(listings)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a listing's publication status.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: ListingStatus,
) -> Result<(), EstateError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE listings SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use estateflow_core::PropertyDetails;
    use tempfile::tempdir;

    async fn open_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("listings_test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn sample_listing(title: &str) -> Listing {
        Listing::draft(
            &PropertyDetails {
                title: title.into(),
                price: 320_000.0,
                location: "Puchong".into(),
                description: "Renovated".into(),
                beds: Some(3),
                baths: Some(2),
                sqft: None,
            },
            ListingSource::Telegram,
        )
    }

    #[tokio::test]
    async fn insert_then_get_roundtrips() {
        let (db, _dir) = open_test_db().await;
        let listing = sample_listing("Vista Apartment");
        insert(&db, &listing).await.unwrap();

        let loaded = get(&db, &listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Vista Apartment");
        assert_eq!(loaded.status, ListingStatus::Draft);
        assert_eq!(loaded.beds, Some(3));
        assert_eq!(loaded.sqft, None);
    }

    #[tokio::test]
    async fn get_missing_listing_returns_none() {
        let (db, _dir) = open_test_db().await;
        assert!(get(&db, "no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let (db, _dir) = open_test_db().await;
        let mut older = sample_listing("Older");
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = sample_listing("Newer");
        insert(&db, &older).await.unwrap();
        insert(&db, &newer).await.unwrap();

        let listings = list(&db, None).await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].title, "Newer");
        assert_eq!(listings[1].title, "Older");
    }

    #[tokio::test]
    async fn update_status_transitions() {
        let (db, _dir) = open_test_db().await;
        let listing = sample_listing("Townhouse");
        insert(&db, &listing).await.unwrap();

        update_status(&db, &listing.id, ListingStatus::Publishing)
            .await
            .unwrap();
        update_status(&db, &listing.id, ListingStatus::Active)
            .await
            .unwrap();

        let loaded = get(&db, &listing.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, ListingStatus::Active);
    }
}
