use crate::Database;
use crate::models::{FoundItemRow, LostItemRow};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use corkboard_types::models::{Collection, Item};

/// Outcome of a report mutation. The store refuses a second report so an
/// earlier reason is never silently overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Reported,
    AlreadyReported,
    NotFound,
}

impl Database {
    // -- Inserts --

    pub fn insert_found_item(
        &self,
        id: &str,
        description: &str,
        contact_info: &str,
        location_found: &str,
        image_url: Option<&str>,
        image_file_name: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO found_items (id, description, contact_info, location_found, image_url, image_file_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, description, contact_info, location_found, image_url, image_file_name],
            )?;
            Ok(())
        })
    }

    pub fn insert_lost_item(
        &self,
        id: &str,
        description: &str,
        contact_info: &str,
        last_seen_location: &str,
        last_seen_date: NaiveDate,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO lost_items (id, description, contact_info, last_seen_location, last_seen_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    id,
                    description,
                    contact_info,
                    last_seen_location,
                    last_seen_date.to_string()
                ],
            )?;
            Ok(())
        })
    }

    // -- Snapshots --

    /// Full ordered state of a collection, newest first. Ties on created_at
    /// fall back to insertion order.
    pub fn snapshot(&self, collection: Collection) -> Result<Vec<Item>> {
        match collection {
            Collection::FoundItems => self.with_conn(|conn| {
                Ok(query_found_items(conn)?
                    .into_iter()
                    .map(FoundItemRow::into_item)
                    .collect())
            }),
            Collection::LostItems => self.with_conn(|conn| {
                Ok(query_lost_items(conn)?
                    .into_iter()
                    .map(LostItemRow::into_item)
                    .collect())
            }),
        }
    }

    // -- Moderation --

    /// Blind set: re-resolving an already-resolved item is a no-op in
    /// outcome. Returns false when no such item exists.
    pub fn mark_resolved(&self, collection: Collection, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                &format!("UPDATE {} SET resolved = 1 WHERE id = ?1", collection.table()),
                [id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Guarded set: only an unreported item accepts a report.
    pub fn report_item(&self, collection: Collection, id: &str, reason: &str) -> Result<ReportOutcome> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                &format!(
                    "UPDATE {} SET reported = 1, report_reason = ?2 WHERE id = ?1 AND reported = 0",
                    collection.table()
                ),
                rusqlite::params![id, reason],
            )?;
            if changed > 0 {
                return Ok(ReportOutcome::Reported);
            }

            let exists: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE id = ?1", collection.table()),
                [id],
                |row| row.get(0),
            )?;
            Ok(if exists > 0 {
                ReportOutcome::AlreadyReported
            } else {
                ReportOutcome::NotFound
            })
        })
    }

    // -- Stats --

    /// (total, unresolved, reported) counts for the dashboard.
    pub fn collection_stats(&self, collection: Collection) -> Result<(u64, u64, u64)> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                &format!(
                    "SELECT COUNT(*),
                            COALESCE(SUM(resolved = 0), 0),
                            COALESCE(SUM(reported = 1), 0)
                     FROM {}",
                    collection.table()
                ),
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)? as u64,
                        row.get::<_, i64>(1)? as u64,
                        row.get::<_, i64>(2)? as u64,
                    ))
                },
            )?;
            Ok(stats)
        })
    }
}

fn query_found_items(conn: &Connection) -> Result<Vec<FoundItemRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, contact_info, location_found, image_url, image_file_name,
                tags, categories, reported, report_reason, resolved, created_at
         FROM found_items
         ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(FoundItemRow {
                id: row.get(0)?,
                description: row.get(1)?,
                contact_info: row.get(2)?,
                location_found: row.get(3)?,
                image_url: row.get(4)?,
                image_file_name: row.get(5)?,
                tags: row.get(6)?,
                categories: row.get(7)?,
                reported: row.get(8)?,
                report_reason: row.get(9)?,
                resolved: row.get(10)?,
                created_at: row.get(11)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_lost_items(conn: &Connection) -> Result<Vec<LostItemRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, contact_info, last_seen_location, last_seen_date,
                tags, categories, reported, report_reason, resolved, created_at
         FROM lost_items
         ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(LostItemRow {
                id: row.get(0)?,
                description: row.get(1)?,
                contact_info: row.get(2)?,
                last_seen_location: row.get(3)?,
                last_seen_date: row.get(4)?,
                tags: row.get(5)?,
                categories: row.get(6)?,
                reported: row.get(7)?,
                report_reason: row.get(8)?,
                resolved: row.get(9)?,
                created_at: row.get(10)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
