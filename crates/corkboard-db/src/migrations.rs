use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    // created_at is assigned here, in the store, at insert time — client
    // clocks never touch sort order. Millisecond precision keeps insertion
    // order and timestamp order aligned.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS found_items (
            id              TEXT PRIMARY KEY,
            description     TEXT NOT NULL,
            contact_info    TEXT NOT NULL,
            location_found  TEXT NOT NULL,
            image_url       TEXT,
            image_file_name TEXT,
            tags            TEXT NOT NULL DEFAULT '[]',
            categories      TEXT NOT NULL DEFAULT '[]',
            reported        INTEGER NOT NULL DEFAULT 0,
            report_reason   TEXT,
            resolved        INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        );

        CREATE INDEX IF NOT EXISTS idx_found_items_created
            ON found_items(created_at);

        CREATE TABLE IF NOT EXISTS lost_items (
            id                 TEXT PRIMARY KEY,
            description        TEXT NOT NULL,
            contact_info       TEXT NOT NULL,
            last_seen_location TEXT NOT NULL,
            last_seen_date     TEXT NOT NULL,
            tags               TEXT NOT NULL DEFAULT '[]',
            categories         TEXT NOT NULL DEFAULT '[]',
            reported           INTEGER NOT NULL DEFAULT 0,
            report_reason      TEXT,
            resolved           INTEGER NOT NULL DEFAULT 0,
            created_at         TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        );

        CREATE INDEX IF NOT EXISTS idx_lost_items_created
            ON lost_items(created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
