//! Database row types — these map directly to SQLite rows. The conversion
//! into the shared domain `Item` also lives here, so the API and the gateway
//! normalize timestamps identically.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use corkboard_types::models::{FoundItem, Item, ItemCore, LostItem};

pub struct FoundItemRow {
    pub id: String,
    pub description: String,
    pub contact_info: String,
    pub location_found: String,
    pub image_url: Option<String>,
    pub image_file_name: Option<String>,
    pub tags: String,
    pub categories: String,
    pub reported: bool,
    pub report_reason: Option<String>,
    pub resolved: bool,
    pub created_at: String,
}

pub struct LostItemRow {
    pub id: String,
    pub description: String,
    pub contact_info: String,
    pub last_seen_location: String,
    pub last_seen_date: String,
    pub tags: String,
    pub categories: String,
    pub reported: bool,
    pub report_reason: Option<String>,
    pub resolved: bool,
    pub created_at: String,
}

impl FoundItemRow {
    pub fn into_item(self) -> Item {
        Item::Found(FoundItem {
            core: build_core(
                &self.id,
                self.description,
                self.contact_info,
                &self.tags,
                &self.categories,
                self.reported,
                self.report_reason,
                self.resolved,
                &self.created_at,
            ),
            location_found: self.location_found,
            image_url: self.image_url,
            image_file_name: self.image_file_name,
        })
    }
}

impl LostItemRow {
    pub fn into_item(self) -> Item {
        Item::Lost(LostItem {
            core: build_core(
                &self.id,
                self.description,
                self.contact_info,
                &self.tags,
                &self.categories,
                self.reported,
                self.report_reason,
                self.resolved,
                &self.created_at,
            ),
            last_seen_location: self.last_seen_location,
            last_seen_date: parse_date(&self.last_seen_date, &self.id),
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn build_core(
    id: &str,
    description: String,
    contact_info: String,
    tags: &str,
    categories: &str,
    reported: bool,
    report_reason: Option<String>,
    resolved: bool,
    created_at: &str,
) -> ItemCore {
    ItemCore {
        id: id.parse().unwrap_or_else(|e| {
            warn!("Corrupt item id '{}': {}", id, e);
            Uuid::default()
        }),
        description,
        contact_info,
        tags: parse_string_list(tags, id, "tags"),
        categories: parse_string_list(categories, id, "categories"),
        created_at: parse_timestamp(created_at, id),
        reported,
        report_reason,
        resolved,
    }
}

/// A missing or mangled timestamp becomes "now" rather than sinking the whole
/// snapshot.
pub fn parse_timestamp(raw: &str, item_id: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's plain datetime('now') format has no timezone.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on item '{}': {}", raw, item_id, e);
            Utc::now()
        })
}

fn parse_date(raw: &str, item_id: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|e| {
        warn!("Corrupt last_seen_date '{}' on item '{}': {}", raw, item_id, e);
        Utc::now().date_naive()
    })
}

fn parse_string_list(raw: &str, item_id: &str, column: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on item '{}': {}", column, raw, item_id, e);
        Vec::new()
    })
}
