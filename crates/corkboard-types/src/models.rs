use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category vocabulary offered by the list filters. Items are created with an
/// empty category set; auto-categorization is a future feature.
pub const CATEGORIES: &[&str] = &["Electronics", "Books", "Clothing", "Accessories", "Other"];

/// The two bulletin collections. They share no id space; an item lives in
/// exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    #[serde(rename = "foundItems")]
    FoundItems,
    #[serde(rename = "lostItems")]
    LostItems,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoundItems => "foundItems",
            Self::LostItems => "lostItems",
        }
    }

    /// SQLite table backing this collection.
    pub fn table(&self) -> &'static str {
        match self {
            Self::FoundItems => "found_items",
            Self::LostItems => "lost_items",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by both item kinds. Write-once at creation except for the
/// two moderation fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCore {
    pub id: Uuid,
    pub description: String,
    pub contact_info: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Assigned by the store at insert; authoritative for sort order.
    pub created_at: DateTime<Utc>,
    pub reported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_reason: Option<String>,
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundItem {
    #[serde(flatten)]
    pub core: ItemCore,
    pub location_found: String,
    /// Present only when a photo was attached at submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostItem {
    #[serde(flatten)]
    pub core: ItemCore,
    pub last_seen_location: String,
    pub last_seen_date: NaiveDate,
}

/// A bulletin post. The kinds share the core fields but carry their own
/// location/photo data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Item {
    Found(FoundItem),
    Lost(LostItem),
}

impl Item {
    pub fn core(&self) -> &ItemCore {
        match self {
            Self::Found(item) => &item.core,
            Self::Lost(item) => &item.core,
        }
    }

    pub fn id(&self) -> Uuid {
        self.core().id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.core().created_at
    }

    pub fn collection(&self) -> Collection {
        match self {
            Self::Found(_) => Collection::FoundItems,
            Self::Lost(_) => Collection::LostItems,
        }
    }
}
