use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

// -- Submissions --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitFoundItemRequest {
    pub description: String,
    pub location_found: String,
    pub contact_info: String,
    #[serde(default)]
    pub photo: Option<PhotoUpload>,
}

/// A photo attached to a found-item submission, carried inline as base64.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    /// Base64-encoded file contents.
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitLostItemRequest {
    pub description: String,
    pub last_seen_location: String,
    pub last_seen_date: NaiveDate,
    pub contact_info: String,
}

// -- Moderation --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportItemRequest {
    pub reason: String,
}

// -- Responses --

/// Uniform outcome shape for every mutating endpoint, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Validation failures carry the failed fields instead of a single message,
/// so they can be shown inline next to the inputs.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
    pub success: bool,
    pub errors: Vec<FieldError>,
}

// -- Dashboard --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total: u64,
    pub unresolved: u64,
    pub reported: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub found_items: CollectionStats,
    pub lost_items: CollectionStats,
}
