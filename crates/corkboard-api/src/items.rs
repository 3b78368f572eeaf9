use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::error;

use corkboard_types::filter::filter_items;
use corkboard_types::models::{CATEGORIES, Collection, Item};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

pub async fn get_found_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Item>>, StatusCode> {
    list_collection(state, Collection::FoundItems, query).await
}

pub async fn get_lost_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Item>>, StatusCode> {
    list_collection(state, Collection::LostItems, query).await
}

/// Ordered listing, newest first, narrowed by the same matching rules the
/// gateway applies.
async fn list_collection(
    state: AppState,
    collection: Collection,
    query: ListQuery,
) -> Result<Json<Vec<Item>>, StatusCode> {
    let db = state.db.clone();
    let items = tokio::task::spawn_blocking(move || db.snapshot(collection))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("Listing {} failed: {}", collection, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let search = query.search.unwrap_or_default();
    let category = query.category.unwrap_or_else(|| "all".into());
    Ok(Json(filter_items(&items, &search, &category)))
}

pub async fn get_categories() -> Json<Vec<&'static str>> {
    Json(CATEGORIES.to_vec())
}
