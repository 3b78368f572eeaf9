use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tokio::sync::RwLock;
use tracing::error;

use corkboard_db::Database;
use corkboard_types::api::{CollectionStats, DashboardStats};
use corkboard_types::models::Collection;

use crate::AppState;

/// Memoized dashboard counters. Every write path invalidates them; the next
/// read recomputes from the store.
#[derive(Default)]
pub struct DashboardCache {
    stats: RwLock<Option<DashboardStats>>,
}

impl DashboardCache {
    pub async fn invalidate(&self) {
        *self.stats.write().await = None;
    }

    pub async fn get_or_compute(&self, db: &Arc<Database>) -> anyhow::Result<DashboardStats> {
        if let Some(stats) = self.stats.read().await.clone() {
            return Ok(stats);
        }

        let db = db.clone();
        let stats = tokio::task::spawn_blocking(move || compute(&db)).await??;
        *self.stats.write().await = Some(stats.clone());
        Ok(stats)
    }
}

fn compute(db: &Database) -> anyhow::Result<DashboardStats> {
    let (found_total, found_unresolved, found_reported) =
        db.collection_stats(Collection::FoundItems)?;
    let (lost_total, lost_unresolved, lost_reported) =
        db.collection_stats(Collection::LostItems)?;

    Ok(DashboardStats {
        found_items: CollectionStats {
            total: found_total,
            unresolved: found_unresolved,
            reported: found_reported,
        },
        lost_items: CollectionStats {
            total: lost_total,
            unresolved: lost_unresolved,
            reported: lost_reported,
        },
    })
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, StatusCode> {
    state
        .dashboard
        .get_or_compute(&state.db)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Dashboard stats failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
