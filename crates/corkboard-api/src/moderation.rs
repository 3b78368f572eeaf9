use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use corkboard_db::queries::ReportOutcome;
use corkboard_types::api::ReportItemRequest;
use corkboard_types::models::Collection;
use corkboard_types::validation;

use crate::{AppState, action_failure, action_success, publish_snapshot, validation_failure};

/// One-way transition to resolved. Re-invoking on an already-resolved item
/// is a no-op in outcome.
pub async fn resolve_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(Collection, Uuid)>,
) -> Response {
    let db = state.db.clone();
    let found = match tokio::task::spawn_blocking(move || {
        db.mark_resolved(collection, &id.to_string())
    })
    .await
    {
        Ok(Ok(found)) => found,
        Ok(Err(e)) => {
            error!("Error marking item as resolved: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to update item status: {}", e),
            );
        }
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update item status: internal error".into(),
            );
        }
    };

    if !found {
        return action_failure(
            StatusCode::NOT_FOUND,
            "Failed to update item status: item not found".into(),
        );
    }

    state.dashboard.invalidate().await;
    publish_snapshot(&state, collection).await;

    action_success(StatusCode::OK, "Item status updated successfully.")
}

/// Report an item with a reason. The reason is required and a second report
/// is refused so the first reason survives.
pub async fn report_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(Collection, Uuid)>,
    Json(req): Json<ReportItemRequest>,
) -> Response {
    if let Err(errors) = validation::validate_report_reason(&req.reason) {
        return validation_failure(errors);
    }

    let db = state.db.clone();
    let reason = req.reason.clone();
    let outcome = match tokio::task::spawn_blocking(move || {
        db.report_item(collection, &id.to_string(), &reason)
    })
    .await
    {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            error!("Error reporting item: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to report item: {}", e),
            );
        }
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to report item: internal error".into(),
            );
        }
    };

    match outcome {
        ReportOutcome::Reported => {
            state.dashboard.invalidate().await;
            publish_snapshot(&state, collection).await;
            action_success(StatusCode::OK, "Item reported. Thank you for your feedback.")
        }
        ReportOutcome::AlreadyReported => action_failure(
            StatusCode::CONFLICT,
            "Failed to report item: item was already reported".into(),
        ),
        ReportOutcome::NotFound => action_failure(
            StatusCode::NOT_FOUND,
            "Failed to report item: item not found".into(),
        ),
    }
}
