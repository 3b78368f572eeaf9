use axum::{Json, extract::State, http::StatusCode, response::Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::{error, warn};
use uuid::Uuid;

use corkboard_types::api::{SubmitFoundItemRequest, SubmitLostItemRequest};
use corkboard_types::models::Collection;
use corkboard_types::validation::{self, FieldError, MAX_PHOTO_BYTES};

use crate::{AppState, action_failure, action_success, publish_snapshot, validation_failure};

/// Found-item submission: validate, store the photo (if any), then write the
/// document. A failed upload aborts before anything reaches the store.
pub async fn submit_found_item(
    State(state): State<AppState>,
    Json(req): Json<SubmitFoundItemRequest>,
) -> Response {
    if let Err(errors) = validation::validate_found_item(&req) {
        return validation_failure(errors);
    }

    let mut image_url: Option<String> = None;
    let mut image_file_name: Option<String> = None;
    if let Some(photo) = &req.photo {
        let data = match B64.decode(&photo.data) {
            Ok(data) => data,
            Err(_) => {
                return validation_failure(vec![FieldError {
                    field: "photo",
                    message: "Photo payload is not valid base64.".into(),
                }]);
            }
        };
        // The pre-decode estimate can undershoot; re-check the real size.
        if data.len() > MAX_PHOTO_BYTES {
            return validation_failure(vec![FieldError {
                field: "photo",
                message: "Max image size is 5MB.".into(),
            }]);
        }

        match state.photos.store_found_item_photo(&photo.file_name, &data).await {
            Ok((name, url)) => {
                image_file_name = Some(name);
                image_url = Some(url);
            }
            Err(e) => {
                error!("Error submitting found item: {}", e);
                return action_failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to submit found item: {}", e),
                );
            }
        }
    }

    let id = Uuid::new_v4();
    let db = state.db.clone();
    let url = image_url.clone();
    let file_name = image_file_name.clone();
    let insert = tokio::task::spawn_blocking(move || {
        db.insert_found_item(
            &id.to_string(),
            &req.description,
            &req.contact_info,
            &req.location_found,
            url.as_deref(),
            file_name.as_deref(),
        )
    })
    .await;

    match insert {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            if let Some(name) = &image_file_name {
                // The stored object is now orphaned; left in place.
                warn!("Photo object {} has no document after failed insert", name);
            }
            error!("Error submitting found item: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to submit found item: {}", e),
            );
        }
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to submit found item: internal error".into(),
            );
        }
    }

    state.dashboard.invalidate().await;
    publish_snapshot(&state, Collection::FoundItems).await;

    action_success(StatusCode::CREATED, "Found item submitted successfully!")
}

pub async fn submit_lost_item(
    State(state): State<AppState>,
    Json(req): Json<SubmitLostItemRequest>,
) -> Response {
    if let Err(errors) = validation::validate_lost_item(&req) {
        return validation_failure(errors);
    }

    let id = Uuid::new_v4();
    let db = state.db.clone();
    let insert = tokio::task::spawn_blocking(move || {
        db.insert_lost_item(
            &id.to_string(),
            &req.description,
            &req.contact_info,
            &req.last_seen_location,
            req.last_seen_date,
        )
    })
    .await;

    match insert {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("Error posting lost item: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to post lost item: {}", e),
            );
        }
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            return action_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to post lost item: internal error".into(),
            );
        }
    }

    state.dashboard.invalidate().await;
    publish_snapshot(&state, Collection::LostItems).await;

    action_success(StatusCode::CREATED, "Lost item posted successfully!")
}
