pub mod dashboard;
pub mod items;
pub mod moderation;
pub mod storage;
pub mod submit;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::error;

use corkboard_db::Database;
use corkboard_gateway::{connection, dispatcher::Dispatcher};
use corkboard_types::api::{ActionResponse, ValidationFailure};
use corkboard_types::models::Collection;
use corkboard_types::validation::FieldError;

use crate::dashboard::DashboardCache;
use crate::storage::PhotoStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub dispatcher: Dispatcher,
    pub photos: PhotoStore,
    pub dashboard: DashboardCache,
}

/// All JSON and gateway routes. The binary layers CORS, request tracing and
/// the static photo mount on top.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/found-items",
            get(items::get_found_items).post(submit::submit_found_item),
        )
        .route(
            "/lost-items",
            get(items::get_lost_items).post(submit::submit_lost_item),
        )
        .route("/{collection}/{id}/resolve", post(moderation::resolve_item))
        .route("/{collection}/{id}/report", post(moderation::report_item))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/categories", get(items::get_categories))
        .route("/gateway", get(gateway_upgrade))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn gateway_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        connection::handle_connection(socket, state.dispatcher.clone(), state.db.clone())
    })
}

/// Re-query a collection and push the fresh full snapshot to live
/// subscribers. Runs after the write committed, so snapshot order follows
/// store-apply order.
pub(crate) async fn publish_snapshot(state: &AppState, collection: Collection) {
    let db = state.db.clone();
    match tokio::task::spawn_blocking(move || db.snapshot(collection)).await {
        Ok(Ok(items)) => state.dispatcher.publish(collection, items),
        Ok(Err(e)) => error!("Snapshot reload for {} failed: {}", collection, e),
        Err(e) => error!("spawn_blocking join error: {}", e),
    }
}

// -- Response helpers --

pub(crate) fn action_success(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ActionResponse {
            success: true,
            message: message.into(),
        }),
    )
        .into_response()
}

pub(crate) fn action_failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ActionResponse {
            success: false,
            message,
        }),
    )
        .into_response()
}

pub(crate) fn validation_failure(errors: Vec<FieldError>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationFailure {
            success: false,
            errors,
        }),
    )
        .into_response()
}
