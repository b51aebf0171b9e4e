use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use serde::Deserialize;
use shared::AutoSaveRequest;
use tracing::info;

use crate::store::{ResultStore, StoreError};

/// Application state shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ResultStore,
}

impl AppState {
    pub fn new(store: ResultStore) -> Self {
        Self { store }
    }
}

impl StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::ResultNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Log line forwarded by the frontend
#[derive(Deserialize, Debug)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

/// Axum handler function for GET /api/lotteries
pub async fn list_lotteries(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/lotteries");
    (StatusCode::OK, Json(state.store.lotteries().await)).into_response()
}

/// Axum handler function for GET /api/results/:id
pub async fn get_result(
    State(state): State<AppState>,
    Path(result_id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/results/{}", result_id);

    match state.store.get_result(result_id).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => (e.status_code(), e.to_string()).into_response(),
    }
}

/// Axum handler function for POST /api/results
pub async fn submit_result(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> impl IntoResponse {
    info!("POST /api/results - {} fields", fields.len());

    match state.store.save_submission(&fields).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            tracing::error!("Error saving lottery result: {:?}", e);
            (e.status_code(), e.to_string()).into_response()
        }
    }
}

/// Axum handler function for POST /api/results/auto-save
pub async fn auto_save_ticket(
    State(state): State<AppState>,
    Json(request): Json<AutoSaveRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/results/auto-save - result {} tier {}",
        request.result_id,
        request.prize_type.key()
    );

    match state.store.auto_save(&request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            tracing::error!("Error auto-saving ticket: {:?}", e);
            (e.status_code(), e.to_string()).into_response()
        }
    }
}

/// Axum handler function for POST /api/logs
pub async fn ingest_log(Json(request): Json<LogRequest>) -> impl IntoResponse {
    let component = request.component.as_deref().unwrap_or("frontend");
    match request.level.as_str() {
        "error" => tracing::error!(target: "frontend", "[{}] {}", component, request.message),
        "warn" => tracing::warn!(target: "frontend", "[{}] {}", component, request.message),
        "debug" => tracing::debug!(target: "frontend", "[{}] {}", component, request.message),
        _ => tracing::info!(target: "frontend", "[{}] {}", component, request.message),
    }
    StatusCode::NO_CONTENT
}
