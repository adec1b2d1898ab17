use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::AppState;
use crate::error::AppError;
use crate::models::Normalized;

#[axum::debug_handler]
pub async fn get_case_status(
    State(state): State<AppState>,
    Path(receipt_number): Path<String>,
) -> Result<Json<Normalized>, AppError> {
    let normalized = state.gateway.case_status(&receipt_number).await?;
    if normalized.is_passthrough() {
        tracing::warn!("Returning unprocessed upstream body for {}", receipt_number);
    }
    Ok(Json(normalized))
}

#[axum::debug_handler]
pub async fn test_connection(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.gateway.test_connection().await;
    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(report))
}
