use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::responses::{ErrorResponse, ExtractionResponse};

#[tracing::instrument(skip(state))]
pub async fn extraction_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid extraction ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };
    let id = JobId::from_uuid(uuid);

    let job = match state.repository.get_job(id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Extraction not found: {}", job_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch extraction");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch extraction: {}", e),
                }),
            )
                .into_response();
        }
    };

    let clauses = match state.repository.get_clauses(id).await {
        Ok(clauses) => clauses,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch clauses");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch clauses: {}", e),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(ExtractionResponse::from_job(job, clauses)),
    )
        .into_response()
}
