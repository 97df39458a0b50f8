use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::services::SubmitError;
use crate::domain::UserId;
use crate::presentation::state::AppState;

use super::responses::ErrorResponse;

/// Header carrying the caller-supplied user reference. Authentication is an
/// external collaborator; the core trusts this value.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

#[tracing::instrument(skip(state, headers, multipart))]
pub async fn extract_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let Some(user_id) = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(UserId::new)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Missing {} header", USER_ID_HEADER),
            }),
        )
            .into_response();
    };

    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Extract request with no file");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart: {}", e),
                }),
            )
                .into_response();
        }
    };

    let filename = field.file_name().unwrap_or("unknown").to_string();

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read file: {}", e),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File upload received");

    match state
        .extraction_service
        .submit(data.to_vec(), &filename, user_id)
        .await
    {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(SubmitResponse {
                job_id: job_id.as_uuid().to_string(),
                status: "processing".to_string(),
                message: "Clause extraction started".to_string(),
            }),
        )
            .into_response(),
        Err(SubmitError::UnsupportedFileType(ext)) => {
            tracing::warn!(extension = %ext, "Unsupported file type");
            (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResponse {
                    error: format!(
                        "Unsupported file type: {}. Only PDF, DOCX, and TXT files are supported.",
                        ext
                    ),
                }),
            )
                .into_response()
        }
        Err(SubmitError::WorkerUnavailable) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Extraction queue full or worker unavailable".to_string(),
            }),
        )
            .into_response(),
        Err(SubmitError::Repository(e)) => {
            tracing::error!(error = %e, "Failed to create extraction job");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create extraction job: {}", e),
                }),
            )
                .into_response()
        }
    }
}
