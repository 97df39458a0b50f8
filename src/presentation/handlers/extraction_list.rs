use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::presentation::state::AppState;

use super::extract::USER_ID_HEADER;
use super::responses::{ErrorResponse, ExtractionResponse};

const MAX_PAGE_SIZE: u64 = 100;

#[derive(Deserialize, Debug)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    10
}

#[derive(Serialize)]
pub struct ExtractionListResponse {
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub extractions: Vec<ExtractionResponse>,
}

#[tracing::instrument(skip(state, headers))]
pub async fn list_extractions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
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

    let limit = params.limit.clamp(1, MAX_PAGE_SIZE);

    let page = match state.repository.list_jobs(&user_id, params.skip, limit).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list extractions");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list extractions: {}", e),
                }),
            )
                .into_response();
        }
    };

    let mut extractions = Vec::with_capacity(page.jobs.len());
    for job in page.jobs {
        let clauses = match state.repository.get_clauses(job.id).await {
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
        extractions.push(ExtractionResponse::from_job(job, clauses));
    }

    (
        StatusCode::OK,
        Json(ExtractionListResponse {
            total: page.total,
            skip: params.skip,
            limit,
            extractions,
        }),
    )
        .into_response()
}
