use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api_client::AccessToken;
use crate::dashboard::{partition_interviews, InterviewPartition};
use crate::errors::AppError;
use crate::models::{Interview, InterviewDraft};
use crate::routes::auth::BearerToken;
use crate::routes::ListResponse;
use crate::search::{interview_search_params, InterviewFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterviewSearchQuery {
    pub q: Option<String>,
    #[serde(flatten)]
    pub filter: InterviewFilter,
}

#[derive(Debug, Serialize)]
pub struct InterviewListResponse {
    #[serde(flatten)]
    pub list: ListResponse<Interview>,
    #[serde(flatten)]
    pub partition: InterviewPartition,
}

async fn refreshed(state: &AppState, token: &AccessToken) -> Result<InterviewListResponse, AppError> {
    let fetched = state.reconciler.fetch::<Interview>(token).await?;
    let partition = partition_interviews(&fetched.items, Local::now().date_naive());
    Ok(InterviewListResponse {
        list: ListResponse::from_fetch(fetched),
        partition,
    })
}

fn validate(draft: &InterviewDraft) -> Result<(), AppError> {
    draft
        .validate(Local::now().date_naive())
        .map_err(AppError::Validation)
}

/// GET /api/v1/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<InterviewListResponse>, AppError> {
    Ok(Json(refreshed(&state, &token).await?))
}

/// POST /api/v1/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(draft): Json<InterviewDraft>,
) -> Result<(StatusCode, Json<InterviewListResponse>), AppError> {
    validate(&draft)?;
    state.reconciler.api().create_interview(&token, &draft).await?;
    info!("Scheduled interview with {} on {}", draft.company, draft.date);
    Ok((StatusCode::CREATED, Json(refreshed(&state, &token).await?)))
}

/// PUT /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<Uuid>,
    Json(draft): Json<InterviewDraft>,
) -> Result<Json<InterviewListResponse>, AppError> {
    validate(&draft)?;
    state
        .reconciler
        .api()
        .update_interview(&token, id, &draft)
        .await?;
    Ok(Json(refreshed(&state, &token).await?))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewListResponse>, AppError> {
    state.reconciler.api().delete_interview(&token, id).await?;
    info!("Deleted interview {id}");
    Ok(Json(refreshed(&state, &token).await?))
}

/// GET /api/v1/interviews/search
/// With no criteria at all this is the plain interview list.
pub async fn handle_search_interviews(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<InterviewSearchQuery>,
) -> Result<Json<ListResponse<Interview>>, AppError> {
    let params = interview_search_params(query.q.as_deref(), &query.filter);
    if params.is_empty() {
        return Ok(Json(refreshed(&state, &token).await?.list));
    }
    let interviews = state
        .reconciler
        .api()
        .search_interviews(&token, &params)
        .await?;
    Ok(Json(ListResponse::from_search(interviews)))
}
