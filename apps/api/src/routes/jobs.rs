use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api_client::{AccessToken, FavoriteAction};
use crate::dashboard::{bar_heights, Bar, JobStats};
use crate::errors::AppError;
use crate::models::{Job, JobDraft};
use crate::routes::auth::BearerToken;
use crate::routes::ListResponse;
use crate::search::{job_search_params, JobFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobSearchQuery {
    pub q: Option<String>,
    #[serde(flatten)]
    pub filter: JobFilter,
}

#[derive(Debug, Deserialize)]
pub struct TextQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusCountsResponse {
    pub stats: JobStats,
    pub pipeline: Vec<Bar>,
}

/// Re-reads the job list after a write so the snapshot tracks upstream.
async fn refreshed(state: &AppState, token: &AccessToken) -> Result<ListResponse<Job>, AppError> {
    let fetched = state.reconciler.fetch::<Job>(token).await?;
    Ok(ListResponse::from_fetch(fetched))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ListResponse<Job>>, AppError> {
    Ok(Json(refreshed(&state, &token).await?))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<ListResponse<Job>>), AppError> {
    draft.validate().map_err(AppError::Validation)?;
    state.reconciler.api().create_job(&token, &draft).await?;
    info!("Created job '{}' ({})", draft.title, draft.status);
    Ok((StatusCode::CREATED, Json(refreshed(&state, &token).await?)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<Uuid>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<ListResponse<Job>>, AppError> {
    draft.validate().map_err(AppError::Validation)?;
    state.reconciler.api().update_job(&token, id, &draft).await?;
    Ok(Json(refreshed(&state, &token).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<ListResponse<Job>>, AppError> {
    state.reconciler.api().delete_job(&token, id).await?;
    info!("Deleted job {id}");
    Ok(Json(refreshed(&state, &token).await?))
}

/// GET /api/v1/jobs/search
/// With no criteria at all this is the plain job list.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<JobSearchQuery>,
) -> Result<Json<ListResponse<Job>>, AppError> {
    let params = job_search_params(query.q.as_deref(), &query.filter);
    if params.is_empty() {
        return Ok(Json(refreshed(&state, &token).await?));
    }
    let jobs = state.reconciler.api().search_jobs(&token, &params).await?;
    Ok(Json(ListResponse::from_search(jobs)))
}

/// GET /api/v1/jobs/status-counts
pub async fn handle_status_counts(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<StatusCountsResponse>, AppError> {
    let counts = state.reconciler.api().job_status_counts(&token).await?;
    let stats = JobStats::from_status_counts(&counts);
    let pipeline = bar_heights(&stats.by_status, state.config.chart_height);
    Ok(Json(StatusCountsResponse { stats, pipeline }))
}

/// GET /api/v1/jobs/favorites
pub async fn handle_favorite_jobs(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<TextQuery>,
) -> Result<Json<ListResponse<Job>>, AppError> {
    let mut jobs = state.reconciler.api().favorite_jobs(&token).await?;
    if let Some(q) = query.q.as_deref() {
        jobs.retain(|job| job.matches_text(q));
    }
    Ok(Json(ListResponse::from_search(jobs)))
}

async fn set_favorite(
    state: &AppState,
    token: &AccessToken,
    id: Uuid,
    action: FavoriteAction,
) -> Result<Json<ListResponse<Job>>, AppError> {
    state.reconciler.api().set_favorite(token, id, action).await?;
    Ok(Json(refreshed(state, token).await?))
}

/// PUT /api/v1/jobs/:id/favorite
pub async fn handle_favorite(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<ListResponse<Job>>, AppError> {
    set_favorite(&state, &token, id, FavoriteAction::Favorite).await
}

/// PUT /api/v1/jobs/:id/unfavorite
pub async fn handle_unfavorite(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<ListResponse<Job>>, AppError> {
    set_favorite(&state, &token, id, FavoriteAction::Unfavorite).await
}
