pub mod auth;
pub mod dashboard;
pub mod health;
pub mod interviews;
pub mod jobs;
pub mod profile;

use axum::{
    routing::{get, put},
    Router,
};
use serde::Serialize;

use crate::reconcile::{DataSource, Fetched, ViewState};
use crate::state::AppState;

/// Body of every list endpoint: the items plus what the view should show about them.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub state: ViewState,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub items: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn from_fetch(fetched: Fetched<T>) -> Self {
        Self {
            state: ViewState::Loading.settle_fetch(fetched.source, fetched.items.len()),
            source: fetched.source,
            notice: fetched.notice,
            items: fetched.items,
        }
    }

    /// Search and favorites results come straight from upstream and are never cached.
    pub fn from_search(items: Vec<T>) -> Self {
        let state = ViewState::Loading.settle_search(items.len());
        let notice = (state == ViewState::EmptyResult)
            .then(|| "No results found matching your search criteria".to_string());
        Self {
            state,
            source: DataSource::Live,
            notice,
            items,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .route("/api/v1/profile", get(profile::handle_get_profile).put(profile::handle_update_profile))
        // Jobs
        .route("/api/v1/jobs", get(jobs::handle_list_jobs).post(jobs::handle_create_job))
        .route("/api/v1/jobs/search", get(jobs::handle_search_jobs))
        .route("/api/v1/jobs/status-counts", get(jobs::handle_status_counts))
        .route("/api/v1/jobs/favorites", get(jobs::handle_favorite_jobs))
        .route(
            "/api/v1/jobs/:id",
            put(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/favorite", put(jobs::handle_favorite))
        .route("/api/v1/jobs/:id/unfavorite", put(jobs::handle_unfavorite))
        // Interviews
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_create_interview),
        )
        .route("/api/v1/interviews/search", get(interviews::handle_search_interviews))
        .route(
            "/api/v1/interviews/:id",
            put(interviews::handle_update_interview).delete(interviews::handle_delete_interview),
        )
        .with_state(state)
}
