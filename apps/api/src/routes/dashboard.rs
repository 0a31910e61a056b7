use axum::{extract::State, Json};
use chrono::Local;

use crate::dashboard::summary::{build_summary, DashboardSummary};
use crate::errors::AppError;
use crate::models::{Interview, Job};
use crate::routes::auth::BearerToken;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<DashboardSummary>, AppError> {
    let (jobs, interviews) = tokio::join!(
        state.reconciler.fetch::<Job>(&token),
        state.reconciler.fetch::<Interview>(&token),
    );
    Ok(Json(build_summary(
        jobs?,
        interviews?,
        Local::now().date_naive(),
        state.config.chart_height,
    )))
}
