use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::Profile;
use crate::routes::auth::BearerToken;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.reconciler.api().get_profile(&token).await?))
}

/// PUT /api/v1/profile
/// Returns the profile as stored upstream after the update.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, AppError> {
    let api = state.reconciler.api();
    api.update_profile(&token, &profile).await?;
    Ok(Json(api.get_profile(&token).await?))
}
