use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{delete, get, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiResponse},
    state::AppState,
    users::dto::{ProfileResponse, RemovedResponse, UpdateProfileRequest},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/me", get(get_me))
        .route("/user/edit", put(update_me))
        .route("/user/remove", delete(remove_me))
}

#[instrument(skip(state, auth), fields(user_id = %auth.0))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let user_id = auth.object_id()?;
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(ApiResponse::ok(ProfileResponse::from(user)))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.0))]
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UpdateProfileRequest>>, ApiError> {
    let Json(payload) =
        payload.map_err(|_| ApiError::Unprocessable("Invalid request body".into()))?;
    let user_id = auth.object_id()?;

    let update = payload
        .to_update(state.credentials.as_ref())
        .map_err(|e| ApiError::internal("Internal server error", e))?;

    let matched = state
        .store
        .update_user(user_id, &update)
        .await
        .map_err(|e| {
            error!(error = %e, "update_user failed");
            ApiError::from(e)
        })?;
    if matched == 0 {
        warn!("update for missing user");
        return Err(ApiError::NotFound("User not found"));
    }

    info!("user profile updated");
    Ok(ApiResponse::ok(payload))
}

#[instrument(skip(state, auth), fields(user_id = %auth.0))]
pub async fn remove_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<RemovedResponse>>, ApiError> {
    let user_id = auth.object_id()?;
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let removed = state
        .store
        .delete_user(user_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting user", e))?;
    if removed == 0 {
        // Vanished between the lookup and the delete.
        return Err(ApiError::internal(
            "Error deleting user",
            anyhow::anyhow!("no document deleted for {user_id}"),
        ));
    }

    info!(email = %user.email, "user removed");
    Ok(ApiResponse::ok(RemovedResponse {
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        removed: true,
    }))
}
