use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    error::{ApiError, ApiResponse},
    models::User,
    state::AppState,
    users::UpdateProfileRequest,
};

/// Unauthenticated user administration. Only mounted when enabled in config.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).delete(delete_all_users))
        .route(
            "/admin/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid user ID format".into()))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state.store.find_all_users().await?;
    Ok(ApiResponse::ok(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state
        .store
        .find_user_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(ApiResponse::ok(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = parse_id(&id)?;
    let Json(payload) =
        payload.map_err(|_| ApiError::Unprocessable("Invalid request body".into()))?;

    let update = payload
        .to_update(state.credentials.as_ref())
        .map_err(|e| ApiError::internal("Internal server error", e))?;

    if state.store.update_user(id, &update).await? == 0 {
        return Err(ApiError::NotFound("User not found"));
    }
    let user = state
        .store
        .find_user_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    info!(user_id = %id, "admin updated user");
    Ok(ApiResponse::ok(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.store.delete_user(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("User not found"));
    }
    info!(user_id = %id, "admin deleted user");
    Ok(ApiResponse::ok(DeletedResponse { deleted }))
}

#[instrument(skip(state))]
pub async fn delete_all_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let deleted = state.store.delete_all_users().await?;
    warn!(deleted, "admin deleted all users");
    Ok(ApiResponse::ok(DeletedResponse { deleted }))
}
