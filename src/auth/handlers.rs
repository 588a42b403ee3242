use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::dto::{AuthResponse, LoginRequest, RegisterRequest},
    error::{ApiError, ApiResponse},
    models::NewUser,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let Json(payload) = payload.map_err(ApiError::bad_body)?;

    let password = state
        .credentials
        .prepare(&payload.password)
        .map_err(|e| ApiError::internal("Error creating user", e))?;

    let now = OffsetDateTime::now_utc();
    let new_user = NewUser {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password,
        created_at: now,
        // eligible to upvote immediately
        last_up_vote: now - Duration::minutes(1),
    };

    let user = state
        .store
        .insert_user(new_user)
        .await
        .map_err(|e| ApiError::internal("Error inserting user", e))?;

    let token = state
        .keys
        .issue(&user.email, &user.id.to_hex())
        .map_err(|e| ApiError::internal("Could not generate token", e))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(AuthResponse { token, user }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::BadRequest("Invalid request body".into()))?;

    let user = match state.store.find_user_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "find_user_by_email failed");
            return Err(e.into());
        }
    };

    let ok = state
        .credentials
        .verify(&payload.password, &user.password)
        .unwrap_or_else(|e| {
            warn!(error = %e, user_id = %user.id, "stored credential unreadable");
            false
        });

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .keys
        .issue(&user.email, &user.id.to_hex())
        .map_err(|e| ApiError::internal("Could not generate token", e))?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(ApiResponse::ok(AuthResponse { token, user }))
}
