use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiResponse},
    models::{NewPost, Post},
    posts::dto::CreatePostRequest,
    state::AppState,
};

pub fn post_routes() -> Router<AppState> {
    Router::new().route("/post", post(create_post))
}

/// The author is always the authenticated caller; the store-assigned id is
/// returned separately as the post id.
#[instrument(skip(state, auth, payload), fields(user_id = %auth.0))]
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), ApiError> {
    let user_id = auth.object_id()?;
    let Json(payload) = payload.map_err(|_| ApiError::BadRequest("Invalid request body".into()))?;

    let author = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let post = state
        .store
        .insert_post(NewPost {
            created_at: OffsetDateTime::now_utc(),
            user_id,
            first_name: author.first_name,
            title: payload.title,
            content: payload.content,
        })
        .await?;

    info!(post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, ApiResponse::ok(post)))
}
