use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;

pub(crate) use dto::UpdateProfileRequest;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
