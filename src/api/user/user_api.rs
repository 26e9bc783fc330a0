//! The user API implementation.

use crate::infra::{error::ApiResult, extract::Json, security::User, state::AppState};
use axum::{routing::get, Router};
use tracing::instrument;

/// The user API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new().route("/user", get(user))
}

/// Authenticates a user.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Success", body = i32),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    )
)]
#[instrument]
pub async fn user(user: User) -> ApiResult<Json<i32>> {
    tracing::info!("User logged in");
    Ok(Json(user.id()))
}
