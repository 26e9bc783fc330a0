use axum::{response::Redirect, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use tower_sessions::Session;

use crate::infra::{
    error::{ApiResult, ClientError},
    state::AppState,
};

use super::login::LoginPath;

pub fn routes() -> Router<AppState> {
    Router::new().typed_get(logout)
}

#[derive(TypedPath)]
#[typed_path("/logout", rejection(ClientError))]
pub struct Logout;

/// Destroy the session and return to the login page.
pub async fn logout(_: Logout, session: Session) -> ApiResult<Redirect> {
    session.flush().await?;
    let login = LoginPath.to_string();
    Ok(Redirect::to(&login))
}
