use askama::Template;
use axum::{extract::State, response::Redirect, Form, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use tower_sessions::Session;

use crate::infra::{
    database::DbPool,
    error::{ApiResult, ClientError},
    extract::Query,
    security::{self, SESSION_USER_KEY},
    state::AppState,
};

use super::shopping_list::ShoppingListPage;

pub fn routes() -> Router<AppState> {
    Router::new().typed_get(get_login).typed_post(post_login)
}

#[derive(Template, Default)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    error: Option<String>,
}

#[derive(TypedPath)]
#[typed_path("/login", rejection(ClientError))]
pub struct LoginPath;

#[derive(Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

/// Display the login page.
pub async fn get_login(_: LoginPath, Query(query): Query<LoginQuery>) -> LoginTemplate {
    LoginTemplate { error: query.error }
}

#[derive(Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

/// Log a user in and store them in the session.
pub async fn post_login(
    _: LoginPath,
    session: Session,
    db: State<DbPool>,
    Form(params): Form<LoginParams>,
) -> ApiResult<Redirect> {
    let mut conn = db.acquire().await?;
    let user = match security::authenticate(&mut conn, &params.username, &params.password).await {
        Ok(user) => user,
        Err(e) => return Ok(Redirect::to(&format!("/login?error={}", e))),
    };
    session.insert(SESSION_USER_KEY, user).await?;
    let list = ShoppingListPage.to_string();
    Ok(Redirect::to(&list))
}
