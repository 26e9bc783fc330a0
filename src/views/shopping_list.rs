//! The shopping list pages.

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Router,
};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    api::shopping_list::{
        completion_service::{self, CompletionOutcome},
        shopping_list_repository::{self, NewShoppingListItem, ShoppingListItem},
    },
    infra::{
        database::DbPool,
        error::{ApiResult, ClientError},
        extract::Query,
        pagination::PaginationParams,
        security::User,
        state::AppState,
        validation::Valid,
    },
};

use super::login::LoginPath;

pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(index)
        .typed_get(list_page)
        .typed_post(register)
        .typed_post(delete)
        .typed_post(complete)
}

/// One-shot flags driving the banner on the list page.
mod flash {
    pub(super) const REGISTERED: &str = "flash.registered";
    pub(super) const DELETED: &str = "flash.deleted";
    pub(super) const COMPLETED: &str = "flash.completed";
    pub(super) const COMPLETION_FAILED: &str = "flash.completion_failed";
}

async fn take_flash(session: &Session, key: &str) -> bool {
    session
        .remove::<bool>(key)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

async fn set_flash(session: &Session, key: &str) -> ApiResult<()> {
    session.insert(key, true).await?;
    Ok(())
}

#[derive(TypedPath)]
#[typed_path("/", rejection(ClientError))]
pub struct Index;

#[derive(TypedPath)]
#[typed_path("/shopping-list", rejection(ClientError))]
pub struct ShoppingListPage;

#[derive(Deserialize, TypedPath)]
#[typed_path("/shopping-list/:id/delete", rejection(ClientError))]
pub struct DeleteItemPath(i32);

#[derive(Deserialize, TypedPath)]
#[typed_path("/shopping-list/:id/complete", rejection(ClientError))]
pub struct CompleteItemPath(i32);

#[derive(Template)]
#[template(path = "shopping_list.html")]
pub struct ShoppingListTemplate {
    username: String,
    items: Vec<ShoppingListItem>,
    page: i64,
    has_prev: bool,
    has_next: bool,
    registered: bool,
    deleted: bool,
    completed: bool,
    completion_failed: bool,
}

pub async fn index(_: Index) -> Redirect {
    Redirect::to(&ShoppingListPage.to_string())
}

/// Displays the user's shopping list.
pub async fn list_page(
    _: ShoppingListPage,
    session: Session,
    db: State<DbPool>,
    user: Option<User>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Response> {
    let Some(user) = user else {
        return Ok(Redirect::to(&LoginPath.to_string()).into_response());
    };

    let mut tx = db.begin().await?;
    let items = shopping_list_repository::list_items(&mut tx, user.id(), &params).await?;
    tx.commit().await?;

    let has_next = items.len() as i64 == params.limit();
    let template = ShoppingListTemplate {
        username: user.username().to_string(),
        page: params.page(),
        has_prev: params.page() > 0,
        has_next,
        items,
        registered: take_flash(&session, flash::REGISTERED).await,
        deleted: take_flash(&session, flash::DELETED).await,
        completed: take_flash(&session, flash::COMPLETED).await,
        completion_failed: take_flash(&session, flash::COMPLETION_FAILED).await,
    };
    Ok(template.into_response())
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub description: Option<String>,
}

/// Registers a new item from the list page form.
pub async fn register(
    _: ShoppingListPage,
    session: Session,
    db: State<DbPool>,
    user: Option<User>,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Redirect> {
    let Some(user) = user else {
        return Ok(Redirect::to(&LoginPath.to_string()));
    };

    let new_item = NewShoppingListItem {
        name: form.name,
        description: form.description.filter(|d| !d.is_empty()),
    };
    if let Ok(new_item) = Valid::new(new_item) {
        let mut tx = db.begin().await?;
        shopping_list_repository::create_item(&mut tx, user.id(), new_item).await?;
        tx.commit().await?;
        set_flash(&session, flash::REGISTERED).await?;
    }
    Ok(Redirect::to(&ShoppingListPage.to_string()))
}

/// Deletes an item from the list page.
pub async fn delete(
    DeleteItemPath(id): DeleteItemPath,
    session: Session,
    db: State<DbPool>,
    user: Option<User>,
) -> ApiResult<Redirect> {
    let Some(user) = user else {
        return Ok(Redirect::to(&LoginPath.to_string()));
    };

    let mut tx = db.begin().await?;
    if shopping_list_repository::delete_item(&mut tx, user.id(), id)
        .await
        .is_ok()
    {
        tx.commit().await?;
        set_flash(&session, flash::DELETED).await?;
    }
    Ok(Redirect::to(&ShoppingListPage.to_string()))
}

/// Completes an item from the list page.
pub async fn complete(
    CompleteItemPath(id): CompleteItemPath,
    session: Session,
    db: State<DbPool>,
    user: Option<User>,
) -> ApiResult<Redirect> {
    let Some(user) = user else {
        return Ok(Redirect::to(&LoginPath.to_string()));
    };

    match completion_service::complete_item(&db, user.id(), id).await {
        CompletionOutcome::Completed(_) => set_flash(&session, flash::COMPLETED).await?,
        CompletionOutcome::Failed => set_flash(&session, flash::COMPLETION_FAILED).await?,
    }
    Ok(Redirect::to(&ShoppingListPage.to_string()))
}
