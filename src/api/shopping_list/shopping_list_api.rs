//! The shopping list API implementation.

use crate::{
    api::shopping_list::{
        completion_service::{self, CompletionOutcome},
        shopping_list_repository::{self, NewShoppingListItem, ShoppingListItem},
    },
    infra::{
        database::DbPool,
        error::{ApiResult, ClientError},
        extract::{Json, Query},
        pagination::PaginationParams,
        security::User,
        state::AppState,
        validation::Valid,
    },
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use super::completed_shopping_list_repository::CompletedShoppingListItem;

/// The shopping list API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(list_items)
        .typed_post(register_item)
        .typed_get(get_item)
        .typed_delete(delete_item)
        .typed_post(complete_item)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/shopping-list", rejection(ClientError))]
pub(crate) struct ShoppingList;

#[derive(Deserialize, TypedPath)]
#[typed_path("/shopping-list/:id", rejection(ClientError))]
pub(crate) struct ShoppingListId(i32);

#[derive(Deserialize, TypedPath)]
#[typed_path("/shopping-list/:id/complete", rejection(ClientError))]
pub(crate) struct ShoppingListIdComplete(i32);

/// Lists the user's items, ordered by name.
#[utoipa::path(
    get,
    path = "/api/shopping-list",
    params(PaginationParams),
    responses(
        (status = 200, description = "Success", body = [ShoppingListItem]),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(params))]
pub(crate) async fn list_items(
    _: ShoppingList,
    db: State<DbPool>,
    user: User,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<ShoppingListItem>>> {
    let mut tx = db.begin().await?;
    let items = shopping_list_repository::list_items(&mut tx, user.id(), &params).await?;
    tx.commit().await?;
    Ok(Json(items))
}

/// Registers a new item on the user's list.
#[utoipa::path(
    post,
    path = "/api/shopping-list",
    request_body = NewShoppingListItem,
    responses(
        (status = 201, description = "Created", body = ShoppingListItem),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(new_item))]
pub(crate) async fn register_item(
    _: ShoppingList,
    db: State<DbPool>,
    user: User,
    Json(new_item): Json<NewShoppingListItem>,
) -> ApiResult<(StatusCode, Json<ShoppingListItem>)> {
    let new_item = Valid::new(new_item)?;
    let mut tx = db.begin().await?;
    let item = shopping_list_repository::create_item(&mut tx, user.id(), new_item).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Gets one of the user's items.
#[utoipa::path(
    get,
    path = "/api/shopping-list/{id}",
    responses(
        (status = 200, description = "Ok", body = ShoppingListItem),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub(crate) async fn get_item(
    ShoppingListId(id): ShoppingListId,
    db: State<DbPool>,
    user: User,
) -> ApiResult<Json<ShoppingListItem>> {
    let mut tx = db.begin().await?;
    let item = shopping_list_repository::fetch_item(&mut tx, user.id(), id)
        .await?
        .ok_or(ClientError::NotFound)?;
    tx.commit().await?;
    Ok(Json(item))
}

/// Deletes one of the user's items.
#[utoipa::path(
    delete,
    path = "/api/shopping-list/{id}",
    responses(
        (status = 204, description = "No Content"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub(crate) async fn delete_item(
    ShoppingListId(id): ShoppingListId,
    db: State<DbPool>,
    user: User,
) -> ApiResult<StatusCode> {
    let mut tx = db.begin().await?;
    shopping_list_repository::delete_item(&mut tx, user.id(), id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Completes an item, moving it to the completed list.
///
/// Every failure reason is reported the same way.
#[utoipa::path(
    post,
    path = "/api/shopping-list/{id}/complete",
    responses(
        (status = 200, description = "Ok", body = CompletedShoppingListItem),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Completion failed", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub(crate) async fn complete_item(
    ShoppingListIdComplete(id): ShoppingListIdComplete,
    db: State<DbPool>,
    user: User,
) -> ApiResult<Json<CompletedShoppingListItem>> {
    match completion_service::complete_item(&db, user.id(), id).await {
        CompletionOutcome::Completed(completed) => Ok(Json(completed)),
        CompletionOutcome::Failed => {
            Err(ClientError::UnprocessableEntity("completion failed".to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {}
