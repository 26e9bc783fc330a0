//! Types and functions for storing and loading shopping list items from the database.

use crate::infra::{
    database::Tx,
    error::{ApiResult, ClientError},
    pagination::PaginationParams,
    validation::Valid,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{instrument, Instrument};
use utoipa::ToSchema;
use validator::Validate;

/// A new shopping list item.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewShoppingListItem {
    /// What to buy.
    #[schema(example = "milk")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Extra detail about the purchase.
    #[schema(example = "Two bottles, lactose free")]
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
}

/// An item on a user's shopping list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShoppingListItem {
    /// The item's id.
    pub id: i32,
    /// The owning user's id.
    pub user_id: i32,
    /// What to buy.
    #[schema(example = "milk")]
    pub name: String,
    /// Extra detail about the purchase.
    #[schema(example = "Two bottles, lactose free")]
    pub description: Option<String>,
    /// When the item was registered.
    pub created_at: DateTime<Utc>,
    /// When the item was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Creates a new item owned by the given user.
#[instrument(skip(tx))]
pub async fn create_item(
    tx: &mut Tx,
    user_id: i32,
    new_item: Valid<NewShoppingListItem>,
) -> ApiResult<ShoppingListItem> {
    let new_item = new_item.into_inner();
    tracing::info!("Creating item {:?}", new_item);
    let item = sqlx::query_as::<_, ShoppingListItem>(
        r#"
        INSERT INTO shopping_list_items (user_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&new_item.name)
    .bind(&new_item.description)
    .fetch_one(tx.as_mut())
    .await?;
    tracing::info!("Created item {:?}", item);
    Ok(item)
}

/// Reads an item scoped by its owner.
///
/// An item owned by someone else is reported as absent, exactly like an item
/// that does not exist.
#[instrument(skip(tx))]
pub async fn fetch_item(tx: &mut Tx, user_id: i32, id: i32) -> ApiResult<Option<ShoppingListItem>> {
    tracing::info!("Reading item");
    let item = sqlx::query_as::<_, ShoppingListItem>(
        r#"
        SELECT * FROM shopping_list_items
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(tx.as_mut())
    .instrument(tracing::info_span!("fetch_optional"))
    .await?;
    tracing::info!("Found item: {:?}", item);
    Ok(item)
}

/// Deletes an item scoped by its owner.
#[instrument(skip(tx))]
pub async fn delete_item(tx: &mut Tx, user_id: i32, id: i32) -> ApiResult<()> {
    tracing::info!("Deleting item {:?}", id);
    let rows = sqlx::query(
        r#"
        DELETE FROM shopping_list_items
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(tx.as_mut())
    .await?;

    if rows.rows_affected() == 0 {
        tracing::warn!("Item not found");
        return Err(ClientError::NotFound)?;
    }

    tracing::info!("Deleted item");

    Ok(())
}

/// Lists the user's items, ordered by name.
#[instrument(skip(tx))]
pub async fn list_items(
    tx: &mut Tx,
    user_id: i32,
    params: &PaginationParams,
) -> ApiResult<Vec<ShoppingListItem>> {
    tracing::info!("Listing items");
    let items = sqlx::query_as::<_, ShoppingListItem>(
        r#"
        SELECT * FROM shopping_list_items
        WHERE user_id = $1
        ORDER BY name
        LIMIT $2
        OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(tx.as_mut())
    .instrument(tracing::info_span!("fetch_all"))
    .await?;
    tracing::info!("Listed {} items", items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{error::ApiError, security};
    use sqlx::PgPool;

    #[sqlx::test]
    async fn create_then_list_returns_item(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let user = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        let item = create_item(
            &mut tx,
            user.id(),
            Valid::new(NewShoppingListItem {
                name: "milk".to_string(),
                description: None,
            })
            .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!("milk", item.name);
        assert_eq!(user.id(), item.user_id);

        let items = list_items(&mut tx, user.id(), &PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(&item, items.last().unwrap());
    }

    #[sqlx::test]
    async fn listing_is_scoped_to_the_owner_and_ordered_by_name(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let alice = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();
        let bob = security::create_user(&mut conn, "bob", "builder")
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        for (user_id, name) in [
            (alice.id(), "tea"),
            (alice.id(), "bread"),
            (bob.id(), "nails"),
        ] {
            create_item(
                &mut tx,
                user_id,
                Valid::new(NewShoppingListItem {
                    name: name.to_string(),
                    description: None,
                })
                .unwrap(),
            )
            .await
            .unwrap();
        }

        let items = list_items(&mut tx, alice.id(), &PaginationParams::default())
            .await
            .unwrap();
        let names: Vec<_> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(vec!["bread", "tea"], names);
    }

    #[sqlx::test]
    async fn fetching_someone_elses_item_reports_absent(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let alice = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();
        let bob = security::create_user(&mut conn, "bob", "builder")
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        let item = create_item(
            &mut tx,
            alice.id(),
            Valid::new(NewShoppingListItem {
                name: "milk".to_string(),
                description: None,
            })
            .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(None, fetch_item(&mut tx, bob.id(), item.id).await.unwrap());
        assert_eq!(
            Some(item.clone()),
            fetch_item(&mut tx, alice.id(), item.id).await.unwrap()
        );
    }

    #[sqlx::test]
    async fn deleting_someone_elses_item_is_not_found(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let alice = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();
        let bob = security::create_user(&mut conn, "bob", "builder")
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        let item = create_item(
            &mut tx,
            alice.id(),
            Valid::new(NewShoppingListItem {
                name: "milk".to_string(),
                description: None,
            })
            .unwrap(),
        )
        .await
        .unwrap();

        let result = delete_item(&mut tx, bob.id(), item.id).await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::NotFound))
        ));

        delete_item(&mut tx, alice.id(), item.id).await.unwrap();
        assert_eq!(None, fetch_item(&mut tx, alice.id(), item.id).await.unwrap());
    }
}
