//! Moves items from the active list to the completed list.
//!
//! The move is the one multi-step write in the application, so it runs in a
//! single transaction: look the item up scoped by its owner, delete it from
//! the active list, record it on the completed list. Either all of that
//! happens or none of it does.

use crate::infra::{database::DbPool, error::ApiError};
use tracing::instrument;

use super::{
    completed_shopping_list_repository::{
        self, CompletedShoppingListItem, NewCompletedShoppingListItem,
    },
    shopping_list_repository,
};

/// The externally visible result of a completion attempt.
///
/// Every failure reason maps to [`CompletionOutcome::Failed`]: callers are
/// not told whether the item was missing, owned by someone else, or rejected
/// by the completed store.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// The item was moved to the completed list.
    Completed(CompletedShoppingListItem),
    /// Nothing changed.
    Failed,
}

/// Why a completion failed. Collapsed into [`CompletionOutcome::Failed`]
/// before leaving this module.
#[derive(Debug, thiserror::Error)]
enum CompletionError {
    /// Unknown id, or an item owned by someone else.
    #[error("item not found")]
    NotFound,
    /// The completed store did not produce a row.
    #[error("completed record was not inserted")]
    InsertFailed,
    /// The transaction failed for some other reason.
    #[error(transparent)]
    Transaction(#[from] ApiError),
}

/// Moves one of the user's active items to the completed list.
///
/// On success the active item is gone and the returned record is on the
/// completed list. On failure both lists are untouched.
#[instrument(skip(db))]
pub async fn complete_item(db: &DbPool, user_id: i32, item_id: i32) -> CompletionOutcome {
    match try_complete_item(db, user_id, item_id).await {
        Ok(completed) => {
            tracing::info!("Completed item {}", item_id);
            CompletionOutcome::Completed(completed)
        }
        Err(e) => {
            tracing::warn!("Completing item {} failed: {}", item_id, e);
            CompletionOutcome::Failed
        }
    }
}

/// The fallible completion steps.
///
/// The transaction commits on the single success path; every early return
/// drops it, which rolls back anything already done.
async fn try_complete_item(
    db: &DbPool,
    user_id: i32,
    item_id: i32,
) -> Result<CompletedShoppingListItem, CompletionError> {
    let mut tx = db.begin().await.map_err(ApiError::from)?;

    let item = shopping_list_repository::fetch_item(&mut tx, user_id, item_id)
        .await?
        .ok_or(CompletionError::NotFound)?;

    shopping_list_repository::delete_item(&mut tx, user_id, item.id).await?;

    let record = NewCompletedShoppingListItem::from(item);
    let completed = completed_shopping_list_repository::insert_completed(&mut tx, record)
        .await?
        .ok_or(CompletionError::InsertFailed)?;

    tx.commit().await.map_err(ApiError::from)?;

    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::shopping_list::shopping_list_repository::{NewShoppingListItem, ShoppingListItem},
        infra::{pagination::PaginationParams, security, validation::Valid},
    };
    use sqlx::PgPool;

    async fn seed_item(db: &PgPool, user_id: i32, name: &str) -> ShoppingListItem {
        let mut tx = db.begin().await.unwrap();
        let item = shopping_list_repository::create_item(
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
        tx.commit().await.unwrap();
        item
    }

    async fn active_items(db: &PgPool, user_id: i32) -> Vec<ShoppingListItem> {
        let mut tx = db.begin().await.unwrap();
        shopping_list_repository::list_items(&mut tx, user_id, &PaginationParams::default())
            .await
            .unwrap()
    }

    async fn completed_items(db: &PgPool, user_id: i32) -> Vec<CompletedShoppingListItem> {
        sqlx::query_as::<_, CompletedShoppingListItem>(
            "SELECT * FROM completed_shopping_list_items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn completing_an_item_moves_it_to_the_completed_list(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let user = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();
        let item = seed_item(&db, user.id(), "milk").await;

        let outcome = complete_item(&db, user.id(), item.id).await;

        let completed = match outcome {
            CompletionOutcome::Completed(completed) => completed,
            CompletionOutcome::Failed => panic!("completion failed"),
        };
        assert_eq!(item.id, completed.id);
        assert_eq!(user.id(), completed.user_id);
        assert_eq!("milk", completed.name);
        assert!(active_items(&db, user.id()).await.is_empty());
        assert_eq!(vec![completed], completed_items(&db, user.id()).await);
    }

    #[sqlx::test]
    async fn completing_an_unknown_item_fails_and_changes_nothing(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let user = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();
        let item = seed_item(&db, user.id(), "milk").await;

        let outcome = complete_item(&db, user.id(), 99).await;

        assert!(matches!(outcome, CompletionOutcome::Failed));
        assert_eq!(vec![item], active_items(&db, user.id()).await);
        assert!(completed_items(&db, user.id()).await.is_empty());
    }

    #[sqlx::test]
    async fn completing_someone_elses_item_fails(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let alice = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();
        let bob = security::create_user(&mut conn, "bob", "builder")
            .await
            .unwrap();
        let item = seed_item(&db, alice.id(), "milk").await;

        let outcome = complete_item(&db, bob.id(), item.id).await;

        assert!(matches!(outcome, CompletionOutcome::Failed));
        assert_eq!(vec![item], active_items(&db, alice.id()).await);
        assert!(completed_items(&db, alice.id()).await.is_empty());
        assert!(completed_items(&db, bob.id()).await.is_empty());
    }

    #[sqlx::test]
    async fn failed_insert_rolls_back_the_delete(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let user = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();
        let item = seed_item(&db, user.id(), "milk").await;

        // Occupy the completed-side id so the insert fails mid-transaction.
        sqlx::query(
            "INSERT INTO completed_shopping_list_items (id, user_id, name) VALUES ($1, $2, $3)",
        )
        .bind(item.id)
        .bind(user.id())
        .bind("stale")
        .execute(&db)
        .await
        .unwrap();

        let outcome = complete_item(&db, user.id(), item.id).await;

        assert!(matches!(outcome, CompletionOutcome::Failed));
        // The delete must have been undone.
        assert_eq!(vec![item], active_items(&db, user.id()).await);
    }

    #[sqlx::test]
    async fn failing_twice_leaves_no_residual_effects(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let user = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();

        for _ in 0..2 {
            let outcome = complete_item(&db, user.id(), 99).await;
            assert!(matches!(outcome, CompletionOutcome::Failed));
            assert!(active_items(&db, user.id()).await.is_empty());
            assert!(completed_items(&db, user.id()).await.is_empty());
        }
    }
}
