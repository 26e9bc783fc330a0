//! Types and functions for storing completed shopping list items.
//!
//! The completed list is append-only: records are created by the completion
//! transition and never changed afterwards.

use crate::infra::{database::Tx, error::ApiResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;
use utoipa::ToSchema;

use super::shopping_list_repository::ShoppingListItem;

/// A completed item about to be recorded.
///
/// Carries the source item's fields except its creation and update
/// timestamps; the completed record gets its own timestamp from the store.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompletedShoppingListItem {
    /// The id of the active item this record came from.
    pub id: i32,
    /// The owning user's id.
    pub user_id: i32,
    /// What was bought.
    pub name: String,
    /// Extra detail about the purchase.
    pub description: Option<String>,
}

impl From<ShoppingListItem> for NewCompletedShoppingListItem {
    fn from(item: ShoppingListItem) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            name: item.name,
            description: item.description,
        }
    }
}

/// A completed item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompletedShoppingListItem {
    /// The id the item had on the active list.
    pub id: i32,
    /// The owning user's id.
    pub user_id: i32,
    /// What was bought.
    #[schema(example = "milk")]
    pub name: String,
    /// Extra detail about the purchase.
    pub description: Option<String>,
    /// When the item was completed.
    pub completed_at: DateTime<Utc>,
}

/// Records a completed item.
///
/// Returns `None` if the store did not produce a row.
#[instrument(skip(tx))]
pub async fn insert_completed(
    tx: &mut Tx,
    record: NewCompletedShoppingListItem,
) -> ApiResult<Option<CompletedShoppingListItem>> {
    tracing::info!("Recording completed item {:?}", record);
    let completed = sqlx::query_as::<_, CompletedShoppingListItem>(
        r#"
        INSERT INTO completed_shopping_list_items (id, user_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(record.id)
    .bind(record.user_id)
    .bind(&record.name)
    .bind(&record.description)
    .fetch_optional(tx.as_mut())
    .await?;
    tracing::info!("Recorded completed item: {:?}", completed);
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::security;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn insert_keeps_the_source_id_and_assigns_a_timestamp(db: PgPool) {
        let mut conn = db.acquire().await.unwrap();
        let user = security::create_user(&mut conn, "alice", "wonderland")
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        let completed = insert_completed(
            &mut tx,
            NewCompletedShoppingListItem {
                id: 7,
                user_id: user.id(),
                name: "milk".to_string(),
                description: Some("two bottles".to_string()),
            },
        )
        .await
        .unwrap()
        .expect("insert produced no row");

        assert_eq!(7, completed.id);
        assert_eq!(user.id(), completed.user_id);
        assert_eq!("milk", completed.name);
        assert_eq!(Some("two bottles".to_string()), completed.description);
    }
}
