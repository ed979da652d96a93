use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{ShoppingList, ShoppingListDraft, ShoppingListItem, ShoppingListItemDraft};
use crate::store::{PgStore, Repository, StoreResult};

#[async_trait]
impl Repository<ShoppingList> for PgStore {
    async fn list(&self, owner: Uuid, _parent: ()) -> StoreResult<Vec<ShoppingList>> {
        let rows = sqlx::query_as::<_, ShoppingList>(
            r#"
            SELECT id, user_id, name, is_active, created_at, updated_at
              FROM shopping_lists
             WHERE user_id = $1
             ORDER BY created_at DESC, id
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<ShoppingList>> {
        let row = sqlx::query_as::<_, ShoppingList>(
            r#"
            SELECT id, user_id, name, is_active, created_at, updated_at
              FROM shopping_lists
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn insert(
        &self,
        owner: Uuid,
        _parent: (),
        draft: ShoppingListDraft,
    ) -> StoreResult<Option<ShoppingList>> {
        let row = sqlx::query_as::<_, ShoppingList>(
            r#"
            INSERT INTO shopping_lists (user_id, name, is_active)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, is_active, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(&draft.name)
        .bind(draft.is_active)
        .fetch_one(self.pool())
        .await?;
        Ok(Some(row))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: ShoppingListDraft,
    ) -> StoreResult<Option<ShoppingList>> {
        let row = sqlx::query_as::<_, ShoppingList>(
            r#"
            UPDATE shopping_lists
               SET name = $3, is_active = $4, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&draft.name)
        .bind(draft.is_active)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        // shopping_list_items.shopping_list_id is ON DELETE CASCADE
        let done = sqlx::query("DELETE FROM shopping_lists WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool())
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<ShoppingListItem> for PgStore {
    async fn list(&self, owner: Uuid, list_id: Uuid) -> StoreResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            SELECT i.id, i.shopping_list_id, i.name, i.quantity, i.category,
                   i.estimated_price, i.is_purchased
              FROM shopping_list_items i
              JOIN shopping_lists l ON l.id = i.shopping_list_id
             WHERE i.shopping_list_id = $1 AND l.user_id = $2
             ORDER BY i.name, i.id
            "#,
        )
        .bind(list_id)
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<ShoppingListItem>> {
        let row = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            SELECT i.id, i.shopping_list_id, i.name, i.quantity, i.category,
                   i.estimated_price, i.is_purchased
              FROM shopping_list_items i
              JOIN shopping_lists l ON l.id = i.shopping_list_id
             WHERE i.id = $1 AND l.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn insert(
        &self,
        owner: Uuid,
        list_id: Uuid,
        draft: ShoppingListItemDraft,
    ) -> StoreResult<Option<ShoppingListItem>> {
        let row = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            INSERT INTO shopping_list_items
                   (shopping_list_id, name, quantity, category, estimated_price, is_purchased)
            SELECT l.id, $3, $4, $5, $6, $7
              FROM shopping_lists l
             WHERE l.id = $1 AND l.user_id = $2
            RETURNING id, shopping_list_id, name, quantity, category, estimated_price, is_purchased
            "#,
        )
        .bind(list_id)
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.quantity)
        .bind(&draft.category)
        .bind(draft.estimated_price)
        .bind(draft.is_purchased)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: ShoppingListItemDraft,
    ) -> StoreResult<Option<ShoppingListItem>> {
        let row = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            UPDATE shopping_list_items i
               SET name = $3, quantity = $4, category = $5, estimated_price = $6, is_purchased = $7
              FROM shopping_lists l
             WHERE i.id = $1 AND l.id = i.shopping_list_id AND l.user_id = $2
            RETURNING i.id, i.shopping_list_id, i.name, i.quantity, i.category,
                      i.estimated_price, i.is_purchased
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.quantity)
        .bind(&draft.category)
        .bind(draft.estimated_price)
        .bind(draft.is_purchased)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let done = sqlx::query(
            r#"
            DELETE FROM shopping_list_items i
             USING shopping_lists l
             WHERE i.id = $1 AND l.id = i.shopping_list_id AND l.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(self.pool())
        .await?;
        Ok(done.rows_affected() > 0)
    }
}

// These run against a scratch database: `DATABASE_URL=... cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;

    fn item_draft(name: &str, price: Option<f64>) -> ShoppingListItemDraft {
        ShoppingListItemDraft {
            name: name.into(),
            quantity: "2".into(),
            category: "produce".into(),
            estimated_price: price,
            is_purchased: false,
        }
    }

    async fn new_list(store: &PgStore, owner: Uuid) -> ShoppingList {
        let draft = ShoppingListDraft {
            name: "Saturday market".into(),
            is_active: true,
        };
        Repository::<ShoppingList>::insert(store, owner, (), draft)
            .await
            .unwrap()
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn items_are_scoped_through_their_list(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let list = new_list(&store, alice).await;
        assert!(list.is_active);

        let foreign = Repository::<ShoppingListItem>::insert(&store, bob, list.id, item_draft("Okra", None))
            .await
            .unwrap();
        assert!(foreign.is_none());

        let okra = Repository::<ShoppingListItem>::insert(&store, alice, list.id, item_draft("Okra", Some(1.5)))
            .await
            .unwrap()
            .unwrap();
        Repository::<ShoppingListItem>::insert(&store, alice, list.id, item_draft("Garri", None))
            .await
            .unwrap()
            .unwrap();

        let names: Vec<_> = Repository::<ShoppingListItem>::list(&store, alice, list.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Garri", "Okra"]);
        assert!(Repository::<ShoppingListItem>::list(&store, bob, list.id).await.unwrap().is_empty());

        let mut purchased = item_draft("Okra", None);
        purchased.is_purchased = true;
        assert!(Repository::<ShoppingListItem>::update(&store, bob, okra.id, purchased.clone())
            .await
            .unwrap()
            .is_none());
        let updated = Repository::<ShoppingListItem>::update(&store, alice, okra.id, purchased)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_purchased);
        assert_eq!(updated.estimated_price, None);

        assert!(!Repository::<ShoppingListItem>::delete(&store, bob, okra.id).await.unwrap());
        assert!(Repository::<ShoppingListItem>::delete(&store, alice, okra.id).await.unwrap());
        assert!(!Repository::<ShoppingListItem>::delete(&store, alice, okra.id).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn deleting_a_list_cascades(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let alice = Uuid::new_v4();
        let list = new_list(&store, alice).await;
        let item = Repository::<ShoppingListItem>::insert(&store, alice, list.id, item_draft("Pepper", None))
            .await
            .unwrap()
            .unwrap();

        assert!(!Repository::<ShoppingList>::delete(&store, Uuid::new_v4(), list.id).await.unwrap());
        assert!(Repository::<ShoppingList>::delete(&store, alice, list.id).await.unwrap());
        assert!(Repository::<ShoppingListItem>::get(&store, alice, item.id).await.unwrap().is_none());
        assert!(Repository::<ShoppingList>::list(&store, alice, ()).await.unwrap().is_empty());
    }
}
