use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{MealPlan, MealPlanDraft, MealPlanEntry, MealPlanEntryDraft};
use crate::store::{PgStore, Repository, StoreResult};

#[async_trait]
impl Repository<MealPlan> for PgStore {
    async fn list(&self, owner: Uuid, _parent: ()) -> StoreResult<Vec<MealPlan>> {
        let rows = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, start_date, end_date, created_at, updated_at
              FROM meal_plans
             WHERE user_id = $1
             ORDER BY created_at DESC, id
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, start_date, end_date, created_at, updated_at
              FROM meal_plans
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn insert(&self, owner: Uuid, _parent: (), draft: MealPlanDraft) -> StoreResult<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            INSERT INTO meal_plans (user_id, name, start_date, end_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(&draft.name)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .fetch_one(self.pool())
        .await?;
        Ok(Some(row))
    }

    async fn update(&self, owner: Uuid, id: Uuid, draft: MealPlanDraft) -> StoreResult<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            UPDATE meal_plans
               SET name = $3, start_date = $4, end_date = $5, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&draft.name)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        // meal_plan_entries.meal_plan_id is ON DELETE CASCADE
        let done = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool())
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<MealPlanEntry> for PgStore {
    async fn list(&self, owner: Uuid, plan_id: Uuid) -> StoreResult<Vec<MealPlanEntry>> {
        let rows = sqlx::query_as::<_, MealPlanEntry>(
            r#"
            SELECT e.id, e.meal_plan_id, e.recipe_id, e.date, e.meal_type, e.servings, e.notes
              FROM meal_plan_entries e
              JOIN meal_plans p ON p.id = e.meal_plan_id
             WHERE e.meal_plan_id = $1 AND p.user_id = $2
             ORDER BY e.date, e.id
            "#,
        )
        .bind(plan_id)
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<MealPlanEntry>> {
        let row = sqlx::query_as::<_, MealPlanEntry>(
            r#"
            SELECT e.id, e.meal_plan_id, e.recipe_id, e.date, e.meal_type, e.servings, e.notes
              FROM meal_plan_entries e
              JOIN meal_plans p ON p.id = e.meal_plan_id
             WHERE e.id = $1 AND p.user_id = $2
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
        plan_id: Uuid,
        draft: MealPlanEntryDraft,
    ) -> StoreResult<Option<MealPlanEntry>> {
        // Inserts nothing unless the plan exists and belongs to `owner`.
        let row = sqlx::query_as::<_, MealPlanEntry>(
            r#"
            INSERT INTO meal_plan_entries (meal_plan_id, recipe_id, date, meal_type, servings, notes)
            SELECT p.id, $3, $4, $5, $6, $7
              FROM meal_plans p
             WHERE p.id = $1 AND p.user_id = $2
            RETURNING id, meal_plan_id, recipe_id, date, meal_type, servings, notes
            "#,
        )
        .bind(plan_id)
        .bind(owner)
        .bind(draft.recipe_id)
        .bind(draft.date)
        .bind(draft.meal_type.as_str())
        .bind(draft.servings)
        .bind(&draft.notes)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: MealPlanEntryDraft,
    ) -> StoreResult<Option<MealPlanEntry>> {
        let row = sqlx::query_as::<_, MealPlanEntry>(
            r#"
            UPDATE meal_plan_entries e
               SET recipe_id = $3, date = $4, meal_type = $5, servings = $6, notes = $7
              FROM meal_plans p
             WHERE e.id = $1 AND p.id = e.meal_plan_id AND p.user_id = $2
            RETURNING e.id, e.meal_plan_id, e.recipe_id, e.date, e.meal_type, e.servings, e.notes
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(draft.recipe_id)
        .bind(draft.date)
        .bind(draft.meal_type.as_str())
        .bind(draft.servings)
        .bind(&draft.notes)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let done = sqlx::query(
            r#"
            DELETE FROM meal_plan_entries e
             USING meal_plans p
             WHERE e.id = $1 AND p.id = e.meal_plan_id AND p.user_id = $2
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
    use time::macros::date;

    use super::*;
    use crate::meal_plans::repo_types::MealType;

    fn plan_draft(name: &str) -> MealPlanDraft {
        MealPlanDraft {
            name: name.into(),
            start_date: date!(2024 - 10 - 07),
            end_date: date!(2024 - 10 - 13),
        }
    }

    fn entry_draft(day: time::Date, servings: i32) -> MealPlanEntryDraft {
        MealPlanEntryDraft {
            recipe_id: None,
            date: day,
            meal_type: MealType::Lunch,
            servings,
            notes: String::new(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn plans_are_scoped_to_their_owner(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        let first = Repository::<MealPlan>::insert(&store, alice, (), plan_draft("first"))
            .await
            .unwrap()
            .unwrap();
        let second = Repository::<MealPlan>::insert(&store, alice, (), plan_draft("second"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.user_id, alice);

        let listed = Repository::<MealPlan>::list(&store, alice, ()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|p| p.id == second.id));
        assert!(Repository::<MealPlan>::list(&store, bob, ()).await.unwrap().is_empty());

        assert!(Repository::<MealPlan>::get(&store, bob, first.id).await.unwrap().is_none());
        let hijack = Repository::<MealPlan>::update(&store, bob, first.id, plan_draft("mine"))
            .await
            .unwrap();
        assert!(hijack.is_none());
        assert!(!Repository::<MealPlan>::delete(&store, bob, first.id).await.unwrap());

        let renamed = Repository::<MealPlan>::update(&store, alice, first.id, plan_draft("renamed"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "renamed");
        assert_eq!(renamed.created_at, first.created_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn entries_go_through_the_plan_owner(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let plan = Repository::<MealPlan>::insert(&store, alice, (), plan_draft("week"))
            .await
            .unwrap()
            .unwrap();

        let foreign = Repository::<MealPlanEntry>::insert(&store, bob, plan.id, entry_draft(date!(2024 - 10 - 08), 2))
            .await
            .unwrap();
        assert!(foreign.is_none());

        let later = Repository::<MealPlanEntry>::insert(&store, alice, plan.id, entry_draft(date!(2024 - 10 - 10), 2))
            .await
            .unwrap()
            .unwrap();
        let earlier = Repository::<MealPlanEntry>::insert(&store, alice, plan.id, entry_draft(date!(2024 - 10 - 08), 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(later.meal_type, MealType::Lunch);

        let listed = Repository::<MealPlanEntry>::list(&store, alice, plan.id).await.unwrap();
        assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), [earlier.id, later.id]);
        assert!(Repository::<MealPlanEntry>::list(&store, bob, plan.id).await.unwrap().is_empty());

        assert!(Repository::<MealPlanEntry>::get(&store, bob, later.id).await.unwrap().is_none());
        let hijack = Repository::<MealPlanEntry>::update(&store, bob, later.id, entry_draft(date!(2024 - 10 - 09), 9))
            .await
            .unwrap();
        assert!(hijack.is_none());
        assert!(!Repository::<MealPlanEntry>::delete(&store, bob, later.id).await.unwrap());

        let updated = Repository::<MealPlanEntry>::update(&store, alice, later.id, entry_draft(date!(2024 - 10 - 09), 4))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.servings, 4);
        assert_eq!(updated.meal_plan_id, plan.id);

        assert!(Repository::<MealPlan>::delete(&store, alice, plan.id).await.unwrap());
        assert!(Repository::<MealPlanEntry>::get(&store, alice, earlier.id).await.unwrap().is_none());
        let orphaned: i64 = sqlx::query_scalar("SELECT count(*) FROM meal_plan_entries")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(orphaned, 0);
    }
}
