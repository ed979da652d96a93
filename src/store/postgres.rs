use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{NutritionCatalog, StoreResult};
use crate::nutrition::repo_types::NutritionInfo;

/// Postgres-backed store. Record-specific queries live next to each record
/// type (`meal_plans::repo`, `shopping::repo`).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl NutritionCatalog for PgStore {
    async fn list_nutrition(&self) -> StoreResult<Vec<NutritionInfo>> {
        let rows = sqlx::query_as::<_, NutritionInfo>(
            r#"
            SELECT id, name, calories_per_100g, protein_per_100g, carbs_per_100g,
                   fat_per_100g, fiber_per_100g, sugar_per_100g
              FROM nutrition_info
             ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_nutrition(&self, id: Uuid) -> StoreResult<Option<NutritionInfo>> {
        let row = sqlx::query_as::<_, NutritionInfo>(
            r#"
            SELECT id, name, calories_per_100g, protein_per_100g, carbs_per_100g,
                   fat_per_100g, fiber_per_100g, sugar_per_100g
              FROM nutrition_info
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
