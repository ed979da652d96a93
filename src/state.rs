use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::config::{AppConfig, StoreBackend};
use crate::nutrition::repo_types::NutritionInfo;
use crate::store::{MemoryStore, PgStore, RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn RecordStore> = match &config.store {
            StoreBackend::Postgres {
                database_url,
                max_connections,
            } => {
                let pg = PgStore::connect(database_url, *max_connections).await?;
                if let Err(e) = sqlx::migrate!("./migrations").run(pg.pool()).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(pg)
            }
            StoreBackend::Memory { nutrition_seed } => {
                tracing::warn!("using in-memory store; data is lost on restart");
                let memory = match nutrition_seed {
                    Some(path) => MemoryStore::with_nutrition(load_nutrition_seed(path)?),
                    None => {
                        tracing::warn!("no NUTRITION_SEED_FILE; nutrition info will be empty");
                        MemoryStore::new()
                    }
                };
                Arc::new(memory)
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn RecordStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// In-memory state with a fixed token secret, for handler tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with(MemoryStore::new())
    }

    #[cfg(test)]
    pub fn fake_with(store: MemoryStore) -> Self {
        let config = Arc::new(AppConfig {
            store: StoreBackend::Memory {
                nutrition_seed: None,
            },
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "authenticated".into(),
            },
        });
        Self::from_parts(Arc::new(store), config)
    }
}

/// Reads nutrition reference rows for the in-memory backend.
fn load_nutrition_seed(path: &Path) -> anyhow::Result<Vec<NutritionInfo>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read nutrition seed {}", path.display()))?;
    let rows: Vec<NutritionInfo> = serde_json::from_str(&text)
        .with_context(|| format!("parse nutrition seed {}", path.display()))?;
    tracing::info!(count = rows.len(), "nutrition seed loaded");
    Ok(rows)
}
