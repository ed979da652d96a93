//! Persistent record storage.
//!
//! Every method that touches user data takes the requesting principal and
//! applies ownership in the store itself: top-level records match on their
//! `user_id`, child records match through their parent's `user_id`. A record
//! owned by someone else is reported exactly like a missing one.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::meal_plans::repo_types::{MealPlan, MealPlanEntry};
use crate::nutrition::repo_types::NutritionInfo;
use crate::shopping::repo_types::{ShoppingList, ShoppingListItem};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached or the pool gave up.
    #[error("database unavailable: {0}")]
    Unavailable(sqlx::Error),
    /// The database answered, but the query or row decoding failed.
    #[error("database error: {0}")]
    Query(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e),
            other => StoreError::Query(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored record type and the shape of its caller-writable fields.
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable name used in logs and not-found errors.
    const KIND: &'static str;
    /// Caller-writable fields; everything else is assigned by the store.
    type Draft: Clone + Send + Sync + 'static;
    /// `()` for records owned directly, the parent id for child records.
    type Parent: Copy + Send + Sync + std::fmt::Debug + 'static;

    fn id(&self) -> Uuid;
}

/// A record reachable only through a parent the principal owns.
pub trait ChildRecord: Record<Parent = Uuid> {
    type ParentRecord: Record;
}

#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Records visible to `owner`, narrowed to `parent` for child records.
    /// A parent owned by someone else yields an empty list.
    async fn list(&self, owner: Uuid, parent: R::Parent) -> StoreResult<Vec<R>>;

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<R>>;

    /// `None` when the parent does not exist or is not owned by `owner`.
    async fn insert(&self, owner: Uuid, parent: R::Parent, draft: R::Draft)
        -> StoreResult<Option<R>>;

    /// Replaces the writable fields; `None` when not visible to `owner`.
    async fn update(&self, owner: Uuid, id: Uuid, draft: R::Draft) -> StoreResult<Option<R>>;

    /// Returns whether a record was removed. Children go with their parent.
    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// Read-only reference data, visible to every principal.
#[async_trait]
pub trait NutritionCatalog: Send + Sync {
    async fn list_nutrition(&self) -> StoreResult<Vec<NutritionInfo>>;
    async fn get_nutrition(&self, id: Uuid) -> StoreResult<Option<NutritionInfo>>;
}

pub trait RecordStore:
    Repository<MealPlan>
    + Repository<MealPlanEntry>
    + Repository<ShoppingList>
    + Repository<ShoppingListItem>
    + NutritionCatalog
{
}

impl<T> RecordStore for T where
    T: Repository<MealPlan>
        + Repository<MealPlanEntry>
        + Repository<ShoppingList>
        + Repository<ShoppingListItem>
        + NutritionCatalog
{
}
