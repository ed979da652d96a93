//! Ownership-scoped reads on top of the record store.
//!
//! "Not yours" and "does not exist" both surface as [`AppError::NotFound`].

use uuid::Uuid;

use crate::errors::AppError;
use crate::store::{ChildRecord, Record, RecordStore, Repository};

pub async fn list_owned<R>(
    store: &(dyn RecordStore + 'static),
    owner: Uuid,
    parent: R::Parent,
) -> Result<Vec<R>, AppError>
where
    R: Record,
    dyn RecordStore: Repository<R>,
{
    Ok(Repository::<R>::list(store, owner, parent).await?)
}

pub async fn get_owned<R>(
    store: &(dyn RecordStore + 'static),
    owner: Uuid,
    id: Uuid,
) -> Result<R, AppError>
where
    R: Record,
    dyn RecordStore: Repository<R>,
{
    Repository::<R>::get(store, owner, id)
        .await?
        .ok_or(AppError::NotFound(R::KIND))
}

/// Resolves the parent of a child collection, failing with `NotFound` when it
/// is missing or owned by someone else.
pub async fn require_parent<R>(
    store: &(dyn RecordStore + 'static),
    owner: Uuid,
    parent_id: Uuid,
) -> Result<R::ParentRecord, AppError>
where
    R: ChildRecord,
    dyn RecordStore: Repository<R::ParentRecord>,
{
    get_owned::<R::ParentRecord>(store, owner, parent_id).await
}
