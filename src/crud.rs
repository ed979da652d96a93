//! Request handlers shared by every owner-scoped resource family.
//!
//! Each family mounts these with its record type, e.g.
//! `get(crud::list::<MealPlan>).post(crud::create::<MealPlan>)`.

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    Json,
};
use tracing::{debug, info, instrument};

use crate::{
    app::API_PREFIX,
    auth::AuthUser,
    errors::AppError,
    ownership::{get_owned, list_owned, require_parent},
    state::AppState,
    store::{ChildRecord, Record, RecordStore, Repository},
    wire::{RecordId, WireObject, WireRecord, WriteMode},
};

type Created<R> = (StatusCode, [(HeaderName, String); 1], Json<R>);

fn created<R: WireRecord>(record: R) -> Created<R> {
    let location = format!("{}{}/{}", API_PREFIX, R::DETAIL_PATH, record.id());
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(record))
}

// --- collections of records owned directly by the principal ---

#[instrument(skip(state), fields(kind = R::KIND))]
pub async fn list<R>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<R>>, AppError>
where
    R: WireRecord<Parent = ()>,
    dyn RecordStore: Repository<R>,
{
    let records = list_owned::<R>(state.store.as_ref(), user_id, ()).await?;
    debug!(count = records.len(), "listed");
    Ok(Json(records))
}

#[instrument(skip(state, body), fields(kind = R::KIND))]
pub async fn create<R>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: WireObject,
) -> Result<Created<R>, AppError>
where
    R: WireRecord<Parent = ()>,
    dyn RecordStore: Repository<R>,
{
    let draft = R::from_wire(&body, None, WriteMode::Create)?;
    let record = Repository::<R>::insert(state.store.as_ref(), user_id, (), draft)
        .await?
        .ok_or(AppError::NotFound(R::KIND))?;
    info!(id = %record.id(), %user_id, "created");
    Ok(created(record))
}

// --- collections nested under a parent record ---

#[instrument(skip(state), fields(kind = R::KIND))]
pub async fn list_children<R>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecordId(parent_id): RecordId,
) -> Result<Json<Vec<R>>, AppError>
where
    R: WireRecord + ChildRecord,
    dyn RecordStore: Repository<R> + Repository<R::ParentRecord>,
{
    require_parent::<R>(state.store.as_ref(), user_id, parent_id).await?;
    let records = list_owned::<R>(state.store.as_ref(), user_id, parent_id).await?;
    debug!(count = records.len(), "listed");
    Ok(Json(records))
}

#[instrument(skip(state, body), fields(kind = R::KIND))]
pub async fn create_child<R>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecordId(parent_id): RecordId,
    body: WireObject,
) -> Result<Created<R>, AppError>
where
    R: WireRecord + ChildRecord,
    dyn RecordStore: Repository<R> + Repository<R::ParentRecord>,
{
    require_parent::<R>(state.store.as_ref(), user_id, parent_id).await?;
    let draft = R::from_wire(&body, None, WriteMode::Create)?;
    // The parent may vanish between the check and the insert.
    let record = Repository::<R>::insert(state.store.as_ref(), user_id, parent_id, draft)
        .await?
        .ok_or(AppError::NotFound(R::KIND))?;
    info!(id = %record.id(), %parent_id, %user_id, "created");
    Ok(created(record))
}

// --- single records ---

#[instrument(skip(state), fields(kind = R::KIND))]
pub async fn retrieve<R>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecordId(id): RecordId,
) -> Result<Json<R>, AppError>
where
    R: WireRecord,
    dyn RecordStore: Repository<R>,
{
    Ok(Json(get_owned::<R>(state.store.as_ref(), user_id, id).await?))
}

pub async fn replace<R>(
    state: State<AppState>,
    user: AuthUser,
    id: RecordId,
    body: WireObject,
) -> Result<Json<R>, AppError>
where
    R: WireRecord,
    dyn RecordStore: Repository<R>,
{
    update::<R>(state, user, id, body, WriteMode::Replace).await
}

pub async fn patch<R>(
    state: State<AppState>,
    user: AuthUser,
    id: RecordId,
    body: WireObject,
) -> Result<Json<R>, AppError>
where
    R: WireRecord,
    dyn RecordStore: Repository<R>,
{
    update::<R>(state, user, id, body, WriteMode::Patch).await
}

#[instrument(skip(state, body), fields(kind = R::KIND))]
async fn update<R>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecordId(id): RecordId,
    body: WireObject,
    mode: WriteMode,
) -> Result<Json<R>, AppError>
where
    R: WireRecord,
    dyn RecordStore: Repository<R>,
{
    let current = get_owned::<R>(state.store.as_ref(), user_id, id).await?;
    let draft = R::from_wire(&body, Some(&current.to_draft()), mode)?;
    let record = Repository::<R>::update(state.store.as_ref(), user_id, id, draft)
        .await?
        .ok_or(AppError::NotFound(R::KIND))?;
    info!(%id, %user_id, "updated");
    Ok(Json(record))
}

#[instrument(skip(state), fields(kind = R::KIND))]
pub async fn destroy<R>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecordId(id): RecordId,
) -> Result<StatusCode, AppError>
where
    R: Record,
    dyn RecordStore: Repository<R>,
{
    if Repository::<R>::delete(state.store.as_ref(), user_id, id).await? {
        info!(%id, %user_id, "deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(R::KIND))
    }
}
