use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::repo_types::NutritionInfo;
use crate::{auth::AuthUser, errors::AppError, state::AppState, wire::RecordId};

// --- reference data ---

#[instrument(skip(state))]
pub async fn list_nutrition_info(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<NutritionInfo>>, AppError> {
    let rows = state.store.list_nutrition().await?;
    debug!(count = rows.len(), "listed nutrition info");
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_nutrition_info(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    RecordId(id): RecordId,
) -> Result<Json<NutritionInfo>, AppError> {
    state
        .store
        .get_nutrition(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("nutrition info"))
}

// --- placeholders, authenticated but without behaviour yet ---

fn not_implemented(feature: &str) -> Json<Value> {
    Json(json!({ "message": format!("{feature} not implemented yet") }))
}

pub async fn analyze(AuthUser(_user_id): AuthUser) -> Json<Value> {
    not_implemented("Nutrition analysis")
}

pub async fn daily_intake(AuthUser(_user_id): AuthUser) -> Json<Value> {
    not_implemented("Daily intake tracking")
}

pub async fn goals(AuthUser(_user_id): AuthUser) -> Json<Value> {
    not_implemented("Nutrition goals")
}
