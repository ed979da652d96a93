mod handlers;
pub mod repo_types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use handlers::{analyze, daily_intake, get_nutrition_info, goals, list_nutrition_info};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/nutrition-info", get(list_nutrition_info))
        .route("/nutrition-info/:id", get(get_nutrition_info))
        .route("/nutrition/analyze", post(analyze))
        .route("/nutrition/daily-intake", get(daily_intake).post(daily_intake))
        .route("/nutrition/goals", get(goals).post(goals))
}
