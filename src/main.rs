mod app;
mod auth;
mod config;
mod crud;
mod errors;
mod meal_plans;
mod nutrition;
mod ownership;
mod shopping;
mod state;
mod store;
#[cfg(test)]
mod test_support;
mod wire;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "mealplanner=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;
    tracing::info!(store = app_state.config.store.name(), "state initialized");

    app::serve(app::build_app(app_state)).await
}
