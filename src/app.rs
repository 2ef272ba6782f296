use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/api/goals/:id",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/api/goals/:id/activate", post(handlers::activate_goal))
        .route("/api/goals/:id/stats", get(handlers::get_stats))
        .route("/api/goals/:id/weeks/:week", put(handlers::set_week_profit))
        .route("/api/goals/:id/entries", post(handlers::add_entry))
        .route(
            "/api/goals/:id/weeks/:week/entries/:entry_id",
            delete(handlers::remove_entry),
        )
        .route("/api/goals/:id/export.json", get(handlers::export_json))
        .route("/api/goals/:id/export.csv", get(handlers::export_csv_file))
        .route("/api/goals/:id/import", post(handlers::import_goal))
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        .route("/api/notifications", get(handlers::notifications))
        .with_state(state)
}
