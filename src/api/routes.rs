use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{backups, health, inject, prompts, session};
use super::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // SECURITY: Restrict CORS to localhost only - sidecar should only be accessed locally
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:1420".parse::<HeaderValue>().unwrap(),
            "http://localhost:5173".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:1420".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:5173".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Browser session
        .route("/session", post(session::launch_session))
        .route("/session", delete(session::close_session))
        .route("/session/navigate", post(session::navigate_session))
        // Injection
        .route("/inject", post(inject::inject_prompt))
        .route("/target", get(inject::probe_target))
        // Prompt library
        .route("/prompts", get(prompts::list_prompts))
        .route("/prompts", post(prompts::create_prompt))
        .route("/prompts/export", get(prompts::export_prompts))
        .route("/prompts/import", post(prompts::import_prompts))
        .route("/prompts/:id", get(prompts::get_prompt))
        .route("/prompts/:id", put(prompts::update_prompt))
        .route("/prompts/:id", delete(prompts::delete_prompt))
        .route("/prompts/:id/favorite", post(prompts::toggle_favorite))
        .route("/tags", get(prompts::list_tags))
        // Backups
        .route("/backups", get(backups::list_backups))
        .route("/backups", post(backups::create_backup))
        .route("/backups/:id/restore", post(backups::restore_backup))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
