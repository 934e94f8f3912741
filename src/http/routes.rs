use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Analysis without saving
        .route("/analyze", post(handlers::analyze_transcript))
        // Journal
        .route(
            "/dreams",
            get(handlers::list_dreams).post(handlers::create_dream),
        )
        .route(
            "/dreams/:dream_id",
            get(handlers::get_dream)
                .patch(handlers::update_dream)
                .delete(handlers::delete_dream),
        )
        .route("/dreams/tag/:tag", get(handlers::dreams_by_tag))
        .route("/insights", get(handlers::get_insights))
        // Recording control
        .route("/session", get(handlers::get_session))
        .route("/session/start", post(handlers::start_session))
        .route("/session/stop", post(handlers::stop_session))
        .route("/session/cancel", post(handlers::cancel_session))
        .route("/session/clear", post(handlers::clear_session))
        .route("/session/save", post(handlers::save_session))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
