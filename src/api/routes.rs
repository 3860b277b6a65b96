use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    ui,
};

use super::handlers;
use super::AppState;

/// Creates the application router: the HTML shell at the root and the JSON
/// API under /api/v1
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(ui::routes())
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        // Books
        .route("/books", get(handlers::list_books).post(handlers::create_book))
        // Checkouts
        .route("/checkouts", post(handlers::create_checkout))
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
        .route("/recommendations/email", post(handlers::email_recommendation))
        .route("/recommendations/checkout", post(handlers::checkout_recommendation))
}
