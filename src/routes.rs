// src/routes.rs

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{content, generation, quiz, session},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Session routes carry every user action as one request.
/// * Unmatched paths fall back to the static form page.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: [HeaderValue; 2] = [
        "http://localhost:3000".parse().expect("valid origin"),
        "http://127.0.0.1:3000".parse().expect("valid origin"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let session_routes = Router::new()
        .route("/", post(session::create_session))
        .route(
            "/{id}",
            get(session::get_session).delete(session::delete_session),
        )
        .route(
            "/{id}/content",
            post(content::upload_content)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/{id}/generate", post(generation::generate_material))
        .route("/{id}/answers/{index}", put(quiz::select_answer))
        .route("/{id}/submit", post(quiz::submit_quiz))
        .route("/{id}/reset", post(session::reset_session));

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .nest("/api/sessions", session_routes)
        .fallback_service(static_files)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
