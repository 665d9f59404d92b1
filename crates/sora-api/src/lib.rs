//! SORA API /v1: REST endpoints
//!
//! Wraps the engine for the wizard front end: one-shot assessments, owner
//! scoped study records with their files, and dossier export.
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

pub const ADDR_ENV: &str = "SORA_ADDR";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/assessments", post(handlers::create_assessment))
        .route("/v1/studies", post(handlers::create_study).get(handlers::list_studies))
        .route(
            "/v1/studies/{id}",
            get(handlers::get_study)
                .put(handlers::update_study)
                .delete(handlers::delete_study),
        )
        .route("/v1/studies/{id}/dossier", get(handlers::study_dossier))
        .route("/v1/studies/{id}/files", delete(handlers::delete_study_file))
        .route("/v1/studies/{id}/files/{category}", post(handlers::upload_study_file))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: &str, state: AppState) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("SORA API listening on {}", addr);
    axum::serve(listener, app).await
}
