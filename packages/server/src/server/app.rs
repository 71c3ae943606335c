//! Application setup and router configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::{JobStore, JobSupervisor, ServerDeps};
use crate::server::routes::{fetch_crew_handler, health_handler, submit_crew_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub jobs: JobStore,
    pub supervisor: JobSupervisor,
    pub deps: Arc<ServerDeps>,
}

impl AppState {
    pub fn new(deps: ServerDeps) -> Self {
        let jobs = JobStore::new();
        Self {
            supervisor: JobSupervisor::new(jobs.clone()),
            jobs,
            deps: Arc::new(deps),
        }
    }
}

/// Build the Axum application router with a fresh job store.
pub fn build_app(deps: ServerDeps) -> Router {
    build_app_with_state(AppState::new(deps))
}

/// Build the router around existing state, so callers can inspect the store.
pub fn build_app_with_state(app_state: AppState) -> Router {
    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/crew", post(submit_crew_handler))
        .route("/api/crew/:job_id", get(fetch_crew_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
