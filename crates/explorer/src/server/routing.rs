//! Axum router configuration for all endpoints

use axum::{
  routing::{get, post},
  Router,
};

use crate::server::handlers::{experiments, status};
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    // Experiment endpoints
    .route("/api/generate", post(experiments::generate))
    .route("/api/experiments", get(experiments::list_experiments))
    .route("/api/experiments/{id}", get(experiments::get_experiment).delete(experiments::delete_experiment))
    .route("/api/export/{id}", get(experiments::export_experiment))
    .with_state(state)
}
