//! Defines the Axum API routes and handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::checkout::{SimulationParams, run_simulation};
use crate::web::models::{HealthResponse, RunSimulationQuery};

pub struct AppStateInner {
    /// Parameters used for anything a request leaves out
    pub defaults: SimulationParams,
}
pub type AppState = Arc<AppStateInner>;

/// Helper to create a JSON error response with a message and status code
fn json_error(message: &str, status: StatusCode) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Creates the Axum router with all the API endpoints.
pub fn create_router(defaults: SimulationParams, cors_enabled: bool) -> Router {
    let state = Arc::new(AppStateInner { defaults });
    let router = Router::new()
        .route("/run-simulation", get(run_simulation_handler))
        .route("/health", get(health))
        .with_state(state);
    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Router with the built-in defaults
pub fn app() -> Router {
    create_router(SimulationParams::default(), true)
}

/// GET /run-simulation
async fn run_simulation_handler(
    State(state): State<AppState>,
    query: Result<Query<RunSimulationQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::warn!("Malformed simulation query: {}", rejection);
            return json_error(&rejection.body_text(), rejection.status());
        }
    };
    let params = query.into_params(&state.defaults);
    // The run is CPU-bound; keep it off the async workers.
    match tokio::task::spawn_blocking(move || run_simulation(&params)).await {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(e)) => {
            tracing::warn!("Rejected simulation request: {}", e);
            json_error(&e.to_string(), StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!("Simulation task failed: {}", e);
            json_error("Internal error", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
