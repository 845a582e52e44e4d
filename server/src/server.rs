use crate::web;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared::{Parameters, ServerError, SimError, SimulationReport, SimulationRequest};
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Longest run a single request may ask for
pub const MAX_YEARS: u32 = 10_000;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct AppState {
    pub max_years: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            max_years: MAX_YEARS,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/simulate", post(handle_simulate))
        .route("/api/parameters", get(handle_parameters))
        .route("/health", get(web::health))
        .route("/healthz", get(web::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    let app = router(AppState::default());
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("simulation task failed: {0}")]
    Internal(String),
}

impl From<SimError> for ApiError {
    fn from(err: SimError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, ServerError::InvalidRequest(msg))
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ServerError::InternalError(msg))
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Run a simulation from scratch and return its yearly record
async fn handle_simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulationReport>, ApiError> {
    if request.years > state.max_years {
        return Err(ApiError::InvalidRequest(format!(
            "{} years requested, at most {} allowed",
            request.years, state.max_years
        )));
    }

    let report = tokio::task::spawn_blocking(move || sim::run_simulation(&request))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    tracing::info!(
        "Run {} completed with {} yearly records",
        report.run_id,
        report.history.len()
    );
    Ok(Json(report))
}

/// Default parameter store
async fn handle_parameters() -> Json<Parameters> {
    Json(Parameters::default())
}
