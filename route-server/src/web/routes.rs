//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{BuildError, QueryError, StationId};
use crate::dump::{DumpError, save_snapshot};
use crate::planner::RouteTable;
use crate::registry::load_stations_csv;
use crate::schedule::parse_departure;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/route", get(plan_route))
        .route("/admin/rebuild", post(rebuild))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every station of the published table.
async fn list_stations(State(state): State<AppState>) -> Json<StationListResponse> {
    let table = state.current();
    let stations = table
        .stations()
        .iter()
        .map(StationResult::from_station)
        .collect();
    Json(StationListResponse { stations })
}

/// Plan the shortest route between two stations.
async fn plan_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let reference = match req.time.as_deref() {
        Some(text) => parse_departure(text).ok_or_else(|| AppError::BadRequest {
            message: format!("Invalid time: {text}"),
        })?,
        None => Local::now().time(),
    };

    let table = state.current();
    let itinerary = match table.plan(StationId(req.origin), StationId(req.destination)) {
        Ok(itinerary) => itinerary,
        // Already logged by the reconstructor; callers see a missing route.
        Err(QueryError::CycleGuardTripped { .. }) => None,
        Err(e) => return Err(AppError::from(e)),
    };

    let Some(mut itinerary) = itinerary else {
        return Ok(Json(RouteResponse::not_found()));
    };

    if let Some(timetable) = &state.timetable {
        itinerary = itinerary.with_departure(timetable.as_ref(), reference);
    }

    Ok(Json(RouteResponse {
        found: true,
        mode: Some(table.mode().name()),
        route: Some(ItineraryResult::from_itinerary(&itinerary)),
    }))
}

/// Rebuild the route table from the configured station CSV and publish it.
///
/// The current table keeps serving until the new one is complete, and stays
/// published if the rebuild fails.
async fn rebuild(State(state): State<AppState>) -> Result<Json<RebuildResponse>, AppError> {
    let Some(path) = state.stations_csv.clone() else {
        return Err(AppError::BadRequest {
            message: "No station source configured".to_string(),
        });
    };

    let current = state.current();
    let config = current.config().clone();
    let mode = current.mode();
    let snapshot_dir = state.snapshot_dir.clone();

    let table = tokio::task::spawn_blocking(move || -> Result<RouteTable, AppError> {
        let stations = load_stations_csv(&path, config.start_id, config.default_weight)?;
        let table = RouteTable::from_stations(stations, config, mode);
        if let Some(dir) = snapshot_dir {
            save_snapshot(&dir, &table)?;
        }
        Ok(table)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Rebuild task failed: {e}"),
    })??;

    let response = RebuildResponse {
        stations: table.stations().len(),
        edges: table.graph().edge_count(),
        mode: table.mode().name(),
    };
    state.publish(table);
    info!(stations = response.stations, edges = response.edges, "Published rebuilt route table");

    Ok(Json(response))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::StationNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            QueryError::CycleGuardTripped { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<BuildError> for AppError {
    fn from(e: BuildError) -> Self {
        AppError::Internal {
            message: format!("Rebuild failed: {e}"),
        }
    }
}

impl From<DumpError> for AppError {
    fn from(e: DumpError) -> Self {
        AppError::Internal {
            message: format!("Saving snapshot failed: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
