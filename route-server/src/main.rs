use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_server::dump::{load_snapshot, save_snapshot, snapshot_exists};
use route_server::network::CostMode;
use route_server::planner::{NetworkConfig, RouteTable};
use route_server::registry::load_stations_csv;
use route_server::schedule::Timetable;
use route_server::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Log a start-up failure and exit.
fn fatal(context: &str, err: impl Display) -> ! {
    error!(error = %err, "{context}");
    std::process::exit(1);
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_server=info,tower_http=info")),
        )
        .init();

    let config = NetworkConfig::default();

    let mode = match std::env::var("ROUTE_COST_MODE") {
        Ok(name) => match name.parse::<CostMode>() {
            Ok(CostMode::Factor(_)) => CostMode::Factor(config.factor_weights),
            Ok(mode) => mode,
            Err(e) => fatal("Invalid ROUTE_COST_MODE", e),
        },
        Err(_) => CostMode::Distance,
    };

    let stations_csv = env_path("ROUTE_STATIONS_CSV");
    let snapshot_dir = env_path("ROUTE_SNAPSHOT_DIR");

    let table = match (&snapshot_dir, &stations_csv) {
        (Some(dir), _) if snapshot_exists(dir) => {
            load_snapshot(dir, config, mode).unwrap_or_else(|e| fatal("Failed to load snapshot", e))
        }
        (_, Some(csv)) => {
            let stations = load_stations_csv(csv, config.start_id, config.default_weight)
                .unwrap_or_else(|e| fatal("Failed to load stations", e));
            let table = RouteTable::from_stations(stations, config, mode);
            if let Some(dir) = &snapshot_dir {
                if let Err(e) = save_snapshot(dir, &table) {
                    warn!(error = %e, dir = %dir.display(), "Failed to save snapshot");
                }
            }
            table
        }
        _ => fatal(
            "No station data",
            "set ROUTE_STATIONS_CSV or point ROUTE_SNAPSHOT_DIR at a saved snapshot",
        ),
    };

    let mut state = AppState::new(table);
    if let Some(csv) = stations_csv {
        state = state.with_stations_csv(csv);
    }
    if let Some(dir) = snapshot_dir {
        state = state.with_snapshot_dir(dir);
    }
    if let Some(path) = env_path("ROUTE_TIMETABLE_CSV") {
        let timetable = Timetable::load(&path).unwrap_or_else(|e| fatal("Failed to load timetable", e));
        state = state.with_timetable(timetable);
    }

    let app = create_router(state);

    let addr: SocketAddr = std::env::var("ROUTE_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .unwrap_or_else(|e| fatal("Invalid ROUTE_ADDR", e));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| fatal("Failed to bind", e));
    info!(%addr, "Route server listening");
    info!("  GET  /health         - Health check");
    info!("  GET  /stations       - List stations");
    info!("  GET  /route          - Plan a route (?origin=&destination=[&time=])");
    info!("  POST /admin/rebuild  - Rebuild from the station CSV");

    if let Err(e) = axum::serve(listener, app).await {
        fatal("Server error", e);
    }
}
