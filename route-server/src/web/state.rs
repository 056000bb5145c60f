//! Application state for the web layer.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::planner::RouteTable;
use crate::schedule::Timetable;

/// Shared application state.
///
/// The route table is published behind a lock that is only held long enough
/// to clone or replace the inner `Arc`; queries never block a rebuild.
#[derive(Clone)]
pub struct AppState {
    /// Currently published route table
    table: Arc<RwLock<Arc<RouteTable>>>,

    /// Departure timetable, if one was configured
    pub timetable: Option<Arc<Timetable>>,

    /// Station CSV used by rebuilds
    pub stations_csv: Option<PathBuf>,

    /// Where rebuilt tables are saved, if anywhere
    pub snapshot_dir: Option<PathBuf>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(RwLock::new(Arc::new(table))),
            timetable: None,
            stations_csv: None,
            snapshot_dir: None,
        }
    }

    pub fn with_timetable(mut self, timetable: Timetable) -> Self {
        self.timetable = Some(Arc::new(timetable));
        self
    }

    pub fn with_stations_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.stations_csv = Some(path.into());
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    /// The published table. Later publications don't affect the returned
    /// handle.
    pub fn current(&self) -> Arc<RouteTable> {
        let guard = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Atomically replace the published table.
    pub fn publish(&self, table: RouteTable) {
        let table = Arc::new(table);
        let mut guard = self.table.write().unwrap_or_else(PoisonError::into_inner);
        *guard = table;
    }
}
