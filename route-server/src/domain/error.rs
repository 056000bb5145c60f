//! Domain error types.
//!
//! Build-time errors abort a whole dataset build; query-time errors are
//! local to a single origin/destination lookup.

use super::StationId;

/// Errors raised while turning raw records into a station set.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A raw record is missing a required field or carries an invalid value.
    #[error("malformed record at row {row}: field `{field}` {reason}")]
    MalformedRecord {
        row: usize,
        field: &'static str,
        reason: String,
    },

    /// Two stations with the same identifier in one set.
    #[error("duplicate station id {0}")]
    DuplicateStation(StationId),

    /// The CSV source could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub(crate) fn malformed(row: usize, field: &'static str, reason: impl Into<String>) -> Self {
        BuildError::MalformedRecord {
            row,
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by a single route query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The identifier is not part of the current station set.
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// Walking the predecessor chain revisited a station or ran longer than
    /// the station count. Indicates corrupt matrices, not a disconnection.
    #[error("predecessor chain from {origin} to {destination} cycles after {steps} steps")]
    CycleGuardTripped {
        origin: StationId,
        destination: StationId,
        steps: usize,
    },
}
