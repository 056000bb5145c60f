//! Next-departure lookups.
//!
//! The route planner only needs a single question answered: "when does the
//! next train leave this station on this line?". Anything that can answer it
//! implements [`DepartureOracle`]; [`Timetable`] is the CSV-backed
//! implementation loaded once at start-up.

mod timetable;

use chrono::{Duration, NaiveTime};

pub use timetable::{ScheduleError, Timetable, parse_departure};

/// Answers next-departure queries.
pub trait DepartureOracle {
    /// Earliest departure of `line` from `station` strictly after
    /// `reference + travel`, or `reference + travel` itself when there is
    /// none.
    fn next_departure(
        &self,
        line: &str,
        station: &str,
        reference: NaiveTime,
        travel: Duration,
    ) -> NaiveTime;
}

impl<F> DepartureOracle for F
where
    F: Fn(&str, &str, NaiveTime, Duration) -> NaiveTime,
{
    fn next_departure(
        &self,
        line: &str,
        station: &str,
        reference: NaiveTime,
        travel: Duration,
    ) -> NaiveTime {
        self(line, station, reference, travel)
    }
}
