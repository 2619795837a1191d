//! Per-route departure schedules.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{DepartureTime, InvalidId, StopId, TimeError};

/// Error returned when building a schedule from raw strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error(transparent)]
    InvalidStop(#[from] InvalidId),

    #[error("stop {stop}: {source}")]
    InvalidTime { stop: StopId, source: TimeError },
}

/// Departure times for each stop of one route.
///
/// Stops and the times for each stop are kept in the order they were
/// supplied. Times are not sorted or de-duplicated.
///
/// # Examples
///
/// ```
/// use bus_schedule::domain::Schedule;
///
/// let schedule = Schedule::parse([
///     ("S1", vec!["07:00", "08:00"]),
///     ("S2", vec!["07:15", "08:15"]),
/// ])
/// .unwrap();
///
/// assert_eq!(schedule.times_at("S2")[1].to_string(), "08:15");
/// assert!(schedule.times_at("S9").is_empty());
///
/// // Malformed times are rejected
/// assert!(Schedule::parse([("S1", vec!["7:00"])]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(IndexMap<StopId, Vec<DepartureTime>>);

impl Schedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schedule from stop identifiers and "HH:MM" strings.
    pub fn parse<I, S, T, V>(entries: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let mut schedule = Self::new();
        for (stop, times) in entries {
            let stop = StopId::new(stop)?;
            let times = times
                .into_iter()
                .map(|t| DepartureTime::parse_hhmm(t.as_ref()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| ScheduleError::InvalidTime {
                    stop: stop.clone(),
                    source,
                })?;
            schedule.insert(stop, times);
        }
        Ok(schedule)
    }

    /// Set the departures for a stop, replacing any previous list.
    pub fn insert(&mut self, stop: StopId, times: Vec<DepartureTime>) {
        self.0.insert(stop, times);
    }

    /// Departures at a stop, in supplied order. Empty if the stop has none.
    pub fn times_at(&self, stop: &str) -> &[DepartureTime] {
        self.0.get(stop).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Iterate over stops and their departures, in the order stops were added.
    pub fn iter(&self) -> impl Iterator<Item = (&StopId, &[DepartureTime])> {
        self.0.iter().map(|(stop, times)| (stop, times.as_slice()))
    }

    /// Number of stops with an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no stop has an entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
