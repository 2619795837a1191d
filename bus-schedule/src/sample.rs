//! Demo network installed when a session starts.
//!
//! Two routes share stops S3 and S4, so queries at those stops merge
//! departures from both.

use std::num::NonZeroU32;

use crate::domain::{BusId, InvalidId, RouteId, Schedule, ScheduleError, StopId};
use crate::error::RegistryError;
use crate::registry::ScheduleRegistry;

/// Errors building the demo network.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("bus {0} has zero capacity")]
    ZeroCapacity(&'static str),
}

/// Departure hours from the first stop of each route. Later stops follow at
/// 15 minute intervals.
const BASE_HOURS: [u32; 6] = [7, 8, 9, 15, 16, 17];

/// Minutes between consecutive stops.
const STOP_INTERVAL_MINS: u32 = 15;

/// (route, name, stops)
const ROUTES: [(&str, &str, [&str; 4]); 2] = [
    ("R1", "SMBT", ["S1", "S2", "S3", "S4"]),
    ("R2", "TOWN BUS", ["S3", "S4", "S5", "S6"]),
];

/// (bus, route, capacity)
const BUSES: [(&str, &str, u32); 4] = [
    ("B1", "R1", 50),
    ("B2", "R1", 50),
    ("B3", "R2", 40),
    ("B4", "R2", 40),
];

/// Add the demo routes, schedules and buses to `registry`.
pub fn populate(registry: &mut ScheduleRegistry) -> Result<(), SampleError> {
    for (route, name, stops) in ROUTES {
        let route_id = RouteId::new(route)?;
        let stop_ids = stops
            .into_iter()
            .map(StopId::new)
            .collect::<Result<Vec<_>, _>>()?;

        let schedule = Schedule::parse(stops.into_iter().zip(0u32..).map(|(stop, i)| {
            let minute = i * STOP_INTERVAL_MINS;
            let times: Vec<String> = BASE_HOURS
                .iter()
                .map(|hour| format!("{hour:02}:{minute:02}"))
                .collect();
            (stop, times)
        }))?;

        registry.add_route(route_id.clone(), stop_ids, name);
        registry.add_schedule(route_id, schedule)?;
    }

    for (bus, route, capacity) in BUSES {
        let capacity = NonZeroU32::new(capacity).ok_or(SampleError::ZeroCapacity(bus))?;
        registry.add_bus(BusId::new(bus)?, RouteId::new(route)?, capacity);
    }

    Ok(())
}
