//! Departure query results.

use std::fmt;

use super::{DepartureTime, RouteId};

/// One upcoming departure from a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub route_id: RouteId,
    pub route_name: String,
    pub time: DepartureTime,
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Route: {} ({}) - Time: {}",
            self.route_name, self.route_id, self.time
        )
    }
}
