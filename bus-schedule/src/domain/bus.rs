//! Buses assigned to routes.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::RouteId;

/// Status given to every newly registered bus.
pub const DEFAULT_BUS_STATUS: &str = "active";

/// A vehicle assigned to a route.
///
/// `route_id` is not checked against the registry: a bus may reference a
/// route that has not been added yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    pub route_id: RouteId,
    /// Passenger capacity.
    pub capacity: NonZeroU32,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    DEFAULT_BUS_STATUS.to_string()
}

impl Bus {
    /// Create a bus with the default status.
    pub fn new(route_id: RouteId, capacity: NonZeroU32) -> Self {
        Self {
            route_id,
            capacity,
            status: default_status(),
        }
    }
}
