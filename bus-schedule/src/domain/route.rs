//! Bus routes.

use serde::{Deserialize, Serialize};

use super::StopId;

/// A named, ordered sequence of stops.
///
/// The order of `stops` is the order a bus travels along the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Display name, e.g. "TOWN BUS".
    pub route_name: String,
    /// Stops in traversal order.
    pub stops: Vec<StopId>,
    /// Always true for routes created through the registry.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Route {
    /// Create an active route.
    pub fn new(route_name: impl Into<String>, stops: Vec<StopId>) -> Self {
        Self {
            route_name: route_name.into(),
            stops,
            active: true,
        }
    }

    /// Whether the route calls at the given stop.
    pub fn serves(&self, stop: &str) -> bool {
        self.stops.iter().any(|s| s.as_str() == stop)
    }

    /// Stops joined in traversal order, e.g. "S1 -> S2 -> S3".
    pub fn stops_display(&self) -> String {
        self.stops
            .iter()
            .map(StopId::as_str)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
