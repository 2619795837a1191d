//! In-memory registry of routes, schedules, buses and stops.
//!
//! The registry owns all four mappings. Every mutation is an overwrite keyed
//! by identifier, and each mapping keeps the order entries were first added.
//! Nothing is ever removed except by [`ScheduleRegistry::load_data`],
//! which replaces the whole state.

use std::num::NonZeroU32;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::domain::{
    Bus, BusId, Departure, DepartureTime, Route, RouteId, Schedule, Stop, StopId,
};
use crate::error::RegistryError;
use crate::store::{self, SnapshotRef};

/// Registry of bus routes and their departure schedules.
///
/// # Examples
///
/// ```
/// use bus_schedule::domain::{DepartureTime, RouteId, Schedule, StopId};
/// use bus_schedule::registry::ScheduleRegistry;
///
/// let mut registry = ScheduleRegistry::new();
/// let r1 = RouteId::new("R1").unwrap();
/// let stops = vec![StopId::new("S1").unwrap(), StopId::new("S2").unwrap()];
/// registry.add_route(r1.clone(), stops, "SMBT");
///
/// let schedule = Schedule::parse([("S1", ["07:00", "09:00"])]).unwrap();
/// registry.add_schedule(r1, schedule).unwrap();
///
/// let now = DepartureTime::parse_hhmm("08:30").unwrap();
/// let next = registry.next_departures_after("S1", now);
/// assert_eq!(next.len(), 1);
/// assert_eq!(next[0].time.to_string(), "09:00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRegistry {
    routes: IndexMap<RouteId, Route>,
    schedules: IndexMap<RouteId, Schedule>,
    buses: IndexMap<BusId, Bus>,
    stops: IndexMap<StopId, Stop>,
}

impl ScheduleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route, replacing any route with the same identifier.
    ///
    /// A replaced route keeps its original position.
    pub fn add_route(&mut self, route_id: RouteId, stops: Vec<StopId>, route_name: &str) {
        debug!(route = %route_id, name = route_name, stops = stops.len(), "add route");
        self.routes.insert(route_id, Route::new(route_name, stops));
    }

    /// Register a bus, replacing any bus with the same identifier.
    ///
    /// The route is not required to exist.
    pub fn add_bus(&mut self, bus_id: BusId, route_id: RouteId, capacity: NonZeroU32) {
        debug!(bus = %bus_id, route = %route_id, capacity = capacity.get(), "add bus");
        self.buses.insert(bus_id, Bus::new(route_id, capacity));
    }

    /// Set the schedule for a route, replacing any previous schedule.
    ///
    /// Fails with [`RegistryError::RouteNotFound`] if the route is not registered.
    pub fn add_schedule(
        &mut self,
        route_id: RouteId,
        schedule: Schedule,
    ) -> Result<(), RegistryError> {
        if !self.routes.contains_key(&route_id) {
            return Err(RegistryError::RouteNotFound(route_id));
        }
        debug!(route = %route_id, stops = schedule.len(), "add schedule");
        self.schedules.insert(route_id, schedule);
        Ok(())
    }

    /// Departures from a stop later than the current local time of day.
    pub fn get_next_bus(&self, stop_id: &str) -> Vec<Departure> {
        self.next_departures_after(stop_id, DepartureTime::now())
    }

    /// Departures from a stop strictly later than `current_time`.
    ///
    /// Every scheduled route whose stop list includes `stop_id` contributes
    /// its departures at that stop. The result is sorted by time; departures
    /// at the same time keep the order their schedules were added, then
    /// the order of the stop's time list. An unknown
    /// stop gives an empty result.
    pub fn next_departures_after(
        &self,
        stop_id: &str,
        current_time: DepartureTime,
    ) -> Vec<Departure> {
        let mut departures: Vec<Departure> = self
            .schedules
            .iter()
            .filter_map(|(route_id, schedule)| {
                let route = self.routes.get(route_id)?;
                route.serves(stop_id).then_some((route_id, route, schedule))
            })
            .flat_map(|(route_id, route, schedule)| {
                schedule
                    .times_at(stop_id)
                    .iter()
                    .filter(move |&&time| time > current_time)
                    .map(move |&time| Departure {
                        route_id: route_id.clone(),
                        route_name: route.route_name.clone(),
                        time,
                    })
            })
            .collect();

        departures.sort_by_key(|d| d.time);
        debug!(stop = stop_id, after = %current_time, found = departures.len(), "next departures");
        departures
    }

    /// Look up a route.
    pub fn route(&self, route_id: &str) -> Option<&Route> {
        self.routes.get(route_id)
    }

    /// All routes, in insertion order.
    pub fn routes(&self) -> impl Iterator<Item = (&RouteId, &Route)> {
        self.routes.iter()
    }

    /// Look up the schedule of a route.
    pub fn schedule(&self, route_id: &str) -> Option<&Schedule> {
        self.schedules.get(route_id)
    }

    /// Look up a bus.
    pub fn bus(&self, bus_id: &str) -> Option<&Bus> {
        self.buses.get(bus_id)
    }

    /// All buses, in insertion order.
    pub fn buses(&self) -> impl Iterator<Item = (&BusId, &Bus)> {
        self.buses.iter()
    }

    /// Buses assigned to a route.
    pub fn buses_on_route<'a>(
        &'a self,
        route_id: &'a str,
    ) -> impl Iterator<Item = (&'a BusId, &'a Bus)> + 'a {
        self.buses
            .iter()
            .filter(move |(_, bus)| bus.route_id.as_str() == route_id)
    }

    /// All stop records, in insertion order.
    pub fn stops(&self) -> impl Iterator<Item = (&StopId, &Stop)> {
        self.stops.iter()
    }

    /// Write the full registry to `path`, overwriting it.
    pub fn save_data(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        store::save(
            path,
            &SnapshotRef {
                routes: &self.routes,
                schedules: &self.schedules,
                buses: &self.buses,
                stops: &self.stops,
            },
        )?;
        info!(
            path = %path.display(),
            routes = self.routes.len(),
            buses = self.buses.len(),
            "saved registry"
        );
        Ok(())
    }

    /// Replace the registry contents with those stored at `path`.
    ///
    /// Returns `Ok(false)` and leaves the registry untouched if the file does
    /// not exist. On any error the registry is also left untouched.
    pub fn load_data(&mut self, path: impl AsRef<Path>) -> Result<bool, RegistryError> {
        let path = path.as_ref();
        let Some(snapshot) = store::load(path)? else {
            info!(path = %path.display(), "data file not found, keeping current data");
            return Ok(false);
        };

        self.routes = snapshot.routes;
        self.schedules = snapshot.schedules;
        self.buses = snapshot.buses;
        self.stops = snapshot.stops;
        info!(
            path = %path.display(),
            routes = self.routes.len(),
            buses = self.buses.len(),
            "loaded registry"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn route_id(s: &str) -> RouteId {
        RouteId::new(s).unwrap()
    }

    fn stops(ids: &[&str]) -> Vec<StopId> {
        ids.iter().map(|s| StopId::new(*s).unwrap()).collect()
    }

    fn time(s: &str) -> DepartureTime {
        DepartureTime::parse_hhmm(s).unwrap()
    }

    fn capacity(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    /// R1 over S1-S4 with the morning and afternoon S1 departures.
    fn registry_with_r1() -> ScheduleRegistry {
        let mut registry = ScheduleRegistry::new();
        registry.add_route(route_id("R1"), stops(&["S1", "S2", "S3", "S4"]), "SMBT");
        let schedule = Schedule::parse([(
            "S1",
            vec!["07:00", "08:00", "09:00", "15:00", "16:00", "17:00"],
        )])
        .unwrap();
        registry.add_schedule(route_id("R1"), schedule).unwrap();
        registry
    }

    #[test]
    fn next_departures_after_half_eight() {
        let registry = registry_with_r1();

        let next = registry.next_departures_after("S1", time("08:30"));

        let summary: Vec<(&str, String)> = next
            .iter()
            .map(|d| (d.route_id.as_str(), d.time.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("R1", "09:00".to_string()),
                ("R1", "15:00".to_string()),
                ("R1", "16:00".to_string()),
                ("R1", "17:00".to_string()),
            ]
        );
        assert!(next.iter().all(|d| d.route_name == "SMBT"));
    }

    #[test]
    fn departure_at_current_time_is_excluded() {
        let registry = registry_with_r1();
        let next = registry.next_departures_after("S1", time("09:00"));
        assert_eq!(next.first().map(|d| d.time), Some(time("15:00")));
    }

    #[test]
    fn nothing_after_last_departure() {
        let registry = registry_with_r1();
        assert!(registry.next_departures_after("S1", time("17:00")).is_empty());
        assert!(registry.next_departures_after("S1", time("23:59")).is_empty());
    }

    #[test]
    fn unknown_stop_is_empty() {
        let registry = registry_with_r1();
        assert!(
            registry
                .next_departures_after("S_nonexistent", time("00:00"))
                .is_empty()
        );
        assert!(registry.get_next_bus("S_nonexistent").is_empty());
    }

    #[test]
    fn stop_on_route_without_times_is_empty() {
        let registry = registry_with_r1();
        assert!(registry.next_departures_after("S2", time("00:00")).is_empty());
    }

    #[test]
    fn stop_times_ignored_when_route_does_not_serve_stop() {
        let mut registry = ScheduleRegistry::new();
        registry.add_route(route_id("R1"), stops(&["S1"]), "Short");
        let schedule = Schedule::parse([("S1", vec!["10:00"]), ("S9", vec!["10:00"])]).unwrap();
        registry.add_schedule(route_id("R1"), schedule).unwrap();

        assert_eq!(registry.next_departures_after("S1", time("09:00")).len(), 1);
        assert!(registry.next_departures_after("S9", time("09:00")).is_empty());
    }

    #[test]
    fn merges_routes_sorted_by_time() {
        let mut registry = ScheduleRegistry::new();
        registry.add_route(route_id("R2"), stops(&["S3", "S4"]), "TOWN BUS");
        registry.add_route(route_id("R1"), stops(&["S1", "S3"]), "SMBT");
        registry
            .add_schedule(
                route_id("R2"),
                Schedule::parse([("S3", vec!["07:00", "08:00", "08:30"])]).unwrap(),
            )
            .unwrap();
        registry
            .add_schedule(
                route_id("R1"),
                Schedule::parse([("S3", vec!["07:30", "08:30"])]).unwrap(),
            )
            .unwrap();

        let next = registry.next_departures_after("S3", time("06:00"));
        let summary: Vec<(String, String)> = next
            .iter()
            .map(|d| (d.route_id.to_string(), d.time.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("R2".to_string(), "07:00".to_string()),
                ("R1".to_string(), "07:30".to_string()),
                ("R2".to_string(), "08:00".to_string()),
                // Same time: the schedule added first comes first
                ("R2".to_string(), "08:30".to_string()),
                ("R1".to_string(), "08:30".to_string()),
            ]
        );
    }

    #[test]
    fn tie_follows_insertion_not_identifier() {
        let mut registry = ScheduleRegistry::new();
        for id in ["R2", "R1"] {
            registry.add_route(route_id(id), stops(&["S1"]), id);
            registry
                .add_schedule(route_id(id), Schedule::parse([("S1", ["09:00"])]).unwrap())
                .unwrap();
        }

        let order: Vec<String> = registry
            .next_departures_after("S1", time("08:00"))
            .into_iter()
            .map(|d| d.route_id.into_inner())
            .collect();
        assert_eq!(order, vec!["R2", "R1"]);
    }

    #[test]
    fn routes_listed_in_insertion_order() {
        let mut registry = ScheduleRegistry::new();
        registry.add_route(route_id("R10"), stops(&["S1"]), "Ten");
        registry.add_route(route_id("R2"), stops(&["S1"]), "Two");
        registry.add_route(route_id("R1"), stops(&["S1"]), "One");
        // Overwriting keeps the original position
        registry.add_route(route_id("R10"), stops(&["S2"]), "Ten again");

        let ids: Vec<&str> = registry.routes().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["R10", "R2", "R1"]);
        assert_eq!(registry.route("R10").unwrap().route_name, "Ten again");
    }

    #[test]
    fn inactive_attributes_do_not_filter() {
        let mut registry = registry_with_r1();
        // Capacity and status are not consulted
        registry.add_bus(BusId::new("B1").unwrap(), route_id("R1"), capacity(1));
        assert_eq!(registry.next_departures_after("S1", time("06:00")).len(), 6);
    }

    #[test]
    fn schedule_for_unknown_route_fails() {
        let mut registry = ScheduleRegistry::new();
        let err = registry
            .add_schedule(route_id("R404"), Schedule::new())
            .unwrap_err();
        assert!(matches!(err, RegistryError::RouteNotFound(ref id) if id.as_str() == "R404"));
        assert!(registry.schedule("R404").is_none());
    }

    #[test]
    fn schedule_reads_back_exactly() {
        let mut registry = ScheduleRegistry::new();
        registry.add_route(route_id("R1"), stops(&["S1", "S2"]), "SMBT");
        let schedule =
            Schedule::parse([("S1", vec!["08:00", "07:00"]), ("S2", vec!["07:15"])]).unwrap();
        registry
            .add_schedule(route_id("R1"), schedule.clone())
            .unwrap();
        assert_eq!(registry.schedule("R1"), Some(&schedule));
    }

    #[test]
    fn add_route_overwrites() {
        let mut registry = ScheduleRegistry::new();
        registry.add_route(route_id("R1"), stops(&["S1"]), "Old");
        registry.add_route(route_id("R1"), stops(&["S2", "S3"]), "New");

        let route = registry.route("R1").unwrap();
        assert_eq!(route.route_name, "New");
        assert_eq!(route.stops, stops(&["S2", "S3"]));
        assert!(route.active);
        assert_eq!(registry.routes().count(), 1);
    }

    #[test]
    fn bus_may_reference_unknown_route() {
        let mut registry = ScheduleRegistry::new();
        registry.add_bus(BusId::new("B1").unwrap(), route_id("R_unknown"), capacity(50));

        let bus = registry.bus("B1").unwrap();
        assert_eq!(bus.route_id.as_str(), "R_unknown");
        assert_eq!(bus.capacity.get(), 50);
        assert_eq!(bus.status, "active");
        assert!(registry.route("R_unknown").is_none());
    }

    #[test]
    fn buses_on_route() {
        let mut registry = ScheduleRegistry::new();
        registry.add_bus(BusId::new("B1").unwrap(), route_id("R1"), capacity(50));
        registry.add_bus(BusId::new("B2").unwrap(), route_id("R2"), capacity(40));
        registry.add_bus(BusId::new("B3").unwrap(), route_id("R1"), capacity(50));

        let on_r1: Vec<&str> = registry
            .buses_on_route("R1")
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(on_r1, vec!["B1", "B3"]);
        assert_eq!(registry.buses().count(), 3);
    }

    #[test]
    fn stops_start_empty() {
        let registry = registry_with_r1();
        assert_eq!(registry.stops().count(), 0);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bus_data.json");

        let mut original = registry_with_r1();
        original.add_route(route_id("R2"), stops(&["S3", "S4"]), "TOWN BUS");
        original.add_bus(BusId::new("B1").unwrap(), route_id("R1"), capacity(50));
        original.add_bus(BusId::new("B9").unwrap(), route_id("R_unknown"), capacity(12));
        original.save_data(&path).unwrap();

        let mut restored = ScheduleRegistry::new();
        assert!(restored.load_data(&path).unwrap());
        assert_eq!(restored, original);
    }

    #[test]
    fn roundtrip_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bus_data.json");

        let mut original = ScheduleRegistry::new();
        for id in ["R10", "R2"] {
            original.add_route(route_id(id), stops(&["S10", "S2"]), id);
            let schedule =
                Schedule::parse([("S10", ["07:00"]), ("S2", ["07:10"])]).unwrap();
            original.add_schedule(route_id(id), schedule).unwrap();
        }
        original.add_bus(BusId::new("B2").unwrap(), route_id("R2"), capacity(40));
        original.add_bus(BusId::new("B10").unwrap(), route_id("R10"), capacity(40));
        original.save_data(&path).unwrap();

        let mut restored = ScheduleRegistry::new();
        restored.load_data(&path).unwrap();

        let routes: Vec<&str> = restored.routes().map(|(id, _)| id.as_str()).collect();
        assert_eq!(routes, vec!["R10", "R2"]);
        let buses: Vec<&str> = restored.buses().map(|(id, _)| id.as_str()).collect();
        assert_eq!(buses, vec!["B2", "B10"]);
        let stops: Vec<&str> = restored
            .schedule("R2")
            .unwrap()
            .iter()
            .map(|(stop, _)| stop.as_str())
            .collect();
        assert_eq!(stops, vec!["S10", "S2"]);
    }

    #[test]
    fn stop_records_survive_load_save_load() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.json");
        let copy = dir.path().join("copy.json");
        std::fs::write(
            &source,
            r#"{"stops": {
                "S2": {"name": "Main", "lat": 51.5, "lon": -0.12},
                "S1": "Main Street",
                "S3": {}
            }}"#,
        )
        .unwrap();

        let mut registry = ScheduleRegistry::new();
        assert!(registry.load_data(&source).unwrap());
        assert_eq!(registry.stops().count(), 3);
        registry.save_data(&copy).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&copy).unwrap()).unwrap();
        assert_eq!(
            written["stops"],
            serde_json::json!({
                "S1": "Main Street",
                "S2": {"name": "Main", "lat": 51.5, "lon": -0.12},
                "S3": {}
            })
        );

        let mut reloaded = ScheduleRegistry::new();
        reloaded.load_data(&copy).unwrap();
        assert_eq!(reloaded, registry);
        let ids: Vec<&str> = reloaded.stops().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["S2", "S1", "S3"]);
        assert_eq!(reloaded.stops().nth(1).unwrap().1.name(), Some("Main Street"));
    }

    #[test]
    fn load_replaces_rather_than_merges() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bus_data.json");
        registry_with_r1().save_data(&path).unwrap();

        let mut registry = ScheduleRegistry::new();
        registry.add_route(route_id("R7"), stops(&["S7"]), "Other");
        registry.add_bus(BusId::new("B7").unwrap(), route_id("R7"), capacity(10));
        registry.load_data(&path).unwrap();

        assert!(registry.route("R7").is_none());
        assert!(registry.bus("B7").is_none());
        assert!(registry.route("R1").is_some());
    }

    #[test]
    fn load_missing_file_is_noop() {
        let dir = tempdir().unwrap();
        let mut registry = registry_with_r1();
        let before = registry.clone();

        let loaded = registry.load_data(dir.path().join("missing.json")).unwrap();

        assert!(!loaded);
        assert_eq!(registry, before);
    }

    #[test]
    fn load_malformed_file_keeps_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"routes\": ").unwrap();

        let mut registry = registry_with_r1();
        let before = registry.clone();

        let err = registry.load_data(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Json { .. }));
        assert_eq!(registry, before);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bus_data.json");
        std::fs::write(&path, "not json at all, and rather long too").unwrap();

        ScheduleRegistry::new().save_data(&path).unwrap();

        let mut registry = registry_with_r1();
        assert!(registry.load_data(&path).unwrap());
        assert_eq!(registry, ScheduleRegistry::new());
    }
}
