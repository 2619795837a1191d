//! Domain types for the bus schedule registry.
//!
//! Identifiers and departure times are validated at construction time, so
//! code that receives these types can trust their validity.

mod bus;
mod departure;
mod id;
mod route;
mod schedule;
mod stop;
mod time;

pub use bus::{Bus, DEFAULT_BUS_STATUS};
pub use departure::Departure;
pub use id::{BusId, InvalidId, RouteId, StopId};
pub use route::Route;
pub use schedule::{Schedule, ScheduleError};
pub use stop::Stop;
pub use time::{DepartureTime, TimeError};
