//! Bus schedule registry.
//!
//! Keeps routes, buses and per-stop departure times in memory and answers:
//! "which buses leave this stop next?" The whole registry can be saved to
//! and loaded from a JSON file.

pub mod config;
pub mod domain;
pub mod error;
pub mod registry;
pub mod sample;
pub mod session;
pub mod store;

pub use error::RegistryError;
pub use registry::ScheduleRegistry;
