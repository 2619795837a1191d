use std::io;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bus_schedule::ScheduleRegistry;
use bus_schedule::config::SessionConfig;
use bus_schedule::sample;
use bus_schedule::session::Session;

fn main() -> io::Result<()> {
    // Logs go to stderr so they don't interleave with the menu
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let config = SessionConfig::default();
    let mut registry = ScheduleRegistry::new();

    if config.sample_data {
        match sample::populate(&mut registry) {
            Ok(()) => info!(routes = registry.routes().count(), "sample data installed"),
            Err(e) => error!(error = %e, "failed to install sample data"),
        }
    }

    let stdin = io::stdin();
    let mut session = Session::new(&mut registry, config, stdin.lock(), io::stdout());
    session.run()
}
