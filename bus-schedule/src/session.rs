//! Text menu over a schedule registry.
//!
//! The session reads menu choices line by line and writes plain text
//! replies. It is generic over its input and output so the whole dialogue
//! can be driven from memory.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::domain::DepartureTime;
use crate::registry::ScheduleRegistry;

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NextBuses,
    RouteInfo,
    AllRoutes,
    Save,
    Load,
    Exit,
}

impl MenuChoice {
    /// All choices in menu order.
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::NextBuses,
        MenuChoice::RouteInfo,
        MenuChoice::AllRoutes,
        MenuChoice::Save,
        MenuChoice::Load,
        MenuChoice::Exit,
    ];

    /// Parse a menu number, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::NextBuses),
            "2" => Some(MenuChoice::RouteInfo),
            "3" => Some(MenuChoice::AllRoutes),
            "4" => Some(MenuChoice::Save),
            "5" => Some(MenuChoice::Load),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuChoice::NextBuses => "View next buses from a stop",
            MenuChoice::RouteInfo => "View route information",
            MenuChoice::AllRoutes => "View all routes",
            MenuChoice::Save => "Save schedule data",
            MenuChoice::Load => "Load schedule data",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Interactive session driving a registry.
pub struct Session<'a, R, W> {
    registry: &'a mut ScheduleRegistry,
    config: SessionConfig,
    input: R,
    output: W,
    clock: fn() -> DepartureTime,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Create a session that answers "next bus" queries using the local clock.
    pub fn new(
        registry: &'a mut ScheduleRegistry,
        config: SessionConfig,
        input: R,
        output: W,
    ) -> Self {
        Self {
            registry,
            config,
            input,
            output,
            clock: DepartureTime::now,
        }
    }

    /// Use a different source for the current time of day.
    pub fn with_clock(mut self, clock: fn() -> DepartureTime) -> Self {
        self.clock = clock;
        self
    }

    /// Run the menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nWelcome to Bus Schedule System")?;

        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("\nEnter your choice (1-6): ")? else {
                debug!("input closed");
                break;
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                continue;
            };
            debug!(?choice, "menu choice");

            match choice {
                MenuChoice::NextBuses => self.next_buses()?,
                MenuChoice::RouteInfo => self.route_info()?,
                MenuChoice::AllRoutes => self.all_routes()?,
                MenuChoice::Save => self.save()?,
                MenuChoice::Load => self.load()?,
                MenuChoice::Exit => {
                    writeln!(self.output, "Thank you for using Bus Schedule System.")?;
                    break;
                }
            }
        }

        self.output.flush()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nOptions:")?;
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, choice.label())?;
        }
        Ok(())
    }

    /// Write a prompt and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn next_buses(&mut self) -> io::Result<()> {
        let Some(stop) = self.prompt("Enter stop ID (e.g., S1): ")? else {
            return Ok(());
        };

        let departures = self.registry.next_departures_after(&stop, (self.clock)());
        if departures.is_empty() {
            return writeln!(self.output, "No more buses scheduled from this stop today.");
        }

        writeln!(self.output, "\nNext buses from stop {stop}:")?;
        for departure in &departures {
            writeln!(self.output, "{departure}")?;
        }
        Ok(())
    }

    fn route_info(&mut self) -> io::Result<()> {
        let Some(route_id) = self.prompt("Enter route ID (e.g., R1): ")? else {
            return Ok(());
        };

        let Some(route) = self.registry.route(&route_id) else {
            return writeln!(self.output, "Route not found.");
        };

        writeln!(self.output, "\nRoute: {}", route.route_name)?;
        writeln!(self.output, "Stops: {}", route.stops_display())?;

        if let Some(schedule) = self.registry.schedule(&route_id) {
            writeln!(self.output, "\nSchedule:")?;
            for (stop, times) in schedule.iter() {
                let times: Vec<String> = times.iter().map(ToString::to_string).collect();
                writeln!(self.output, "{stop}: {}", times.join(", "))?;
            }
        }
        Ok(())
    }

    fn all_routes(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nAll Routes:")?;
        for (route_id, route) in self.registry.routes() {
            writeln!(
                self.output,
                "{route_id}: {} - Stops: {}",
                route.route_name,
                route.stops_display()
            )?;
        }
        Ok(())
    }

    fn save(&mut self) -> io::Result<()> {
        match self.registry.save_data(&self.config.data_path) {
            Ok(()) => writeln!(self.output, "Schedule data saved successfully."),
            Err(e) => {
                warn!(error = %e, "save failed");
                writeln!(self.output, "Failed to save schedule data: {e}")
            }
        }
    }

    fn load(&mut self) -> io::Result<()> {
        match self.registry.load_data(&self.config.data_path) {
            Ok(true) => writeln!(self.output, "Schedule data loaded successfully."),
            Ok(false) => writeln!(
                self.output,
                "No saved schedule data found at {}.",
                self.config.data_path.display()
            ),
            Err(e) => {
                warn!(error = %e, "load failed");
                writeln!(self.output, "Failed to load schedule data: {e}")
            }
        }
    }
}
