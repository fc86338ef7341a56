//! Text command surface helpers.
//!
//! Input parsing and output formatting for the interactive prompt loop,
//! kept free of I/O so they can be tested directly.

use crate::domain::StationCode;
use crate::planner::{Route, SearchOutcome};

/// Line printed above and below a route.
pub const SEPARATOR: &str = "---------------------------------------------------";

pub const ORIGIN_PROMPT: &str = "Enter starting station code (or exit): ";
pub const DESTINATION_PROMPT: &str = "Enter destination station code: ";

/// Origin used when the input cannot be parsed (Foggy Bottom-GWU).
pub const DEFAULT_ORIGIN: &str = "C04";
/// Destination used when the input cannot be parsed (Columbia Heights).
pub const DEFAULT_DESTINATION: &str = "E04";

pub const DEFAULTS_NOTICE: &str =
    "Using defaults: Foggy Bottom (C04) -> Columbia Heights (E04)";

/// A parsed origin and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub origin: StationCode,
    pub destination: StationCode,
    /// Whether the default pair replaced unusable input.
    pub defaulted: bool,
}

impl RouteRequest {
    /// The fallback pair.
    pub fn defaults() -> Self {
        Self {
            origin: StationCode::from_known(DEFAULT_ORIGIN),
            destination: StationCode::from_known(DEFAULT_DESTINATION),
            defaulted: true,
        }
    }
}

/// Whether an origin line asks to quit.
pub fn is_exit(input: &str) -> bool {
    input.contains("exit")
}

fn parse_code(input: &str) -> Option<StationCode> {
    let trimmed = input.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    StationCode::parse(&trimmed.to_ascii_uppercase()).ok()
}

/// Parse an origin and destination as typed at the prompts.
///
/// Codes are case-insensitive. If either is blank, contains whitespace or
/// is not a valid code, both fall back to the default pair.
pub fn parse_request(origin: &str, destination: &str) -> RouteRequest {
    match (parse_code(origin), parse_code(destination)) {
        (Some(origin), Some(destination)) => RouteRequest {
            origin,
            destination,
            defaulted: false,
        },
        _ => RouteRequest::defaults(),
    }
}

/// Render a found route between separator lines.
pub fn format_route(route: &Route) -> String {
    let mut out = format!("{SEPARATOR}\nPath:\n");
    for station in &route.stations {
        out.push_str(station);
        out.push('\n');
    }
    out.push_str(SEPARATOR);
    out.push('\n');

    let lines = route.lines();
    if !lines.is_empty() {
        let ride = lines
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        let changes = match route.changes() {
            0 => String::new(),
            1 => " (1 change)".to_string(),
            n => format!(" ({n} changes)"),
        };
        out.push_str(&format!("Lines: {ride}{changes}\n"));
    }
    out
}

/// Render any search outcome.
pub fn format_outcome(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Found(route) => format_route(route),
        SearchOutcome::NoPath { steps, reason } => {
            format!("No path found after {steps} steps: {reason}\n")
        }
    }
}
