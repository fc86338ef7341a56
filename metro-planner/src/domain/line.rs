//! Rail lines.

use std::fmt;

use super::codes::{LineCode, StationCode};
use super::station::StationId;

/// A rail line with its ordered station sequence.
///
/// The sequence is empty until a topology has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Line code, e.g. `RD`.
    pub code: LineCode,

    /// Display name, e.g. `Red`.
    pub display_name: String,

    /// Code of the first terminal station.
    pub start: StationCode,

    /// Code of the other terminal station.
    pub end: StationCode,

    /// Station codes in order from `start` to `end`.
    pub station_codes: Vec<StationCode>,

    /// Resolved stations, parallel to `station_codes`.
    pub stops: Vec<StationId>,

    /// Average train speed end to end, in miles per hour. Informational.
    pub average_mph: Option<f64>,
}

impl Line {
    /// Create a line without a station sequence.
    pub fn new(
        code: LineCode,
        display_name: impl Into<String>,
        start: StationCode,
        end: StationCode,
    ) -> Self {
        Self {
            code,
            display_name: display_name.into(),
            start,
            end,
            station_codes: Vec::new(),
            stops: Vec::new(),
            average_mph: None,
        }
    }

    /// Position of a station in the ordered sequence.
    pub fn position(&self, station: StationId) -> Option<usize> {
        self.stops.iter().position(|&s| s == station)
    }

    /// Whether the line calls at `station`.
    pub fn calls_at(&self, station: StationId) -> bool {
        self.stops.contains(&station)
    }

    /// Number of stops on the line.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the line has no stops yet.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} -> {}",
            self.display_name, self.code, self.start, self.end
        )
    }
}
