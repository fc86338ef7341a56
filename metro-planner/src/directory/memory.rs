//! In-memory directory provider.
//!
//! Serves a fixed network, either built in code or loaded from a JSON
//! fixture. Stations carry grid positions (in miles); distance estimates
//! are Manhattan distances between positions, which keeps them exact in
//! floating point. Useful for development and tests without API access.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::{LineCode, StationCode};

use super::error::DirectoryError;
use super::{DirectoryProvider, LineRecord, StationRecord};

/// A line in a network fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureLine {
    pub code: LineCode,
    pub display_name: String,
    /// Station codes in order.
    pub stations: Vec<StationCode>,
    /// End-to-end running time, used for the average speed.
    #[serde(default)]
    pub rail_minutes: Option<f64>,
}

/// A station platform in a network fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureStation {
    pub name: String,
    pub code: StationCode,
    pub lines: Vec<LineCode>,
    #[serde(default)]
    pub together: Vec<StationCode>,
    /// Grid position in miles, `[east, north]`.
    pub position: [f64; 2],
}

/// A complete network description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFixture {
    pub lines: Vec<FixtureLine>,
    pub stations: Vec<FixtureStation>,
}

/// Number of calls made to each provider method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCalls {
    pub list_lines: usize,
    pub list_stations: usize,
    pub average_speed: usize,
    pub ordered_stations: usize,
    pub distances_to: usize,
}

#[derive(Debug, Default)]
struct CallCounters {
    list_lines: AtomicUsize,
    list_stations: AtomicUsize,
    average_speed: AtomicUsize,
    ordered_stations: AtomicUsize,
    distances_to: AtomicUsize,
}

/// Directory provider backed by a [`NetworkFixture`].
#[derive(Debug)]
pub struct StaticDirectory {
    fixture: NetworkFixture,
    calls: CallCounters,
}

impl StaticDirectory {
    /// Serve the given network.
    pub fn from_fixture(fixture: NetworkFixture) -> Self {
        Self {
            fixture,
            calls: CallCounters::default(),
        }
    }

    /// Load a network from a JSON fixture file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| DirectoryError::Fixture {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let fixture: NetworkFixture =
            serde_json::from_str(&contents).map_err(|e| DirectoryError::Fixture {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;
        Ok(Self::from_fixture(fixture))
    }

    /// Snapshot of how often each provider method has been called.
    pub fn calls(&self) -> ProviderCalls {
        ProviderCalls {
            list_lines: self.calls.list_lines.load(Ordering::Relaxed),
            list_stations: self.calls.list_stations.load(Ordering::Relaxed),
            average_speed: self.calls.average_speed.load(Ordering::Relaxed),
            ordered_stations: self.calls.ordered_stations.load(Ordering::Relaxed),
            distances_to: self.calls.distances_to.load(Ordering::Relaxed),
        }
    }

    fn line(&self, code: &LineCode) -> Result<&FixtureLine, DirectoryError> {
        self.fixture
            .lines
            .iter()
            .find(|l| &l.code == code)
            .ok_or_else(|| DirectoryError::UnknownLine(code.clone()))
    }

    fn position(&self, code: &StationCode) -> Option<[f64; 2]> {
        self.fixture
            .stations
            .iter()
            .find(|s| &s.code == code || s.together.contains(code))
            .map(|s| s.position)
    }
}

fn manhattan(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs()
}

impl DirectoryProvider for StaticDirectory {
    async fn list_lines(&self) -> Result<Vec<LineRecord>, DirectoryError> {
        self.calls.list_lines.fetch_add(1, Ordering::Relaxed);

        Ok(self
            .fixture
            .lines
            .iter()
            .filter_map(|line| {
                Some(LineRecord {
                    code: line.code.clone(),
                    display_name: line.display_name.clone(),
                    start: line.stations.first()?.clone(),
                    end: line.stations.last()?.clone(),
                })
            })
            .collect())
    }

    async fn list_stations(&self) -> Result<Vec<StationRecord>, DirectoryError> {
        self.calls.list_stations.fetch_add(1, Ordering::Relaxed);

        Ok(self
            .fixture
            .stations
            .iter()
            .map(|s| StationRecord {
                name: s.name.clone(),
                code: s.code.clone(),
                lines: s.lines.clone(),
                together: s.together.clone(),
            })
            .collect())
    }

    async fn average_speed(
        &self,
        line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Option<f64>, DirectoryError> {
        self.calls.average_speed.fetch_add(1, Ordering::Relaxed);

        let stations = self.ordered_stations_uncounted(line, start, end)?;
        let Some(minutes) = self.line(line)?.rail_minutes.filter(|m| *m > 0.0) else {
            return Ok(None);
        };

        let mut miles = 0.0;
        for pair in stations.windows(2) {
            if let (Some(a), Some(b)) = (self.position(&pair[0]), self.position(&pair[1])) {
                miles += manhattan(a, b);
            }
        }

        Ok(Some(miles * 60.0 / minutes))
    }

    async fn ordered_stations(
        &self,
        line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Vec<StationCode>, DirectoryError> {
        self.calls.ordered_stations.fetch_add(1, Ordering::Relaxed);
        self.ordered_stations_uncounted(line, start, end)
    }

    async fn distances_to(
        &self,
        destination: &StationCode,
    ) -> Result<HashMap<StationCode, f64>, DirectoryError> {
        self.calls.distances_to.fetch_add(1, Ordering::Relaxed);

        let target = self
            .position(destination)
            .ok_or_else(|| DirectoryError::UnknownStation(destination.clone()))?;

        let mut distances = HashMap::new();
        for station in &self.fixture.stations {
            let miles = manhattan(station.position, target);
            distances.insert(station.code.clone(), miles);
            for code in &station.together {
                distances.entry(code.clone()).or_insert(miles);
            }
        }
        distances.insert(destination.clone(), 0.0);

        Ok(distances)
    }
}

impl StaticDirectory {
    fn ordered_stations_uncounted(
        &self,
        line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Vec<StationCode>, DirectoryError> {
        let stations = &self.line(line)?.stations;
        let find = |code: &StationCode| {
            stations
                .iter()
                .position(|s| s == code)
                .ok_or_else(|| DirectoryError::UnknownStation(code.clone()))
        };
        let from = find(start)?;
        let to = find(end)?;

        if from <= to {
            Ok(stations[from..=to].to_vec())
        } else {
            Ok(stations[to..=from].iter().rev().cloned().collect())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn line_code(s: &str) -> LineCode {
        LineCode::parse(s).unwrap()
    }

    fn station(name: &str, c: &str, lines: &[&str], together: &[&str], x: f64, y: f64) -> FixtureStation {
        FixtureStation {
            name: name.to_string(),
            code: code(c),
            lines: lines.iter().map(|l| line_code(l)).collect(),
            together: together.iter().map(|t| code(t)).collect(),
            position: [x, y],
        }
    }

    fn line(c: &str, name: &str, stations: &[&str], rail_minutes: Option<f64>) -> FixtureLine {
        FixtureLine {
            code: line_code(c),
            display_name: name.to_string(),
            stations: stations.iter().map(|s| code(s)).collect(),
            rail_minutes,
        }
    }

    /// Two crossing lines and a detached island.
    ///
    /// ```text
    ///                 B04 Bridgeport (2,2)
    ///                 B03 Bellmont   (2,1)
    /// R01 - R02 - Central(X01/X02) - R03 - R04     (Red, y = 0)
    ///                 B02 Brookline  (2,-1)
    ///                 B01 Bayside    (2,-2)
    ///
    /// G01 Greenfield (10,10) - G02 Glenwood (11,10)  (Green, detached)
    /// ```
    pub(crate) fn cross_fixture() -> NetworkFixture {
        NetworkFixture {
            lines: vec![
                line("RD", "Red", &["R01", "R02", "X01", "R03", "R04"], Some(8.0)),
                line("BL", "Blue", &["B01", "B02", "X02", "B03", "B04"], None),
                line("GR", "Green", &["G01", "G02"], Some(2.0)),
            ],
            stations: vec![
                station("Rosewood", "R01", &["RD"], &[], 0.0, 0.0),
                station("Riverside", "R02", &["RD"], &[], 1.0, 0.0),
                station("Central", "X01", &["RD"], &["X02"], 2.0, 0.0),
                station("Central", "X02", &["BL"], &["X01"], 2.0, 0.0),
                station("Redfern", "R03", &["RD"], &[], 3.0, 0.0),
                station("Ridgeview", "R04", &["RD"], &[], 4.0, 0.0),
                station("Bayside", "B01", &["BL"], &[], 2.0, -2.0),
                station("Brookline", "B02", &["BL"], &[], 2.0, -1.0),
                station("Bellmont", "B03", &["BL"], &[], 2.0, 1.0),
                station("Bridgeport", "B04", &["BL"], &[], 2.0, 2.0),
                station("Greenfield", "G01", &["GR"], &[], 10.0, 10.0),
                station("Glenwood", "G02", &["GR"], &[], 11.0, 10.0),
            ],
        }
    }

    #[tokio::test]
    async fn lists_lines_with_terminals() {
        let directory = StaticDirectory::from_fixture(cross_fixture());
        let lines = directory.list_lines().await.unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].code, line_code("RD"));
        assert_eq!(lines[0].start, code("R01"));
        assert_eq!(lines[0].end, code("R04"));
    }

    #[tokio::test]
    async fn ordered_stations_in_either_direction() {
        let directory = StaticDirectory::from_fixture(cross_fixture());
        let rd = line_code("RD");

        let forward = directory
            .ordered_stations(&rd, &code("R01"), &code("R04"))
            .await
            .unwrap();
        assert_eq!(forward.len(), 5);
        assert_eq!(forward[2], code("X01"));

        let backward = directory
            .ordered_stations(&rd, &code("R03"), &code("R02"))
            .await
            .unwrap();
        assert_eq!(backward, vec![code("R03"), code("X01"), code("R02")]);
    }

    #[tokio::test]
    async fn distances_are_manhattan_and_destination_is_zero() {
        let directory = StaticDirectory::from_fixture(cross_fixture());
        let distances = directory.distances_to(&code("B04")).await.unwrap();

        assert_eq!(distances[&code("B04")], 0.0);
        assert_eq!(distances[&code("R01")], 4.0);
        assert_eq!(distances[&code("X01")], 2.0);
        assert_eq!(distances[&code("X02")], 2.0);
        assert_eq!(distances[&code("G02")], 17.0);
    }

    #[tokio::test]
    async fn unknown_destination_is_an_error() {
        let directory = StaticDirectory::from_fixture(cross_fixture());
        let result = directory.distances_to(&code("Z99")).await;
        assert!(matches!(result, Err(DirectoryError::UnknownStation(_))));
    }

    #[tokio::test]
    async fn average_speed_from_rail_minutes() {
        let directory = StaticDirectory::from_fixture(cross_fixture());

        // Red is 4 miles end to end in 8 minutes
        let mph = directory
            .average_speed(&line_code("RD"), &code("R01"), &code("R04"))
            .await
            .unwrap();
        assert_eq!(mph, Some(30.0));

        let mph = directory
            .average_speed(&line_code("BL"), &code("B01"), &code("B04"))
            .await
            .unwrap();
        assert_eq!(mph, None);
    }

    #[tokio::test]
    async fn counts_calls() {
        let directory = StaticDirectory::from_fixture(cross_fixture());
        directory.list_lines().await.unwrap();
        directory.list_lines().await.unwrap();
        directory.distances_to(&code("R01")).await.unwrap();

        let calls = directory.calls();
        assert_eq!(calls.list_lines, 2);
        assert_eq!(calls.distances_to, 1);
        assert_eq!(calls.list_stations, 0);
    }

    #[tokio::test]
    async fn loads_sample_fixture_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_network.json");
        let directory = StaticDirectory::from_json_file(path).unwrap();

        let stations = directory.list_stations().await.unwrap();
        assert!(stations.iter().any(|s| s.code == code("C04")));
        assert!(stations.iter().any(|s| s.code == code("E04")));
    }

    #[test]
    fn missing_fixture_file_is_an_error() {
        let result = StaticDirectory::from_json_file("/nonexistent/network.json");
        assert!(matches!(result, Err(DirectoryError::Fixture { .. })));
    }
}
