//! Stations and the station directory.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::directory::StationRecord;

use super::codes::{LineCode, StationCode};

/// Canonical id of a station within one [`StationDirectory`].
///
/// Every alternate code of a station resolves to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub usize);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A physical station, possibly served by several lines and platforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Canonical station name.
    pub name: String,

    /// Platform codes. The first one is the primary code.
    pub codes: Vec<StationCode>,

    /// Lines serving the station.
    pub lines: Vec<LineCode>,

    /// Remaining-distance estimate (miles) to the current destination.
    ///
    /// `None` until a topology has been built for a destination.
    pub distance: Option<f64>,
}

impl Station {
    /// Create a station with a single code and no lines.
    pub fn new(name: impl Into<String>, code: StationCode) -> Self {
        Self {
            name: name.into(),
            codes: vec![code],
            lines: Vec::new(),
            distance: None,
        }
    }

    /// The primary platform code.
    pub fn primary_code(&self) -> &StationCode {
        &self.codes[0]
    }

    /// Whether the station is served by `line`.
    pub fn serves(&self, line: &LineCode) -> bool {
        self.lines.contains(line)
    }

    /// Whether `code` is one of this station's platform codes.
    pub fn has_code(&self, code: &StationCode) -> bool {
        self.codes.contains(code)
    }

    fn add_code(&mut self, code: &StationCode) {
        if !self.codes.contains(code) {
            self.codes.push(code.clone());
        }
    }

    fn add_line(&mut self, line: &LineCode) {
        if !self.lines.contains(line) {
            self.lines.push(line.clone());
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.codes.iter().map(StationCode::as_str).collect();
        let lines: Vec<&str> = self.lines.iter().map(LineCode::as_str).collect();
        write!(f, "{} | {:?} | {:?}", self.name, codes, lines)
    }
}

/// Station entities indexed by every known code and by name.
///
/// Stations are interned: each physical station is stored once and every
/// code resolves to its [`StationId`].
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
    by_code: HashMap<StationCode, StationId>,
    by_name: HashMap<String, StationId>,
}

impl StationDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from raw station records, merging records that share a name.
    pub fn from_records(records: &[StationRecord]) -> Self {
        let mut directory = Self::new();
        for record in records {
            directory.insert_record(record);
        }
        directory
    }

    /// Insert one station record.
    ///
    /// A record whose name is already known adds its lines and codes to the
    /// existing station instead of creating a new one.
    pub fn insert_record(&mut self, record: &StationRecord) -> StationId {
        let id = match self.by_name.get(&record.name) {
            Some(&id) => id,
            None => {
                let id = StationId(self.stations.len());
                self.stations
                    .push(Station::new(record.name.clone(), record.code.clone()));
                self.by_name.insert(record.name.clone(), id);
                id
            }
        };

        let station = &mut self.stations[id.0];
        for line in &record.lines {
            station.add_line(line);
        }
        for code in std::iter::once(&record.code).chain(&record.together) {
            station.add_code(code);
        }

        for code in std::iter::once(&record.code).chain(&record.together) {
            match self.by_code.get(code) {
                None => {
                    self.by_code.insert(code.clone(), id);
                }
                Some(&existing) if existing != id => {
                    warn!(
                        code = %code,
                        station = %record.name,
                        existing = %self.stations[existing.0].name,
                        "station code already belongs to another station"
                    );
                }
                Some(_) => {}
            }
        }

        id
    }

    /// Resolve a code to its station id.
    pub fn resolve(&self, code: &StationCode) -> Option<StationId> {
        self.by_code.get(code).copied()
    }

    /// Resolve a station name to its id.
    pub fn resolve_name(&self, name: &str) -> Option<StationId> {
        self.by_name.get(name).copied()
    }

    /// Look up a station by code.
    pub fn lookup(&self, code: &StationCode) -> Option<&Station> {
        self.resolve(code).map(|id| &self.stations[id.0])
    }

    /// Get a station by id.
    ///
    /// Panics if the id does not come from this directory.
    pub fn get(&self, id: StationId) -> &Station {
        &self.stations[id.0]
    }

    /// Get a station by id, mutably.
    pub fn get_mut(&mut self, id: StationId) -> &mut Station {
        &mut self.stations[id.0]
    }

    /// Iterate over all stations with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (StationId, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .map(|(i, s)| (StationId(i), s))
    }

    /// Number of distinct stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the directory has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Number of codes known to the directory.
    pub fn code_count(&self) -> usize {
        self.by_code.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn line(s: &str) -> LineCode {
        LineCode::parse(s).unwrap()
    }

    fn record(name: &str, c: &str, lines: &[&str], together: &[&str]) -> StationRecord {
        StationRecord {
            name: name.to_string(),
            code: code(c),
            lines: lines.iter().map(|l| line(l)).collect(),
            together: together.iter().map(|t| code(t)).collect(),
        }
    }

    #[test]
    fn alternate_codes_resolve_to_same_station() {
        let directory = StationDirectory::from_records(&[
            record("Metro Center", "A01", &["RD"], &["C01"]),
            record("Metro Center", "C01", &["BL", "OR", "SV"], &["A01"]),
            record("Farragut North", "A02", &["RD"], &[]),
        ]);

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.code_count(), 3);

        let a01 = directory.resolve(&code("A01")).unwrap();
        let c01 = directory.resolve(&code("C01")).unwrap();
        assert_eq!(a01, c01);
        assert_eq!(directory.resolve_name("Metro Center"), Some(a01));

        let metro_center = directory.get(a01);
        assert_eq!(metro_center.primary_code(), &code("A01"));
        assert_eq!(metro_center.codes, vec![code("A01"), code("C01")]);
        assert_eq!(
            metro_center.lines,
            vec![line("RD"), line("BL"), line("OR"), line("SV")]
        );
    }

    #[test]
    fn merging_does_not_duplicate_lines_or_codes() {
        let directory = StationDirectory::from_records(&[
            record("Gallery Place", "B01", &["RD"], &["F01"]),
            record("Gallery Place", "F01", &["GR", "YL"], &["B01"]),
            record("Gallery Place", "B01", &["RD"], &["F01"]),
        ]);

        let station = directory.lookup(&code("F01")).unwrap();
        assert_eq!(station.codes.len(), 2);
        assert_eq!(station.lines.len(), 3);
        assert!(station.serves(&line("YL")));
        assert!(station.has_code(&code("B01")));
    }

    #[test]
    fn unknown_code_does_not_resolve() {
        let directory =
            StationDirectory::from_records(&[record("Farragut North", "A02", &["RD"], &[])]);
        assert!(directory.resolve(&code("Z99")).is_none());
        assert!(directory.lookup(&code("Z99")).is_none());
    }

    #[test]
    fn code_claimed_by_other_station_keeps_first_owner() {
        let directory = StationDirectory::from_records(&[
            record("North", "N01", &["RD"], &[]),
            record("South", "S01", &["RD"], &["N01"]),
        ]);

        let north = directory.resolve_name("North").unwrap();
        assert_eq!(directory.resolve(&code("N01")), Some(north));
    }

    #[test]
    fn display() {
        let directory =
            StationDirectory::from_records(&[record("Metro Center", "A01", &["RD"], &["C01"])]);
        let station = directory.lookup(&code("C01")).unwrap();
        assert_eq!(
            station.to_string(),
            "Metro Center | [\"A01\", \"C01\"] | [\"RD\"]"
        );
    }
}
