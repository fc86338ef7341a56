//! Conversion from WMATA DTOs to directory records.
//!
//! Listing entries with unparseable codes are logged and skipped; a route
//! (`jPath`) with a bad code is rejected outright because its order matters.

use std::collections::HashMap;

use tracing::warn;

use crate::directory::{LineRecord, StationRecord};
use crate::domain::{LineCode, StationCode};

use super::types::{
    LineDto, LinesResponse, PathResponse, StationDto, StationToStationResponse, StationsResponse,
};

/// Error during DTO to record conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a station code
    #[error("invalid station code: {0}")]
    InvalidStationCode(String),

    /// Failed to parse a line code
    #[error("invalid line code: {0}")]
    InvalidLineCode(String),

    /// A station lists no line at all
    #[error("station {0} is not served by any line")]
    NoLines(String),

    /// The response has no usable entry
    #[error("missing data: {0}")]
    Missing(&'static str),
}

/// Treat `null` and `""` alike.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn station_code(s: &str) -> Result<StationCode, ConversionError> {
    StationCode::parse(s).map_err(|_| ConversionError::InvalidStationCode(s.to_string()))
}

fn line_code(s: &str) -> Result<LineCode, ConversionError> {
    LineCode::parse(s).map_err(|_| ConversionError::InvalidLineCode(s.to_string()))
}

/// Convert a `jLines` response.
pub fn convert_lines(response: &LinesResponse) -> Vec<LineRecord> {
    response
        .lines
        .iter()
        .filter_map(|dto| match convert_line(dto) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(line = %dto.line_code, error = %e, "skipping line");
                None
            }
        })
        .collect()
}

/// Convert a single line entry.
pub fn convert_line(dto: &LineDto) -> Result<LineRecord, ConversionError> {
    Ok(LineRecord {
        code: line_code(&dto.line_code)?,
        display_name: dto.display_name.clone(),
        start: station_code(&dto.start_station_code)?,
        end: station_code(&dto.end_station_code)?,
    })
}

/// Convert a `jStations` response.
pub fn convert_stations(response: &StationsResponse) -> Vec<StationRecord> {
    response
        .stations
        .iter()
        .filter_map(|dto| match convert_station(dto) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(station = %dto.code, name = %dto.name, error = %e, "skipping station");
                None
            }
        })
        .collect()
}

/// Convert a single station platform.
pub fn convert_station(dto: &StationDto) -> Result<StationRecord, ConversionError> {
    let lines = [
        &dto.line_code1,
        &dto.line_code2,
        &dto.line_code3,
        &dto.line_code4,
    ]
    .into_iter()
    .filter_map(non_empty)
    .map(line_code)
    .collect::<Result<Vec<_>, _>>()?;

    if lines.is_empty() {
        return Err(ConversionError::NoLines(dto.code.clone()));
    }

    let together = [&dto.station_together1, &dto.station_together2]
        .into_iter()
        .filter_map(non_empty)
        .map(station_code)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StationRecord {
        name: dto.name.clone(),
        code: station_code(&dto.code)?,
        lines,
        together,
    })
}

/// Convert a `jPath` response into ordered station codes.
pub fn convert_path(response: &PathResponse) -> Result<Vec<StationCode>, ConversionError> {
    let mut items: Vec<_> = response.path.iter().collect();
    items.sort_by_key(|item| item.seq_num);
    items
        .into_iter()
        .map(|item| station_code(&item.station_code))
        .collect()
}

/// Convert a `jSrcStationToDstStationInfo` response into distances to `destination`.
///
/// The destination is always present with distance zero.
pub fn convert_distances(
    response: &StationToStationResponse,
    destination: &StationCode,
) -> HashMap<StationCode, f64> {
    let mut distances = HashMap::new();
    for info in &response.station_to_station_infos {
        match StationCode::parse(&info.source_station) {
            Ok(code) => {
                distances.insert(code, info.composite_miles);
            }
            Err(e) => {
                warn!(station = %info.source_station, error = %e, "skipping distance entry");
            }
        }
    }
    distances.insert(destination.clone(), 0.0);
    distances
}

/// Average speed in mph from the first station-to-station entry.
///
/// Returns `None` when the running time is zero.
pub fn convert_average_speed(
    response: &StationToStationResponse,
) -> Result<Option<f64>, ConversionError> {
    let info = response
        .station_to_station_infos
        .first()
        .ok_or(ConversionError::Missing("station-to-station info"))?;

    if info.rail_time <= 0.0 {
        return Ok(None);
    }
    Ok(Some(info.composite_miles * 60.0 / info.rail_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES_JSON: &str = r#"{
        "Lines": [
            {"LineCode": "RD", "DisplayName": "Red", "StartStationCode": "A15",
             "EndStationCode": "B11", "InternalDestination1": "A11", "InternalDestination2": "B08"},
            {"LineCode": "bad", "DisplayName": "Broken", "StartStationCode": "A15",
             "EndStationCode": "B11"}
        ]
    }"#;

    const STATIONS_JSON: &str = r#"{
        "Stations": [
            {"Code": "A01", "Name": "Metro Center", "StationTogether1": "C01",
             "StationTogether2": "", "LineCode1": "RD", "LineCode2": null,
             "LineCode3": null, "LineCode4": null, "Lat": 38.898303, "Lon": -77.028099},
            {"Code": "C01", "Name": "Metro Center", "StationTogether1": "A01",
             "StationTogether2": "", "LineCode1": "BL", "LineCode2": "OR",
             "LineCode3": "SV", "LineCode4": null},
            {"Code": "X99", "Name": "Nowhere", "StationTogether1": "",
             "StationTogether2": "", "LineCode1": null, "LineCode2": null,
             "LineCode3": null, "LineCode4": null}
        ]
    }"#;

    const PATH_JSON: &str = r#"{
        "Path": [
            {"LineCode": "RD", "StationCode": "A02", "StationName": "Farragut North",
             "SeqNum": 2, "DistanceToPrev": 3000},
            {"LineCode": "RD", "StationCode": "A03", "StationName": "Dupont Circle",
             "SeqNum": 1, "DistanceToPrev": 0},
            {"LineCode": "RD", "StationCode": "A01", "StationName": "Metro Center",
             "SeqNum": 3, "DistanceToPrev": 2500}
        ]
    }"#;

    const INFOS_JSON: &str = r#"{
        "StationToStationInfos": [
            {"SourceStation": "A03", "DestinationStation": "A01",
             "CompositeMiles": 1.45, "RailTime": 4, "RailFare": {}},
            {"SourceStation": "A02", "DestinationStation": "A01",
             "CompositeMiles": 0.58, "RailTime": 2}
        ]
    }"#;

    #[test]
    fn converts_lines_and_skips_invalid() {
        let response: LinesResponse = serde_json::from_str(LINES_JSON).unwrap();
        let lines = convert_lines(&response);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].code.as_str(), "RD");
        assert_eq!(lines[0].display_name, "Red");
        assert_eq!(lines[0].start.as_str(), "A15");
        assert_eq!(lines[0].end.as_str(), "B11");
    }

    #[test]
    fn converts_stations_dropping_empty_fields() {
        let response: StationsResponse = serde_json::from_str(STATIONS_JSON).unwrap();
        let stations = convert_stations(&response);

        assert_eq!(stations.len(), 2);

        let a01 = &stations[0];
        assert_eq!(a01.code.as_str(), "A01");
        assert_eq!(a01.lines.len(), 1);
        assert_eq!(a01.together.len(), 1);
        assert_eq!(a01.together[0].as_str(), "C01");

        let c01 = &stations[1];
        let lines: Vec<&str> = c01.lines.iter().map(|l| l.as_str()).collect();
        assert_eq!(lines, vec!["BL", "OR", "SV"]);
    }

    #[test]
    fn station_without_lines_is_rejected() {
        let response: StationsResponse = serde_json::from_str(STATIONS_JSON).unwrap();
        let result = convert_station(&response.stations[2]);
        assert!(matches!(result, Err(ConversionError::NoLines(_))));
    }

    #[test]
    fn path_is_ordered_by_sequence_number() {
        let response: PathResponse = serde_json::from_str(PATH_JSON).unwrap();
        let codes = convert_path(&response).unwrap();
        let codes: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["A03", "A02", "A01"]);
    }

    #[test]
    fn path_with_bad_code_is_rejected() {
        let json = r#"{"Path": [{"LineCode": "RD", "StationCode": "a 1",
            "StationName": "Bad", "SeqNum": 1}]}"#;
        let response: PathResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            convert_path(&response),
            Err(ConversionError::InvalidStationCode(_))
        ));
    }

    #[test]
    fn distances_include_destination_at_zero() {
        let response: StationToStationResponse = serde_json::from_str(INFOS_JSON).unwrap();
        let destination = StationCode::parse("A01").unwrap();
        let distances = convert_distances(&response, &destination);

        assert_eq!(distances.len(), 3);
        assert_eq!(distances[&destination], 0.0);
        assert_eq!(distances[&StationCode::parse("A03").unwrap()], 1.45);
    }

    #[test]
    fn average_speed_from_first_entry() {
        let response: StationToStationResponse = serde_json::from_str(INFOS_JSON).unwrap();
        let mph = convert_average_speed(&response).unwrap().unwrap();
        assert!((mph - 21.75).abs() < 1e-9);
    }

    #[test]
    fn average_speed_needs_an_entry() {
        let response: StationToStationResponse =
            serde_json::from_str(r#"{"StationToStationInfos": []}"#).unwrap();
        assert!(convert_average_speed(&response).is_err());
    }
}
