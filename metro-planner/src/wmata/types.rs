//! WMATA Rail Station Information API response DTOs.
//!
//! Field names follow the API's PascalCase JSON. Optional codes are sent
//! either as `null` or as an empty string, so both are `Option<String>`
//! here and filtered during conversion.

use serde::Deserialize;

/// Response from `jLines`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LinesResponse {
    pub lines: Vec<LineDto>,
}

/// One line from `jLines`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineDto {
    /// Two-letter line code, e.g. "RD".
    pub line_code: String,

    /// Full line name, e.g. "Red".
    pub display_name: String,

    /// Code of one terminal station.
    pub start_station_code: String,

    /// Code of the other terminal station.
    pub end_station_code: String,
}

/// Response from `jStations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationsResponse {
    pub stations: Vec<StationDto>,
}

/// One station platform from `jStations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationDto {
    /// Platform code, e.g. "A01".
    pub code: String,

    /// Station name, shared by all platforms of a station.
    pub name: String,

    pub line_code1: Option<String>,
    pub line_code2: Option<String>,
    pub line_code3: Option<String>,
    pub line_code4: Option<String>,

    /// Codes of other platforms at the same station.
    pub station_together1: Option<String>,
    pub station_together2: Option<String>,
}

/// Response from `jSrcStationToDstStationInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationToStationResponse {
    pub station_to_station_infos: Vec<StationToStationInfo>,
}

/// Distance and running time between two stations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationToStationInfo {
    pub source_station: String,
    pub destination_station: String,

    /// Track distance in miles.
    pub composite_miles: f64,

    /// Running time in minutes.
    pub rail_time: f64,
}

/// Response from `jPath`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathResponse {
    pub path: Vec<PathItem>,
}

/// One station on a `jPath` route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathItem {
    pub line_code: String,
    pub station_code: String,
    pub station_name: String,
    pub seq_num: u32,
}
