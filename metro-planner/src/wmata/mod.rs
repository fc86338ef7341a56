//! WMATA Rail Station Information client.
//!
//! This module provides an HTTP client for the Washington Metropolitan Area
//! Transit Authority rail API, which supplies the line list, station
//! platforms, station-to-station distances and the ordered stations of
//! each line.
//!
//! Key characteristics of the API:
//! - A station with several platforms has one code per platform, linked
//!   through `StationTogether1`/`StationTogether2`
//! - Optional fields come back as either `null` or `""`
//! - Distances (`CompositeMiles`) are track miles, not straight-line

mod client;
mod convert;
mod error;
mod types;

pub use client::{WmataClient, WmataConfig};
pub use convert::ConversionError;
pub use error::WmataError;
pub use types::{
    LineDto, LinesResponse, PathItem, PathResponse, StationDto, StationToStationInfo,
    StationToStationResponse, StationsResponse,
};
